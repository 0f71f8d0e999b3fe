//! Error types for the cf-wizard service layer.

use std::path::PathBuf;

use cf_draft::FieldKey;

use crate::wizard::WizardStep;

/// Wizard error type wrapping draft, API and settings failures behind one
/// interface for the CLI and any other front-end.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Draft error: {0}")]
    Draft(String),

    #[error("Failed to read draft file: {path}")]
    DraftFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write draft file: {path}")]
    DraftFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Draft validation failed: {0}")]
    Validation(String),

    #[error("Bitte füllen Sie alle Pflichtfelder aus: {}", join_fields(.fields))]
    MissingFields {
        step: WizardStep,
        fields: Vec<FieldKey>,
    },

    #[error("Cannot {action} from step {step}")]
    InvalidTransition {
        step: WizardStep,
        action: &'static str,
    },

    #[error("API request to {endpoint} failed: {message}")]
    Api { endpoint: String, message: String },

    #[error("BOM generation rejected: {message}")]
    BomRejected { message: String },

    #[error("Article number required: {0}")]
    ArticleNumberRequired(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cf-wizard operations.
pub type WizardResult<T> = Result<T, WizardError>;

fn join_fields(fields: &[FieldKey]) -> String {
    fields
        .iter()
        .map(|f| f.wire_name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<cf_draft::DraftError> for WizardError {
    fn from(err: cf_draft::DraftError) -> Self {
        WizardError::Draft(err.to_string())
    }
}

impl From<cf_draft::ValidationError> for WizardError {
    fn from(err: cf_draft::ValidationError) -> Self {
        WizardError::Validation(err.to_string())
    }
}

impl WizardError {
    pub fn api(endpoint: impl ToString, message: impl ToString) -> Self {
        WizardError::Api {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_lists_wire_names() {
        let err = WizardError::MissingFields {
            step: WizardStep::Probes,
            fields: vec![FieldKey::ProbeCount, FieldKey::ProbeSpacing],
        };
        assert_eq!(
            err.to_string(),
            "Bitte füllen Sie alle Pflichtfelder aus: sondenanzahl, sondenabstand"
        );
    }
}
