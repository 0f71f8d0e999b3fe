//! Draft validation: numeric ranges and dependent-field consistency.
//!
//! Required-field checks per wizard step live with the wizard; this module
//! only rejects values that are present but out of range.

use std::collections::HashSet;

use cf_core::numeric::Real;
use cf_length::MIN_PROBE_COUNT;

use crate::schema::{ConfigurationDraft, DraftFile};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing dependency: {field} requires {requires}")]
    MissingDependency { field: String, requires: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_draft(file: &DraftFile) -> Result<(), ValidationError> {
    if file.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }
    validate_values(&file.draft)
}

/// Range and dependency checks on the values that are set.
pub fn validate_values(draft: &ConfigurationDraft) -> Result<(), ValidationError> {
    validate_positive("hvb_size_mm", draft.hvb_size_mm)?;
    validate_positive("probe_diameter_mm", draft.probe_diameter_mm)?;
    validate_positive("probe_spacing_mm", draft.probe_spacing_mm)?;
    validate_non_negative("allowance_left_mm", draft.allowance_left_mm)?;
    validate_non_negative("allowance_right_mm", draft.allowance_right_mm)?;

    if let Some(count) = draft.probe_count
        && count < i64::from(MIN_PROBE_COUNT)
    {
        return Err(ValidationError::InvalidValue {
            field: "probe_count".to_string(),
            value: count.to_string(),
            reason: format!("must be at least {MIN_PROBE_COUNT}"),
        });
    }

    if draft.dfm_type.is_some() && draft.dfm_category.is_none() {
        return Err(ValidationError::MissingDependency {
            field: "dfm_type".to_string(),
            requires: "dfm_category".to_string(),
        });
    }

    if !draft.gnx_articles.is_empty() && !draft.is_gnx_chamber() {
        return Err(ValidationError::MissingDependency {
            field: "gnx_articles".to_string(),
            requires: "a GN X chamber type".to_string(),
        });
    }

    let mut article_ids = HashSet::new();
    for article in &draft.gnx_articles {
        if !article_ids.insert(article.id) {
            return Err(ValidationError::DuplicateId {
                id: article.id.to_string(),
                context: "gnx_articles".to_string(),
            });
        }
        if !article.quantity.is_finite() || article.quantity < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("gnx article {} quantity", article.id),
                value: article.quantity.to_string(),
                reason: "must be non-negative and finite".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_positive(field: &str, value: Option<Real>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: v.to_string(),
            reason: "must be positive and finite".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_non_negative(field: &str, value: Option<Real>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: v.to_string(),
            reason: "must be non-negative and finite".to_string(),
        }),
        _ => Ok(()),
    }
}
