//! Draft file loading, saving and inspection for front-ends.

use std::path::Path;

use cf_draft::{ConfigurationDraft, DraftFile, DraftLengths, validate::validate_values};
use cf_length::LengthPolicy;

use crate::error::{WizardError, WizardResult};

/// Load a draft file, YAML or JSON by extension, migrated and validated.
pub fn load_draft(path: &Path) -> WizardResult<DraftFile> {
    let content = std::fs::read_to_string(path).map_err(|e| WizardError::DraftFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let file = if cf_draft::is_json_path(path) {
        cf_draft::from_json_str(&content)?
    } else {
        cf_draft::from_yaml_str(&content)?
    };
    tracing::debug!(path = %path.display(), version = file.version, "loaded draft");
    Ok(file)
}

/// Save a draft file in the format named by the extension.
pub fn save_draft(path: &Path, file: &DraftFile) -> WizardResult<()> {
    let content = if cf_draft::is_json_path(path) {
        cf_draft::to_json_string(file)?
    } else {
        cf_draft::to_yaml_string(file)?
    };

    std::fs::write(path, content).map_err(|e| WizardError::DraftFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Validate the values a draft carries.
pub fn validate_draft(draft: &ConfigurationDraft) -> WizardResult<()> {
    validate_values(draft)?;
    Ok(())
}

/// Both displayed lengths for a draft under `policy`.
pub fn compute_lengths(draft: &ConfigurationDraft, policy: &LengthPolicy) -> DraftLengths {
    draft.lengths(policy)
}
