//! cf-draft: the configuration draft record, its field vocabulary,
//! validation, and the draft file format.

pub mod fields;
pub mod lenient;
pub mod migrate;
pub mod schema;
pub mod validate;

pub use fields::{FieldChange, FieldKey};
pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_draft};

pub type DraftResult<T> = Result<T, DraftError>;

#[derive(thiserror::Error, Debug)]
pub enum DraftError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse, migrate and validate a YAML draft document.
pub fn from_yaml_str(content: &str) -> DraftResult<DraftFile> {
    let file: DraftFile = serde_yaml::from_str(content)?;
    finish_load(file)
}

/// Parse, migrate and validate a JSON draft document.
pub fn from_json_str(content: &str) -> DraftResult<DraftFile> {
    let file: DraftFile = serde_json::from_str(content)?;
    finish_load(file)
}

fn finish_load(file: DraftFile) -> DraftResult<DraftFile> {
    let file = migrate_to_latest(file)?;
    validate_draft(&file)?;
    Ok(file)
}

pub fn to_yaml_string(file: &DraftFile) -> DraftResult<String> {
    validate_draft(file)?;
    Ok(serde_yaml::to_string(file)?)
}

pub fn to_json_string(file: &DraftFile) -> DraftResult<String> {
    validate_draft(file)?;
    Ok(serde_json::to_string_pretty(file)?)
}

pub fn load_yaml(path: &std::path::Path) -> DraftResult<DraftFile> {
    from_yaml_str(&std::fs::read_to_string(path)?)
}

pub fn save_yaml(path: &std::path::Path, file: &DraftFile) -> DraftResult<()> {
    std::fs::write(path, to_yaml_string(file)?)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> DraftResult<DraftFile> {
    from_json_str(&std::fs::read_to_string(path)?)
}

pub fn save_json(path: &std::path::Path, file: &DraftFile) -> DraftResult<()> {
    std::fs::write(path, to_json_string(file)?)?;
    Ok(())
}

/// Whether a path names a JSON draft; everything else is read as YAML.
pub fn is_json_path(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load_any(path: &std::path::Path) -> DraftResult<DraftFile> {
    if is_json_path(path) {
        load_json(path)
    } else {
        load_yaml(path)
    }
}
