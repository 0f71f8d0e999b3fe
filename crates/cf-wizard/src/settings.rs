//! Wizard settings file.

use std::path::Path;

use cf_core::numeric::Real;
use cf_length::LengthPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{WizardError, WizardResult};

/// Tunables read from a YAML file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub length_policy: LengthPolicy,
    /// Allowances used until a spacing option supplies its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_allowance_left_mm: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_allowance_right_mm: Option<Real>,
}

impl Settings {
    pub fn from_yaml_str(content: &str) -> WizardResult<Self> {
        let settings: Settings = serde_yaml::from_str(content)
            .map_err(|e| WizardError::Settings(format!("Failed to parse settings YAML: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> WizardResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WizardError::Settings(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> WizardResult<()> {
        self.validate()?;
        let content = serde_yaml::to_string(self)
            .map_err(|e| WizardError::Settings(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path, content)
            .map_err(|e| WizardError::Settings(format!("{}: {}", path.display(), e)))
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> WizardResult<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    fn validate(&self) -> WizardResult<()> {
        let factor = self.length_policy.u_form_span_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(WizardError::Settings(format!(
                "u_form_span_factor must be positive, got {factor}"
            )));
        }
        for (name, v) in [
            ("default_allowance_left_mm", self.default_allowance_left_mm),
            ("default_allowance_right_mm", self.default_allowance_right_mm),
        ] {
            if let Some(v) = v.filter(|v| !v.is_finite() || *v < 0.0) {
                return Err(WizardError::Settings(format!(
                    "{name} must be non-negative, got {v}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let s = Settings::from_yaml_str("{}").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.length_policy, LengthPolicy::UNIFIED);
    }

    #[test]
    fn legacy_policy_is_selectable() {
        let s = Settings::from_yaml_str("length_policy:\n  u_form_span_factor: 4\n").unwrap();
        assert_eq!(s.length_policy, LengthPolicy::LEGACY_FOLDED);
    }

    #[test]
    fn rejects_non_positive_factor() {
        let err = Settings::from_yaml_str("length_policy:\n  u_form_span_factor: 0\n").unwrap_err();
        assert!(matches!(err, WizardError::Settings(_)));
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = std::env::temp_dir().join("cf_wizard_settings_round_trip.yaml");
        let s = Settings {
            length_policy: LengthPolicy::LEGACY_FOLDED,
            default_allowance_left_mm: Some(100.0),
            default_allowance_right_mm: Some(100.0),
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
        let _ = std::fs::remove_file(&path);
    }
}
