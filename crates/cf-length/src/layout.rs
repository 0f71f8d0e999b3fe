//! Layout form and connection topology vocabularies.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Whether probes sit in a single row or a folded double row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutForm {
    /// Single row ("I-Form").
    #[default]
    I,
    /// Folded double row ("U-Form").
    U,
}

impl LayoutForm {
    /// Parse a form field value. Accepts `I`, `U`, `I-Form`, `U-Form` in any case.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        let head = text
            .strip_suffix("-Form")
            .or_else(|| text.strip_suffix("-form"))
            .unwrap_or(text)
            .trim();
        if head.eq_ignore_ascii_case("I") {
            Some(Self::I)
        } else if head.eq_ignore_ascii_case("U") {
            Some(Self::U)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::I => "I",
            Self::U => "U",
        }
    }
}

impl fmt::Display for LayoutForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Form", self.as_str())
    }
}

/// Whether the main conduit feeds the probes from one side or from both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionTopology {
    Einseitig,
    Beidseitig,
}

impl ConnectionTopology {
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.eq_ignore_ascii_case("einseitig") {
            Some(Self::Einseitig)
        } else if text.eq_ignore_ascii_case("beidseitig") {
            Some(Self::Beidseitig)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Einseitig => "einseitig",
            Self::Beidseitig => "beidseitig",
        }
    }
}

impl fmt::Display for ConnectionTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_form_accepts_long_names() {
        assert_eq!(LayoutForm::parse("I"), Some(LayoutForm::I));
        assert_eq!(LayoutForm::parse(" u "), Some(LayoutForm::U));
        assert_eq!(LayoutForm::parse("U-Form"), Some(LayoutForm::U));
        assert_eq!(LayoutForm::parse("i-form"), Some(LayoutForm::I));
        assert_eq!(LayoutForm::parse("L"), None);
        assert_eq!(LayoutForm::default(), LayoutForm::I);
    }

    #[test]
    fn topology_round_trips_through_serde_names() {
        assert_eq!(
            ConnectionTopology::parse("Beidseitig"),
            Some(ConnectionTopology::Beidseitig)
        );
        assert_eq!(ConnectionTopology::parse(""), None);
        assert_eq!(ConnectionTopology::Einseitig.to_string(), "einseitig");
    }
}
