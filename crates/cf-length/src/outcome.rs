//! Result types shared by both length formulas.

use cf_core::numeric::{Real, round_to};
use cf_core::units::{Length, mm};

/// Which required input was missing or invalid.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    #[error("connection topology required.")]
    ConnectionTopology,

    #[error("probe count required.")]
    ProbeCount,

    #[error("probe spacing required.")]
    ProbeSpacing,
}

/// A computed length ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthResult {
    /// Unrounded total in millimeters.
    pub total_mm: Real,
    /// Human readable formula with the inputs substituted, e.g.
    /// `(5 - 1) × 500 mm + 50 mm + 30 mm = 2080 mm`.
    pub formula_label: String,
}

impl LengthResult {
    pub fn total_millimeters(&self) -> Real {
        self.total_mm
    }

    /// Unrounded meters.
    pub fn total_meters(&self) -> Real {
        self.total_mm / 1000.0
    }

    pub fn length(&self) -> Length {
        mm(self.total_mm)
    }

    /// Meters rounded to two decimals.
    pub fn total_meters_rounded(&self) -> Real {
        round_to(self.total_meters(), 2)
    }

    /// Meters as shown next to the input fields, always two decimals.
    pub fn meters_display(&self) -> String {
        format!("{:.2}", self.total_meters_rounded())
    }
}

/// Either a computed length or the reason it cannot be computed yet.
#[derive(Debug, Clone, PartialEq)]
pub enum LengthOutcome {
    Computed(LengthResult),
    NotComputable { reason: MissingInput },
}

impl LengthOutcome {
    pub fn not_computable(reason: MissingInput) -> Self {
        Self::NotComputable { reason }
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    pub fn result(&self) -> Option<&LengthResult> {
        match self {
            Self::Computed(r) => Some(r),
            Self::NotComputable { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<MissingInput> {
        match self {
            Self::Computed(_) => None,
            Self::NotComputable { reason } => Some(*reason),
        }
    }

    /// Text rendered in place of the value: meters, or the reason.
    pub fn display_text(&self) -> String {
        match self {
            Self::Computed(r) => format!("{} m", r.meters_display()),
            Self::NotComputable { reason } => reason.to_string(),
        }
    }
}

/// Render a millimeter figure without a trailing `.0` for whole values.
pub(crate) fn fmt_mm(v: Real) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::units::in_m;

    #[test]
    fn meters_are_rounded_for_display_only() {
        let r = LengthResult {
            total_mm: 2084.0,
            formula_label: String::new(),
        };
        assert!((r.total_meters() - 2.084).abs() < 1e-12);
        assert!((in_m(r.length()) - 2.084).abs() < 1e-12);
        assert_eq!(r.meters_display(), "2.08");
        assert_eq!(r.total_meters_rounded(), 2.08);
    }

    #[test]
    fn reason_text_is_displayed_in_place_of_value() {
        let o = LengthOutcome::not_computable(MissingInput::ProbeSpacing);
        assert_eq!(o.display_text(), "probe spacing required.");
        assert!(!o.is_computable());
    }

    #[test]
    fn fmt_mm_drops_trailing_zero() {
        assert_eq!(fmt_mm(500.0), "500");
        assert_eq!(fmt_mm(62.5), "62.5");
    }
}
