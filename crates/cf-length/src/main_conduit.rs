//! Main conduit (HVB) length.

use cf_core::numeric::{Real, parse_count, parse_number};

use crate::layout::LayoutForm;
use crate::outcome::{LengthOutcome, LengthResult, MissingInput, fmt_mm};
use crate::policy::LengthPolicy;

/// Inputs for [`compute_main_conduit_length`].
///
/// `None` means the field is empty or did not parse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MainConduitInput {
    pub probe_count: Option<i64>,
    pub probe_spacing_mm: Option<Real>,
    pub allowance_left_mm: Option<Real>,
    pub allowance_right_mm: Option<Real>,
    pub layout_form: LayoutForm,
}

impl MainConduitInput {
    /// Build from raw form text. Malformed numbers become `None`, an
    /// unrecognised layout form falls back to I-Form.
    pub fn from_raw(
        probe_count: &str,
        probe_spacing: &str,
        allowance_left: &str,
        allowance_right: &str,
        layout_form: &str,
    ) -> Self {
        Self {
            probe_count: parse_count(probe_count),
            probe_spacing_mm: parse_number(probe_spacing),
            allowance_left_mm: parse_number(allowance_left),
            allowance_right_mm: parse_number(allowance_right),
            layout_form: LayoutForm::parse(layout_form).unwrap_or_default(),
        }
    }
}

/// Total main conduit length:
/// `(probe_count - 1) * spacing * f + allowance_left + allowance_right`,
/// with `f = 1` for I-Form and `f = policy.u_form_span_factor` for U-Form.
///
/// A single probe has no span to measure, so a count of 1 is not computable,
/// and neither is a total that does not come out positive.
pub fn compute_main_conduit_length(
    input: &MainConduitInput,
    policy: &LengthPolicy,
) -> LengthOutcome {
    let count = match input.probe_count {
        Some(n) if n > 1 => n,
        _ => return LengthOutcome::not_computable(MissingInput::ProbeCount),
    };
    let spacing = match input.probe_spacing_mm {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => return LengthOutcome::not_computable(MissingInput::ProbeSpacing),
    };
    let left = finite_or_zero(input.allowance_left_mm);
    let right = finite_or_zero(input.allowance_right_mm);

    let factor = match input.layout_form {
        LayoutForm::I => 1.0,
        LayoutForm::U => policy.u_form_span_factor,
    };

    let spans = (count - 1) as Real;
    let total_mm = spans * spacing * factor + left + right;
    if total_mm <= 0.0 {
        return LengthOutcome::not_computable(MissingInput::ProbeCount);
    }

    let factor_part = if factor == 1.0 {
        String::new()
    } else {
        format!(" × {}", fmt_mm(factor))
    };
    let formula_label = format!(
        "({} - 1) × {} mm{} + {} mm + {} mm = {} mm",
        count,
        fmt_mm(spacing),
        factor_part,
        fmt_mm(left),
        fmt_mm(right),
        fmt_mm(total_mm),
    );

    LengthOutcome::Computed(LengthResult {
        total_mm,
        formula_label,
    })
}

fn finite_or_zero(v: Option<Real>) -> Real {
    v.filter(|x| x.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(count: Option<i64>, spacing: Option<Real>, form: LayoutForm) -> MainConduitInput {
        MainConduitInput {
            probe_count: count,
            probe_spacing_mm: spacing,
            allowance_left_mm: Some(50.0),
            allowance_right_mm: Some(30.0),
            layout_form: form,
        }
    }

    #[test]
    fn i_form_reference_case() {
        let out = compute_main_conduit_length(
            &input(Some(5), Some(500.0), LayoutForm::I),
            &LengthPolicy::default(),
        );
        let r = out.result().unwrap();
        assert_eq!(r.total_millimeters(), 2080.0);
        assert_eq!(r.meters_display(), "2.08");
        assert_eq!(
            r.formula_label,
            "(5 - 1) × 500 mm + 50 mm + 30 mm = 2080 mm"
        );
    }

    #[test]
    fn u_form_matches_i_form_under_unified_policy() {
        let policy = LengthPolicy::UNIFIED;
        let i = compute_main_conduit_length(&input(Some(7), Some(250.0), LayoutForm::I), &policy);
        let u = compute_main_conduit_length(&input(Some(7), Some(250.0), LayoutForm::U), &policy);
        assert_eq!(
            i.result().unwrap().total_millimeters(),
            u.result().unwrap().total_millimeters()
        );
    }

    #[test]
    fn u_form_legacy_policy_quadruples_span() {
        let out = compute_main_conduit_length(
            &input(Some(5), Some(500.0), LayoutForm::U),
            &LengthPolicy::LEGACY_FOLDED,
        );
        let r = out.result().unwrap();
        assert_eq!(r.total_millimeters(), 4.0 * 2000.0 + 80.0);
        assert!(r.formula_label.contains("× 4"));
    }

    #[test]
    fn legacy_policy_leaves_i_form_alone() {
        let out = compute_main_conduit_length(
            &input(Some(5), Some(500.0), LayoutForm::I),
            &LengthPolicy::LEGACY_FOLDED,
        );
        assert_eq!(out.result().unwrap().total_millimeters(), 2080.0);
    }

    #[test]
    fn single_probe_is_not_computable() {
        let mut i = input(Some(1), Some(500.0), LayoutForm::I);
        i.allowance_left_mm = Some(0.0);
        i.allowance_right_mm = Some(0.0);
        let out = compute_main_conduit_length(&i, &LengthPolicy::default());
        assert_eq!(out.reason(), Some(MissingInput::ProbeCount));
        assert_eq!(out.display_text(), "probe count required.");

        // allowances alone do not make a single probe measurable
        let out = compute_main_conduit_length(
            &input(Some(1), Some(500.0), LayoutForm::I),
            &LengthPolicy::default(),
        );
        assert_eq!(out.reason(), Some(MissingInput::ProbeCount));
    }

    #[test]
    fn non_positive_total_is_not_computable() {
        let mut i = input(Some(2), Some(100.0), LayoutForm::I);
        i.allowance_left_mm = Some(-60.0);
        i.allowance_right_mm = Some(-40.0);
        let out = compute_main_conduit_length(&i, &LengthPolicy::default());
        assert_eq!(out.reason(), Some(MissingInput::ProbeCount));
    }

    #[test]
    fn missing_count_wins_over_missing_spacing() {
        let out =
            compute_main_conduit_length(&input(None, None, LayoutForm::I), &LengthPolicy::default());
        assert_eq!(out.reason(), Some(MissingInput::ProbeCount));

        let out = compute_main_conduit_length(
            &input(Some(0), Some(500.0), LayoutForm::I),
            &LengthPolicy::default(),
        );
        assert_eq!(out.reason(), Some(MissingInput::ProbeCount));
    }

    #[test]
    fn non_positive_spacing_is_not_computable() {
        for spacing in [Some(0.0), Some(-10.0), Some(Real::NAN), None] {
            let out = compute_main_conduit_length(
                &input(Some(4), spacing, LayoutForm::I),
                &LengthPolicy::default(),
            );
            assert_eq!(out.reason(), Some(MissingInput::ProbeSpacing));
        }
    }

    #[test]
    fn raw_fields_with_garbage_are_treated_as_missing() {
        let i = MainConduitInput::from_raw("fünf", "500", "", "", "I");
        let out = compute_main_conduit_length(&i, &LengthPolicy::default());
        assert_eq!(out.reason(), Some(MissingInput::ProbeCount));

        let i = MainConduitInput::from_raw("5", "500mm", "50", "x", "U-Form");
        assert_eq!(i.layout_form, LayoutForm::U);
        let out = compute_main_conduit_length(&i, &LengthPolicy::default());
        assert_eq!(out.result().unwrap().total_millimeters(), 2050.0);
    }
}
