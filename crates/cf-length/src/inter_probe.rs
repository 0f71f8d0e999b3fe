//! Inter-probe run length.

use cf_core::numeric::{Real, parse_count, parse_number};

use crate::layout::ConnectionTopology;
use crate::outcome::{LengthOutcome, LengthResult, MissingInput, fmt_mm};

/// Inputs for [`compute_inter_probe_run_length`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InterProbeInput {
    pub probe_count: Option<i64>,
    pub probe_spacing_mm: Option<Real>,
    pub connection_topology: Option<ConnectionTopology>,
}

impl InterProbeInput {
    pub fn from_raw(probe_count: &str, probe_spacing: &str, connection_topology: &str) -> Self {
        Self {
            probe_count: parse_count(probe_count),
            probe_spacing_mm: parse_number(probe_spacing),
            connection_topology: ConnectionTopology::parse(connection_topology),
        }
    }
}

/// Total run between probes.
///
/// - `einseitig`: `(n - 1) * spacing`
/// - `beidseitig`: probes split over both ends, `ceil(n / 2)` per side, and
///   only the spans on one side count: `max(ceil(n / 2) - 1, 0) * spacing`
///
/// Checks run in order topology, count, spacing; the first failure is reported.
pub fn compute_inter_probe_run_length(input: &InterProbeInput) -> LengthOutcome {
    let Some(topology) = input.connection_topology else {
        return LengthOutcome::not_computable(MissingInput::ConnectionTopology);
    };
    let count = match input.probe_count {
        Some(n) if n >= 1 => n,
        _ => return LengthOutcome::not_computable(MissingInput::ProbeCount),
    };
    let spacing = match input.probe_spacing_mm {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => return LengthOutcome::not_computable(MissingInput::ProbeSpacing),
    };

    let (total_mm, formula_label) = match topology {
        ConnectionTopology::Einseitig => {
            let total = (count - 1) as Real * spacing;
            let label = format!(
                "({} - 1) × {} mm = {} mm",
                count,
                fmt_mm(spacing),
                fmt_mm(total)
            );
            (total, label)
        }
        ConnectionTopology::Beidseitig => {
            let per_side = count / 2 + count % 2;
            let spans = (per_side - 1).max(0);
            let total = spans as Real * spacing;
            let label = format!(
                "ceil({} / 2) = {} per side, ({} - 1) × {} mm = {} mm",
                count,
                per_side,
                per_side,
                fmt_mm(spacing),
                fmt_mm(total)
            );
            (total, label)
        }
    };

    LengthOutcome::Computed(LengthResult {
        total_mm,
        formula_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(count: i64, spacing: Real, topology: ConnectionTopology) -> LengthOutcome {
        compute_inter_probe_run_length(&InterProbeInput {
            probe_count: Some(count),
            probe_spacing_mm: Some(spacing),
            connection_topology: Some(topology),
        })
    }

    #[test]
    fn beidseitig_rounds_probes_per_side_up() {
        let out = run(5, 500.0, ConnectionTopology::Beidseitig);
        let r = out.result().unwrap();
        assert_eq!(r.total_millimeters(), 1000.0);
        assert!(r.formula_label.starts_with("ceil(5 / 2) = 3 per side"));
    }

    #[test]
    fn beidseitig_even_count() {
        let out = run(6, 400.0, ConnectionTopology::Beidseitig);
        assert_eq!(out.result().unwrap().total_millimeters(), 800.0);
    }

    #[test]
    fn beidseitig_single_probe_has_no_span() {
        let out = run(1, 400.0, ConnectionTopology::Beidseitig);
        assert_eq!(out.result().unwrap().total_millimeters(), 0.0);
    }

    #[test]
    fn saturated_count_does_not_overflow() {
        for topology in [ConnectionTopology::Einseitig, ConnectionTopology::Beidseitig] {
            let out = run(i64::MAX, 500.0, topology);
            let total = out.result().unwrap().total_millimeters();
            assert!(total.is_finite() && total > 0.0);
        }

        let out =
            compute_inter_probe_run_length(&InterProbeInput::from_raw("1e19", "500", "beidseitig"));
        assert!(out.is_computable());
    }

    #[test]
    fn einseitig_reference_case() {
        let out = run(5, 500.0, ConnectionTopology::Einseitig);
        let r = out.result().unwrap();
        assert_eq!(r.total_millimeters(), 2000.0);
        assert_eq!(r.meters_display(), "2.00");
    }

    #[test]
    fn zero_spacing_reports_spacing() {
        let out = run(4, 0.0, ConnectionTopology::Einseitig);
        assert_eq!(out.reason(), Some(MissingInput::ProbeSpacing));
        assert_eq!(out.display_text(), "probe spacing required.");
    }

    #[test]
    fn topology_is_checked_first() {
        let out = compute_inter_probe_run_length(&InterProbeInput::default());
        assert_eq!(out.reason(), Some(MissingInput::ConnectionTopology));

        let out = compute_inter_probe_run_length(&InterProbeInput::from_raw("", "", "beidseitig"));
        assert_eq!(out.reason(), Some(MissingInput::ProbeCount));

        let out = compute_inter_probe_run_length(&InterProbeInput::from_raw("3", "", "einseitig"));
        assert_eq!(out.reason(), Some(MissingInput::ProbeSpacing));
    }
}
