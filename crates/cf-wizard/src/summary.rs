//! Read-only review table.

use cf_core::numeric::{Real, format_quantity};
use cf_draft::{ConfigurationDraft, FieldKey};
use cf_length::LengthPolicy;

pub const NOT_SELECTED: &str = "Nicht ausgewählt";

pub const MAIN_CONDUIT_LABEL: &str = "HVB-Länge";
pub const INTER_PROBE_RUN_LABEL: &str = "Leitungslänge zwischen Sonden";

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigurationSummary {
    pub rows: Vec<SummaryRow>,
}

impl ConfigurationSummary {
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

impl std::fmt::Display for ConfigurationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .max()
            .unwrap_or(0);
        for row in &self.rows {
            let pad = width - row.label.chars().count();
            writeln!(f, "{}:{} {}", row.label, " ".repeat(pad), row.value)?;
        }
        Ok(())
    }
}

fn mm(v: Option<Real>) -> String {
    v.map(|x| format!("{}mm", format_quantity(x, 2)))
        .unwrap_or_default()
}

pub fn build_summary(draft: &ConfigurationDraft, policy: &LengthPolicy) -> ConfigurationSummary {
    let text = |key: FieldKey| draft.field_text(key).unwrap_or_default();
    let or_not_selected =
        |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_SELECTED.to_string());
    let lengths = draft.lengths(policy);

    let rows = vec![
        SummaryRow {
            label: FieldKey::ConfigurationName.label(),
            value: text(FieldKey::ConfigurationName),
        },
        SummaryRow {
            label: FieldKey::ChamberType.label(),
            value: text(FieldKey::ChamberType),
        },
        SummaryRow {
            label: FieldKey::HvbSize.label(),
            value: mm(draft.hvb_size_mm),
        },
        SummaryRow {
            label: FieldKey::ProbeDiameter.label(),
            value: mm(draft.probe_diameter_mm),
        },
        SummaryRow {
            label: FieldKey::ProbeCount.label(),
            value: text(FieldKey::ProbeCount),
        },
        SummaryRow {
            label: FieldKey::ProbeSpacing.label(),
            value: mm(draft.probe_spacing_mm),
        },
        SummaryRow {
            label: FieldKey::ConnectionTopology.label(),
            value: text(FieldKey::ConnectionTopology),
        },
        SummaryRow {
            label: FieldKey::ValveType.label(),
            value: or_not_selected(&draft.valve_type),
        },
        SummaryRow {
            label: FieldKey::DfmType.label(),
            value: or_not_selected(&draft.dfm_type),
        },
        SummaryRow {
            label: MAIN_CONDUIT_LABEL,
            value: lengths.main_conduit.display_text(),
        },
        SummaryRow {
            label: INTER_PROBE_RUN_LABEL,
            value: lengths.inter_probe_run.display_text(),
        },
    ];
    ConfigurationSummary { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_optional_fittings_read_not_selected() {
        let mut d = ConfigurationDraft::default();
        d.set_field(FieldKey::ChamberType, "GN 2");
        d.set_field(FieldKey::HvbSize, "110");
        let s = build_summary(&d, &LengthPolicy::default());
        assert_eq!(s.value("Schachttyp"), Some("GN 2"));
        assert_eq!(s.value("HVB-Größe"), Some("110mm"));
        assert_eq!(s.value("Kugelhahn-Typ"), Some(NOT_SELECTED));
        assert_eq!(s.value("DFM-Typ"), Some(NOT_SELECTED));
        assert_eq!(s.value(MAIN_CONDUIT_LABEL), Some("probe count required."));
    }

    #[test]
    fn lengths_in_meters_when_computable() {
        let mut d = ConfigurationDraft::default();
        d.set_field(FieldKey::ProbeCount, "5");
        d.set_field(FieldKey::ProbeSpacing, "500");
        d.set_field(FieldKey::AllowanceLeft, "50");
        d.set_field(FieldKey::AllowanceRight, "30");
        d.set_field(FieldKey::ConnectionTopology, "beidseitig");
        let s = build_summary(&d, &LengthPolicy::default());
        assert_eq!(s.value(MAIN_CONDUIT_LABEL), Some("2.08 m"));
        assert_eq!(s.value(INTER_PROBE_RUN_LABEL), Some("1.00 m"));
        assert_eq!(s.rows.len(), 11);
        assert!(s.to_string().contains("Sondenabstand:"));
    }
}
