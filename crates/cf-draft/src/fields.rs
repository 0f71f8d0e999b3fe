//! Flat key/value access to the draft, as filled in by form fields.

use cf_core::numeric::{Real, parse_count, parse_number};
use cf_length::{ConnectionTopology, LayoutForm};

use crate::schema::{ChamberType, ConfigurationDraft, DfmCategory};

/// Every form field that persists into the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    ConfigurationName,
    ChamberType,
    HvbSize,
    ProbeDiameter,
    ProbeCount,
    ProbeSpacing,
    ConnectionTopology,
    LayoutForm,
    AllowanceLeft,
    AllowanceRight,
    ValveType,
    DfmCategory,
    DfmType,
    DfmValveType,
}

impl FieldKey {
    pub const ALL: [FieldKey; 14] = [
        Self::ConfigurationName,
        Self::ChamberType,
        Self::HvbSize,
        Self::ProbeDiameter,
        Self::ProbeCount,
        Self::ProbeSpacing,
        Self::ConnectionTopology,
        Self::LayoutForm,
        Self::AllowanceLeft,
        Self::AllowanceRight,
        Self::ValveType,
        Self::DfmCategory,
        Self::DfmType,
        Self::DfmValveType,
    ];

    /// Key used in the API payloads.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::ConfigurationName => "configuration_name",
            Self::ChamberType => "schachttyp",
            Self::HvbSize => "hvb_size",
            Self::ProbeDiameter => "sonden_durchmesser",
            Self::ProbeCount => "sondenanzahl",
            Self::ProbeSpacing => "sondenabstand",
            Self::ConnectionTopology => "anschlussart",
            Self::LayoutForm => "bauform",
            Self::AllowanceLeft => "zuschlag_links",
            Self::AllowanceRight => "zuschlag_rechts",
            Self::ValveType => "kugelhahn_type",
            Self::DfmCategory => "dfm_category",
            Self::DfmType => "dfm_type",
            Self::DfmValveType => "dfm_kugelhahn_type",
        }
    }

    /// Label shown in the review table.
    pub fn label(self) -> &'static str {
        match self {
            Self::ConfigurationName => "Konfigurationsname",
            Self::ChamberType => "Schachttyp",
            Self::HvbSize => "HVB-Größe",
            Self::ProbeDiameter => "Sonden-Durchmesser",
            Self::ProbeCount => "Anzahl Sonden",
            Self::ProbeSpacing => "Sondenabstand",
            Self::ConnectionTopology => "Anschlussart",
            Self::LayoutForm => "Bauform",
            Self::AllowanceLeft => "Zuschlag links",
            Self::AllowanceRight => "Zuschlag rechts",
            Self::ValveType => "Kugelhahn-Typ",
            Self::DfmCategory => "DFM-Kategorie",
            Self::DfmType => "DFM-Typ",
            Self::DfmValveType => "DFM-Kugelhahn-Typ",
        }
    }

    /// Accepts the wire name or the Rust-style snake case name.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.wire_name() == key || k.draft_name() == key)
    }

    /// Field name inside the draft file.
    pub fn draft_name(self) -> &'static str {
        match self {
            Self::ConfigurationName => "configuration_name",
            Self::ChamberType => "chamber_type",
            Self::HvbSize => "hvb_size_mm",
            Self::ProbeDiameter => "probe_diameter_mm",
            Self::ProbeCount => "probe_count",
            Self::ProbeSpacing => "probe_spacing_mm",
            Self::ConnectionTopology => "connection_topology",
            Self::LayoutForm => "layout_form",
            Self::AllowanceLeft => "allowance_left_mm",
            Self::AllowanceRight => "allowance_right_mm",
            Self::ValveType => "valve_type",
            Self::DfmCategory => "dfm_category",
            Self::DfmType => "dfm_type",
            Self::DfmValveType => "dfm_valve_type",
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Whether a write changed the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange {
    Unchanged,
    Changed,
}

impl FieldChange {
    pub fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }

    fn of<T: PartialEq>(slot: &mut Option<T>, value: Option<T>) -> Self {
        if *slot == value {
            Self::Unchanged
        } else {
            *slot = value;
            Self::Changed
        }
    }
}

fn text(raw: &str) -> Option<String> {
    let t = raw.trim();
    (!t.is_empty()).then(|| t.to_string())
}

fn number(key: FieldKey, raw: &str) -> Option<Real> {
    parsed(key, raw, parse_number)
}

fn parsed<T>(key: FieldKey, raw: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let v = parse(raw);
    if v.is_none() && !raw.trim().is_empty() {
        tracing::warn!(field = %key, raw, "unrecognised value treated as empty");
    }
    v
}

impl ConfigurationDraft {
    /// Store a form value. Empty text clears the field; text that does not
    /// parse for a numeric or enumerated field also clears it.
    pub fn set_field(&mut self, key: FieldKey, raw: &str) -> FieldChange {
        match key {
            FieldKey::ConfigurationName => FieldChange::of(&mut self.configuration_name, text(raw)),
            FieldKey::ChamberType => FieldChange::of(
                &mut self.chamber_type,
                Some(ChamberType::new(raw)).filter(|c| !c.is_empty()),
            ),
            FieldKey::HvbSize => FieldChange::of(&mut self.hvb_size_mm, number(key, raw)),
            FieldKey::ProbeDiameter => {
                FieldChange::of(&mut self.probe_diameter_mm, number(key, raw))
            }
            FieldKey::ProbeCount => {
                FieldChange::of(&mut self.probe_count, parsed(key, raw, parse_count))
            }
            FieldKey::ProbeSpacing => FieldChange::of(&mut self.probe_spacing_mm, number(key, raw)),
            FieldKey::ConnectionTopology => FieldChange::of(
                &mut self.connection_topology,
                parsed(key, raw, ConnectionTopology::parse),
            ),
            FieldKey::LayoutForm => {
                FieldChange::of(&mut self.layout_form, parsed(key, raw, LayoutForm::parse))
            }
            FieldKey::AllowanceLeft => {
                FieldChange::of(&mut self.allowance_left_mm, number(key, raw))
            }
            FieldKey::AllowanceRight => {
                FieldChange::of(&mut self.allowance_right_mm, number(key, raw))
            }
            FieldKey::ValveType => FieldChange::of(&mut self.valve_type, text(raw)),
            FieldKey::DfmCategory => FieldChange::of(
                &mut self.dfm_category,
                parsed(key, raw, DfmCategory::parse),
            ),
            FieldKey::DfmType => FieldChange::of(&mut self.dfm_type, text(raw)),
            FieldKey::DfmValveType => FieldChange::of(&mut self.dfm_valve_type, text(raw)),
        }
    }

    pub fn clear_field(&mut self, key: FieldKey) -> FieldChange {
        self.set_field(key, "")
    }

    /// Current value as form text, `None` when empty.
    pub fn field_text(&self, key: FieldKey) -> Option<String> {
        fn num(v: Option<Real>) -> Option<String> {
            v.map(|x| {
                if x.fract() == 0.0 {
                    format!("{}", x as i64)
                } else {
                    format!("{x}")
                }
            })
        }
        match key {
            FieldKey::ConfigurationName => self.configuration_name.clone(),
            FieldKey::ChamberType => self.chamber_type.as_ref().map(|c| c.to_string()),
            FieldKey::HvbSize => num(self.hvb_size_mm),
            FieldKey::ProbeDiameter => num(self.probe_diameter_mm),
            FieldKey::ProbeCount => self.probe_count.map(|c| c.to_string()),
            FieldKey::ProbeSpacing => num(self.probe_spacing_mm),
            FieldKey::ConnectionTopology => self.connection_topology.map(|t| t.to_string()),
            FieldKey::LayoutForm => self.layout_form.map(|f| f.as_str().to_string()),
            FieldKey::AllowanceLeft => num(self.allowance_left_mm),
            FieldKey::AllowanceRight => num(self.allowance_right_mm),
            FieldKey::ValveType => self.valve_type.clone(),
            FieldKey::DfmCategory => self.dfm_category.map(|c| c.as_str().to_string()),
            FieldKey::DfmType => self.dfm_type.clone(),
            FieldKey::DfmValveType => self.dfm_valve_type.clone(),
        }
    }

    pub fn is_filled(&self, key: FieldKey) -> bool {
        self.field_text(key).is_some()
    }

    /// The subset of `keys` that is still empty, in the given order.
    pub fn missing(&self, keys: &[FieldKey]) -> Vec<FieldKey> {
        keys.iter().copied().filter(|k| !self.is_filled(*k)).collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn field_text_feeds_back_unchanged(v in 0.001f64..1.0e6, count in 2i64..500) {
            let mut d = ConfigurationDraft::default();
            d.set_field(FieldKey::ProbeSpacing, &format!("{v}"));
            d.set_field(FieldKey::ProbeCount, &count.to_string());
            for key in [FieldKey::ProbeSpacing, FieldKey::ProbeCount] {
                let text = d.field_text(key).unwrap();
                prop_assert_eq!(d.set_field(key, &text), FieldChange::Unchanged);
            }
        }

        #[test]
        fn garbage_never_panics(raw in "\\PC{0,12}") {
            let mut d = ConfigurationDraft::default();
            for key in FieldKey::ALL {
                d.set_field(key, &raw);
            }
        }
    }
}
