//! Draft schema definitions.

use cf_core::numeric::Real;
use cf_length::{
    ConnectionTopology, InterProbeInput, LayoutForm, LengthOutcome, LengthPolicy,
    MainConduitInput, compute_inter_probe_run_length, compute_main_conduit_length,
};
use serde::{Deserialize, Serialize};

/// Chamber types that unlock the GN X chamber sub-article selection.
pub const GNX_CHAMBER_TYPES: [&str; 4] = ["GN X1", "GN X2", "GN X3", "GN X4"];

/// On-disk wrapper around a draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftFile {
    pub version: u32,
    #[serde(default)]
    pub draft: ConfigurationDraft,
}

impl DraftFile {
    pub fn new(draft: ConfigurationDraft) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            draft,
        }
    }
}

/// The record assembled across wizard steps. Every field stays `None` until
/// the step that sets it has run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConfigurationDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chamber_type: Option<ChamberType>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub hvb_size_mm: Option<Real>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub probe_diameter_mm: Option<Real>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub probe_count: Option<i64>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub probe_spacing_mm: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_topology: Option<ConnectionTopology>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_form: Option<LayoutForm>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowance_left_mm: Option<Real>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowance_right_mm: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valve_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dfm_category: Option<DfmCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dfm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dfm_valve_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gnx_articles: Vec<GnxArticleSelection>,
    #[serde(default, skip_serializing_if = "ArticleNumbers::is_empty")]
    pub article: ArticleNumbers,
}

/// Chamber type name, whitespace-normalised (`"GN  X1 "` becomes `"GN X1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ChamberType(String);

impl ChamberType {
    pub fn new(raw: &str) -> Self {
        Self(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// GN X chambers carry an extra sub-article selection.
    pub fn is_gnx(&self) -> bool {
        GNX_CHAMBER_TYPES.contains(&self.0.as_str())
    }
}

impl From<String> for ChamberType {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<ChamberType> for String {
    fn from(value: ChamberType) -> Self {
        value.0
    }
}

impl std::fmt::Display for ChamberType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Flow meter fitting family. DFM types are offered per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DfmCategory {
    Plastic,
    Brass,
}

impl DfmCategory {
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.eq_ignore_ascii_case("plastic") {
            Some(Self::Plastic)
        } else if text.eq_ignore_ascii_case("brass") {
            Some(Self::Brass)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plastic => "plastic",
            Self::Brass => "brass",
        }
    }
}

/// A GN X chamber sub-article and the quantity chosen for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GnxArticleSelection {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_number: Option<String>,
    pub quantity: Real,
    /// Automatic articles keep their quantity; the user cannot edit it.
    #[serde(default)]
    pub is_automatic: bool,
}

/// Article numbers decided during review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ArticleNumbers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
}

impl ArticleNumbers {
    pub fn is_empty(&self) -> bool {
        self.full.is_none() && self.mother.is_none() && self.child.is_none()
    }
}

/// Both displayed lengths for a draft.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftLengths {
    pub main_conduit: LengthOutcome,
    pub inter_probe_run: LengthOutcome,
}

impl ConfigurationDraft {
    pub fn is_gnx_chamber(&self) -> bool {
        self.chamber_type.as_ref().is_some_and(ChamberType::is_gnx)
    }

    /// Layout form sent to the server and used by the formulas; I when unset.
    pub fn effective_layout_form(&self) -> LayoutForm {
        self.layout_form.unwrap_or_default()
    }

    pub fn main_conduit_input(&self) -> MainConduitInput {
        MainConduitInput {
            probe_count: self.probe_count,
            probe_spacing_mm: self.probe_spacing_mm,
            allowance_left_mm: self.allowance_left_mm,
            allowance_right_mm: self.allowance_right_mm,
            layout_form: self.effective_layout_form(),
        }
    }

    pub fn inter_probe_input(&self) -> InterProbeInput {
        InterProbeInput {
            probe_count: self.probe_count,
            probe_spacing_mm: self.probe_spacing_mm,
            connection_topology: self.connection_topology,
        }
    }

    pub fn lengths(&self, policy: &LengthPolicy) -> DraftLengths {
        DraftLengths {
            main_conduit: compute_main_conduit_length(&self.main_conduit_input(), policy),
            inter_probe_run: compute_inter_probe_run_length(&self.inter_probe_input()),
        }
    }
}
