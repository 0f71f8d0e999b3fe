//! Request body for check-configuration and generate-BOM.

use cf_core::numeric::Real;
use cf_draft::{ConfigurationDraft, DfmCategory};
use cf_length::{ConnectionTopology, LayoutForm};
use serde::{Deserialize, Serialize, Serializer};

/// GN X article line sent with the BOM request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GnxArticleQuantity {
    pub id: u64,
    pub quantity: Real,
}

/// The draft flattened to the keys the server expects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigurationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_name: Option<String>,
    #[serde(rename = "schachttyp", skip_serializing_if = "Option::is_none")]
    pub chamber_type: Option<String>,
    #[serde(serialize_with = "wire_number", skip_serializing_if = "Option::is_none")]
    pub hvb_size: Option<Real>,
    #[serde(
        rename = "sonden_durchmesser",
        serialize_with = "wire_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub probe_diameter: Option<Real>,
    #[serde(rename = "sondenanzahl", skip_serializing_if = "Option::is_none")]
    pub probe_count: Option<i64>,
    #[serde(
        rename = "sondenabstand",
        serialize_with = "wire_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub probe_spacing: Option<Real>,
    #[serde(rename = "anschlussart", skip_serializing_if = "Option::is_none")]
    pub topology: Option<ConnectionTopology>,
    #[serde(rename = "bauform", default)]
    pub layout_form: LayoutForm,
    #[serde(rename = "kugelhahn_type", skip_serializing_if = "Option::is_none")]
    pub valve_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dfm_category: Option<DfmCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dfm_type: Option<String>,
    #[serde(rename = "dfm_kugelhahn_type", skip_serializing_if = "Option::is_none")]
    pub dfm_valve_type: Option<String>,
    #[serde(
        rename = "zuschlag_links",
        serialize_with = "wire_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowance_left: Option<Real>,
    #[serde(
        rename = "zuschlag_rechts",
        serialize_with = "wire_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowance_right: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_article_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_article_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_article_number: Option<String>,
    /// Present only when GN X articles were loaded for the draft.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gnx_articles: Option<Vec<GnxArticleQuantity>>,
}

impl ConfigurationPayload {
    pub fn from_draft(draft: &ConfigurationDraft) -> Self {
        let gnx_articles = (!draft.gnx_articles.is_empty()).then(|| {
            draft
                .gnx_articles
                .iter()
                .filter(|a| a.quantity > 0.0)
                .map(|a| GnxArticleQuantity {
                    id: a.id,
                    quantity: a.quantity,
                })
                .collect()
        });

        Self {
            configuration_name: draft.configuration_name.clone(),
            chamber_type: draft.chamber_type.as_ref().map(|c| c.to_string()),
            hvb_size: draft.hvb_size_mm,
            probe_diameter: draft.probe_diameter_mm,
            probe_count: draft.probe_count,
            probe_spacing: draft.probe_spacing_mm,
            topology: draft.connection_topology,
            layout_form: draft.effective_layout_form(),
            valve_type: draft.valve_type.clone(),
            dfm_category: draft.dfm_category,
            dfm_type: draft.dfm_type.clone(),
            dfm_valve_type: draft.dfm_valve_type.clone(),
            allowance_left: draft.allowance_left_mm,
            allowance_right: draft.allowance_right_mm,
            full_article_number: draft.article.full.clone(),
            mother_article_number: draft.article.mother.clone(),
            child_article_number: draft.article.child.clone(),
            gnx_articles,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Whole millimetre values go out as integers, matching the server tables.
fn wire_number<S: Serializer>(value: &Option<Real>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as Real => {
            serializer.serialize_i64(*v as i64)
        }
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_none(),
    }
}
