//! Contract types for the configuration API.
//!
//! The server speaks JSON with German keys; the structs here keep English
//! field names and carry the wire names through serde renames. No transport
//! ships with this crate: front-ends implement [`ConfiguratorApi`] over
//! whatever client they use and can reuse [`decode_response`] for bodies.

use std::fmt;

use cf_core::numeric::{Real, parse_number};
use cf_draft::DfmCategory;
use cf_draft::lenient;
use cf_length::ConnectionTopology;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{WizardError, WizardResult};
use crate::payload::ConfigurationPayload;

/// Every endpoint the wizard talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ProbeDiameterOptions,
    ProbeOptions,
    SpacingOptions,
    DfmOptions,
    GnxChamberArticles,
    AllowedHvbSizes,
    ChamberLimits,
    CheckConfiguration,
    GenerateBom,
}

impl Endpoint {
    pub const ALL: [Endpoint; 9] = [
        Self::ProbeDiameterOptions,
        Self::ProbeOptions,
        Self::SpacingOptions,
        Self::DfmOptions,
        Self::GnxChamberArticles,
        Self::AllowedHvbSizes,
        Self::ChamberLimits,
        Self::CheckConfiguration,
        Self::GenerateBom,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::ProbeDiameterOptions => "/api/sonden-durchmesser-options/",
            Self::ProbeOptions => "/api/sonden-options/",
            Self::SpacingOptions => "/api/sondenabstand-options/",
            Self::DfmOptions => "/api/dfm-options/",
            Self::GnxChamberArticles => "/api/gnx-chamber-articles/",
            Self::AllowedHvbSizes => "/api/allowed-hvb-sizes/",
            Self::ChamberLimits => "/api/schachtgrenze-info/",
            Self::CheckConfiguration => "/api/check-configuration/",
            Self::GenerateBom => "/api/generate-bom/",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Decode a JSON response body for `endpoint`.
pub fn decode_response<T: DeserializeOwned>(endpoint: Endpoint, body: &str) -> WizardResult<T> {
    serde_json::from_str(body).map_err(|e| WizardError::api(endpoint, e))
}

/// Encode a request body.
pub fn encode_request<T: Serialize>(endpoint: Endpoint, request: &T) -> WizardResult<String> {
    serde_json::to_string(request).map_err(|e| WizardError::api(endpoint, e))
}

// Requests

/// Body for the endpoints keyed by chamber type alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChamberTypeRequest {
    #[serde(rename = "schachttyp")]
    pub chamber_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOptionsRequest {
    #[serde(rename = "schachttyp")]
    pub chamber_type: String,
    /// Sent as the form shows it, without unit.
    pub hvb_size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingOptionsRequest {
    #[serde(rename = "anschlussart")]
    pub topology: ConnectionTopology,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DfmOptionsRequest {
    pub category: DfmCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GnxArticlesRequest {
    pub hvb_size: i64,
}

// Responses

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiameterOption {
    #[serde(rename = "durchmesser", deserialize_with = "lenient::required_number")]
    pub diameter_mm: Real,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProbeDiameterOptionsResponse {
    #[serde(rename = "sonden_durchmesser_options", default)]
    pub options: Vec<DiameterOption>,
    #[serde(rename = "schachttyp", default)]
    pub chamber_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A probe diameter offered for a chamber type and HVB size, with the probe
/// count range it supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOption {
    #[serde(rename = "durchmesser_sonde")]
    pub diameter: String,
    #[serde(rename = "sondenanzahl_min", default)]
    pub count_min: Option<u32>,
    #[serde(rename = "sondenanzahl_max", default)]
    pub count_max: Option<u32>,
    #[serde(rename = "artikelnummer", default)]
    pub article_number: Option<String>,
    #[serde(rename = "artikelbezeichnung", default)]
    pub description: Option<String>,
}

impl ProbeOption {
    pub fn diameter_mm(&self) -> Option<Real> {
        parse_number(&self.diameter)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProbeOptionsResponse {
    #[serde(rename = "sonden_options", default)]
    pub options: Vec<ProbeOption>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A probe spacing with the allowances that go with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingOption {
    #[serde(rename = "sondenabstand", deserialize_with = "lenient::required_number")]
    pub spacing_mm: Real,
    #[serde(
        rename = "zuschlag_links",
        default,
        deserialize_with = "lenient::number"
    )]
    pub allowance_left_mm: Option<Real>,
    #[serde(
        rename = "zuschlag_rechts",
        default,
        deserialize_with = "lenient::number"
    )]
    pub allowance_right_mm: Option<Real>,
    #[serde(rename = "hinweis", default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub is_standard: bool,
}

impl SpacingOption {
    /// Marked standard explicitly or through its hint text.
    pub fn is_standard_option(&self) -> bool {
        self.is_standard
            || self
                .hint
                .as_deref()
                .is_some_and(|h| h.to_lowercase().contains("standard"))
    }

    /// Option text as listed: `"500mm (Standard)"`.
    pub fn label(&self) -> String {
        let spacing = cf_core::numeric::format_quantity(self.spacing_mm, 2);
        match self.hint.as_deref().filter(|h| !h.is_empty()) {
            Some(hint) => format!("{spacing}mm ({hint})"),
            None => format!("{spacing}mm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpacingOptionsResponse {
    #[serde(rename = "abstand_options", default)]
    pub options: Vec<SpacingOption>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DfmOptionsResponse {
    #[serde(rename = "dfm_options", default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GnxArticle {
    pub id: u64,
    #[serde(rename = "artikelnummer", default)]
    pub article_number: Option<String>,
    #[serde(rename = "artikelbezeichnung", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_automatic: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GnxArticlesResponse {
    #[serde(default)]
    pub articles: Vec<GnxArticle>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllowedHvbSizesResponse {
    #[serde(default, deserialize_with = "lenient::number_list")]
    pub allowed_sizes: Vec<Real>,
    #[serde(default)]
    pub all_allowed: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl AllowedHvbSizesResponse {
    /// An empty list means no restriction.
    pub fn allows(&self, hvb_size_mm: Real) -> bool {
        self.all_allowed
            || self.allowed_sizes.is_empty()
            || self
                .allowed_sizes
                .iter()
                .any(|s| cf_core::numeric::nearly_equal(*s, hvb_size_mm, Default::default()))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChamberLimitsResponse {
    #[serde(rename = "max_sondenanzahl", default)]
    pub max_probe_count: Option<u32>,
    #[serde(rename = "min_sondenanzahl", default)]
    pub min_probe_count: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What the server knows about the configuration under review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The exact configuration exists and has an article number.
    FullConfiguration {
        article_number: String,
        #[serde(default)]
        configuration_id: Option<u64>,
        #[serde(default)]
        message: String,
    },
    /// The base configuration has a mother article but this variant has no
    /// child number yet.
    MotherArticle {
        mother_article_number: String,
        suggested_child_number: String,
        #[serde(default)]
        message: String,
    },
    NewConfiguration {
        #[serde(default)]
        message: String,
    },
}

impl CheckOutcome {
    pub fn message(&self) -> &str {
        match self {
            Self::FullConfiguration { message, .. }
            | Self::MotherArticle { message, .. }
            | Self::NewConfiguration { message } => message,
        }
    }

    /// Status badge shown next to the article number.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::FullConfiguration { .. } => "Bestehende Konfiguration",
            Self::MotherArticle { .. } => "Mutterartikel vorhanden",
            Self::NewConfiguration { .. } => "Neue Konfiguration",
        }
    }

    /// Whether review needs an article number typed in before the BOM can
    /// be generated.
    pub fn requires_article_input(&self) -> bool {
        !matches!(self, Self::FullConfiguration { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomItem {
    #[serde(rename = "artikelnummer")]
    pub article_number: String,
    #[serde(rename = "artikelbezeichnung", default)]
    pub description: String,
    #[serde(rename = "menge", deserialize_with = "lenient::required_number")]
    pub quantity: Real,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BomResponse {
    pub success: bool,
    #[serde(default)]
    pub configuration_id: Option<u64>,
    #[serde(default)]
    pub bom_items: Vec<BomItem>,
    #[serde(default)]
    pub article_number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One method per endpoint. Implementations report transport and decoding
/// failures as [`WizardError::Api`]; server-side "error" fields are part of
/// the response and left to the caller.
pub trait ConfiguratorApi {
    fn probe_diameter_options(
        &self,
        request: &ChamberTypeRequest,
    ) -> WizardResult<ProbeDiameterOptionsResponse>;

    fn probe_options(&self, request: &ProbeOptionsRequest) -> WizardResult<ProbeOptionsResponse>;

    fn spacing_options(
        &self,
        request: &SpacingOptionsRequest,
    ) -> WizardResult<SpacingOptionsResponse>;

    fn dfm_options(&self, request: &DfmOptionsRequest) -> WizardResult<DfmOptionsResponse>;

    fn gnx_chamber_articles(
        &self,
        request: &GnxArticlesRequest,
    ) -> WizardResult<GnxArticlesResponse>;

    fn allowed_hvb_sizes(&self, request: &ChamberTypeRequest)
    -> WizardResult<AllowedHvbSizesResponse>;

    fn chamber_limits(&self, request: &ChamberTypeRequest) -> WizardResult<ChamberLimitsResponse>;

    fn check_configuration(&self, payload: &ConfigurationPayload) -> WizardResult<CheckOutcome>;

    fn generate_bom(&self, payload: &ConfigurationPayload) -> WizardResult<BomResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths_are_unique() {
        let mut paths: Vec<_> = Endpoint::ALL.iter().map(|e| e.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Endpoint::ALL.len());
        assert_eq!(Endpoint::ChamberLimits.to_string(), "/api/schachtgrenze-info/");
    }

    #[test]
    fn spacing_options_decode_server_decimals() {
        let body = r#"{"abstand_options": [
            {"sondenabstand": "400.00", "zuschlag_links": "100.00", "zuschlag_rechts": "100.00", "hinweis": null},
            {"sondenabstand": 500, "zuschlag_links": 50, "zuschlag_rechts": 30, "hinweis": "Standard"}
        ]}"#;
        let resp: SpacingOptionsResponse = decode_response(Endpoint::SpacingOptions, body).unwrap();
        assert_eq!(resp.options.len(), 2);
        assert_eq!(resp.options[0].spacing_mm, 400.0);
        assert!(!resp.options[0].is_standard_option());
        assert!(resp.options[1].is_standard_option());
        assert_eq!(resp.options[1].label(), "500mm (Standard)");
    }

    #[test]
    fn check_outcome_decodes_each_type() {
        let full: CheckOutcome = decode_response(
            Endpoint::CheckConfiguration,
            r#"{"exists": true, "type": "full_configuration", "article_number": "1000089-002", "configuration_id": 7, "message": "ok"}"#,
        )
        .unwrap();
        assert!(!full.requires_article_input());

        let mother: CheckOutcome = decode_response(
            Endpoint::CheckConfiguration,
            r#"{"exists": true, "type": "mother_article", "mother_article_number": "1000089", "suggested_child_number": "1000089-003", "message": "m"}"#,
        )
        .unwrap();
        assert_eq!(
            mother,
            CheckOutcome::MotherArticle {
                mother_article_number: "1000089".into(),
                suggested_child_number: "1000089-003".into(),
                message: "m".into(),
            }
        );

        let new: CheckOutcome = decode_response(
            Endpoint::CheckConfiguration,
            r#"{"exists": false, "type": "new_configuration", "message": "Neue Konfiguration"}"#,
        )
        .unwrap();
        assert!(new.requires_article_input());
        assert_eq!(new.status_text(), "Neue Konfiguration");
    }

    #[test]
    fn malformed_body_is_an_api_error() {
        let err = decode_response::<BomResponse>(Endpoint::GenerateBom, "not json").unwrap_err();
        assert!(matches!(err, WizardError::Api { ref endpoint, .. } if endpoint == "/api/generate-bom/"));
    }

    #[test]
    fn allowed_sizes_empty_means_unrestricted() {
        let resp = AllowedHvbSizesResponse::default();
        assert!(resp.allows(160.0));
        let resp = AllowedHvbSizesResponse {
            allowed_sizes: vec![90.0, 110.0],
            ..Default::default()
        };
        assert!(resp.allows(110.0));
        assert!(!resp.allows(160.0));
    }

    #[test]
    fn requests_use_wire_names() {
        let body = encode_request(
            Endpoint::SpacingOptions,
            &SpacingOptionsRequest {
                topology: ConnectionTopology::Beidseitig,
            },
        )
        .unwrap();
        assert_eq!(body, r#"{"anschlussart":"beidseitig"}"#);
        let body = encode_request(
            Endpoint::ProbeOptions,
            &ProbeOptionsRequest {
                chamber_type: "GN X1".into(),
                hvb_size: "110".into(),
            },
        )
        .unwrap();
        assert_eq!(body, r#"{"schachttyp":"GN X1","hvb_size":"110"}"#);
    }
}
