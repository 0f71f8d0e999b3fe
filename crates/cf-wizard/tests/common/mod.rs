//! In-memory configuration API used by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use cf_draft::DfmCategory;
use cf_length::ConnectionTopology;
use cf_wizard::api::*;
use cf_wizard::{ConfigurationPayload, Settings, Wizard, WizardError, WizardResult};

pub struct FakeApi {
    pub check: RefCell<CheckOutcome>,
    pub bom: RefCell<BomResponse>,
    pub calls: RefCell<Vec<Endpoint>>,
    pub bom_payloads: RefCell<Vec<ConfigurationPayload>>,
    pub offline: Cell<bool>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            check: RefCell::new(CheckOutcome::NewConfiguration {
                message: "Neue Konfiguration - Artikelnummer muss erstellt werden".into(),
            }),
            bom: RefCell::new(BomResponse {
                success: true,
                configuration_id: Some(42),
                bom_items: vec![BomItem {
                    article_number: "1000001".into(),
                    description: "Schacht GN X1".into(),
                    quantity: 1.0,
                    source: Some("Schacht".into()),
                }],
                article_number: Some("1000089-003".into()),
                message: Some("BOM erfolgreich generiert".into()),
                error: None,
            }),
            calls: RefCell::new(Vec::new()),
            bom_payloads: RefCell::new(Vec::new()),
            offline: Cell::new(false),
        }
    }
}

impl FakeApi {
    pub fn calls_to(&self, endpoint: Endpoint) -> usize {
        self.calls.borrow().iter().filter(|e| **e == endpoint).count()
    }

    fn call(&self, endpoint: Endpoint) -> WizardResult<()> {
        self.calls.borrow_mut().push(endpoint);
        if self.offline.get() {
            return Err(WizardError::api(endpoint, "connection refused"));
        }
        Ok(())
    }
}

pub fn spacing(mm: f64, left: f64, right: f64, hint: Option<&str>) -> SpacingOption {
    SpacingOption {
        spacing_mm: mm,
        allowance_left_mm: Some(left),
        allowance_right_mm: Some(right),
        hint: hint.map(str::to_string),
        is_standard: false,
    }
}

fn probe(diameter: &str, min: u32, max: u32) -> ProbeOption {
    ProbeOption {
        diameter: diameter.into(),
        count_min: Some(min),
        count_max: Some(max),
        article_number: Some(format!("S-{diameter}")),
        description: Some(format!("Sonde {diameter}")),
    }
}

impl ConfiguratorApi for FakeApi {
    fn probe_diameter_options(
        &self,
        request: &ChamberTypeRequest,
    ) -> WizardResult<ProbeDiameterOptionsResponse> {
        self.call(Endpoint::ProbeDiameterOptions)?;
        Ok(ProbeDiameterOptionsResponse {
            options: [32.0, 40.0]
                .into_iter()
                .map(|d| DiameterOption {
                    diameter_mm: d,
                    label: format!("{d}mm"),
                })
                .collect(),
            chamber_type: Some(request.chamber_type.clone()),
            error: None,
        })
    }

    fn probe_options(&self, _request: &ProbeOptionsRequest) -> WizardResult<ProbeOptionsResponse> {
        self.call(Endpoint::ProbeOptions)?;
        Ok(ProbeOptionsResponse {
            options: vec![probe("32", 2, 12), probe("40", 2, 10)],
            error: None,
        })
    }

    fn spacing_options(
        &self,
        request: &SpacingOptionsRequest,
    ) -> WizardResult<SpacingOptionsResponse> {
        self.call(Endpoint::SpacingOptions)?;
        let options = match request.topology {
            ConnectionTopology::Einseitig => vec![
                spacing(400.0, 100.0, 100.0, None),
                spacing(500.0, 50.0, 30.0, Some("Standard")),
            ],
            ConnectionTopology::Beidseitig => vec![
                spacing(500.0, 50.0, 30.0, Some("standard")),
                spacing(600.0, 80.0, 80.0, None),
            ],
        };
        Ok(SpacingOptionsResponse { options })
    }

    fn dfm_options(&self, request: &DfmOptionsRequest) -> WizardResult<DfmOptionsResponse> {
        self.call(Endpoint::DfmOptions)?;
        let types = match request.category {
            DfmCategory::Plastic => vec!["K-DFM 2-12".to_string(), "K-DFM 5-42".to_string()],
            DfmCategory::Brass => vec!["HC VTR 2-12".to_string()],
        };
        Ok(DfmOptionsResponse { types })
    }

    fn gnx_chamber_articles(
        &self,
        _request: &GnxArticlesRequest,
    ) -> WizardResult<GnxArticlesResponse> {
        self.call(Endpoint::GnxChamberArticles)?;
        Ok(GnxArticlesResponse {
            articles: vec![
                GnxArticle {
                    id: 1,
                    article_number: Some("2000145".into()),
                    description: Some("Deckel".into()),
                    is_automatic: true,
                },
                GnxArticle {
                    id: 2,
                    article_number: Some("2000146".into()),
                    description: Some("Verlängerung".into()),
                    is_automatic: false,
                },
            ],
        })
    }

    fn allowed_hvb_sizes(
        &self,
        request: &ChamberTypeRequest,
    ) -> WizardResult<AllowedHvbSizesResponse> {
        self.call(Endpoint::AllowedHvbSizes)?;
        Ok(match request.chamber_type.as_str() {
            "GN X1" => AllowedHvbSizesResponse {
                allowed_sizes: vec![90.0, 110.0],
                all_allowed: false,
                error: None,
            },
            _ => AllowedHvbSizesResponse {
                all_allowed: true,
                ..Default::default()
            },
        })
    }

    fn chamber_limits(&self, request: &ChamberTypeRequest) -> WizardResult<ChamberLimitsResponse> {
        self.call(Endpoint::ChamberLimits)?;
        let max = match request.chamber_type.as_str() {
            "GN X1" => Some(12),
            "GN X2" => Some(8),
            _ => None,
        };
        Ok(ChamberLimitsResponse {
            max_probe_count: max,
            min_probe_count: Some(2),
            error: max
                .is_none()
                .then(|| "No Schachtgrenze found for this Schachttyp".to_string()),
        })
    }

    fn check_configuration(&self, _payload: &ConfigurationPayload) -> WizardResult<CheckOutcome> {
        self.call(Endpoint::CheckConfiguration)?;
        Ok(self.check.borrow().clone())
    }

    fn generate_bom(&self, payload: &ConfigurationPayload) -> WizardResult<BomResponse> {
        self.call(Endpoint::GenerateBom)?;
        self.bom_payloads.borrow_mut().push(payload.clone());
        Ok(self.bom.borrow().clone())
    }
}

/// A wizard with basics and probes filled in for a GN X1 chamber, on the
/// probes step.
pub fn wizard_on_probes(api: FakeApi) -> Wizard<FakeApi> {
    use cf_draft::FieldKey;

    let mut wizard = Wizard::new(api, Settings::default());
    wizard.set_field(FieldKey::ConfigurationName, "Feld Nord").unwrap();
    wizard.set_field(FieldKey::ChamberType, "GN X1").unwrap();
    wizard.set_field(FieldKey::HvbSize, "110mm").unwrap();
    wizard.next().unwrap();
    wizard.set_field(FieldKey::ProbeDiameter, "40").unwrap();
    wizard.set_field(FieldKey::ProbeCount, "5").unwrap();
    wizard.set_field(FieldKey::ConnectionTopology, "beidseitig").unwrap();
    wizard
}
