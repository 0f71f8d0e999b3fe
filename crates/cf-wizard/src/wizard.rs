//! The configurator wizard: ordered steps, gated transitions, and the
//! dependent option fetches a field change sets off.
//!
//! Fetches come in three flavours. `begin_*` issues a generation token and
//! returns the request to send, `apply_*` takes the response and applies it
//! only if its token is still the latest, and `refresh_*` does both against
//! the wizard's own [`ConfiguratorApi`].

use std::fmt;

use cf_draft::validate::validate_values;
use cf_draft::{ArticleNumbers, ConfigurationDraft, DraftFile, DraftLengths, FieldKey};
use cf_length::ProbeCountBounds;
use uuid::Uuid;

use crate::api::{
    AllowedHvbSizesResponse, BomResponse, ChamberLimitsResponse, ChamberTypeRequest, CheckOutcome,
    ConfiguratorApi, DfmOptionsRequest, DfmOptionsResponse, GnxArticlesRequest,
    GnxArticlesResponse, ProbeDiameterOptionsResponse, ProbeOptionsRequest, ProbeOptionsResponse,
    SpacingOptionsRequest, SpacingOptionsResponse,
};
use crate::error::{WizardError, WizardResult};
use crate::guard::{Pending, RequestGuard, RequestKind};
use crate::options::{OptionSets, SyncReport, View, resolve_views};
use crate::payload::ConfigurationPayload;
use crate::settings::Settings;
use crate::summary::{ConfigurationSummary, build_summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    Basics,
    Probes,
    Fittings,
    Review,
    Result,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        Self::Basics,
        Self::Probes,
        Self::Fittings,
        Self::Review,
        Self::Result,
    ];

    /// 1-based position, as shown in the step indicator.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Basics => "Grunddaten",
            Self::Probes => "Sonden",
            Self::Fittings => "Armaturen",
            Self::Review => "Prüfung",
            Self::Result => "Ergebnis",
        }
    }

    /// Fields that must be filled before leaving the step forwards.
    pub fn required_fields(self) -> &'static [FieldKey] {
        match self {
            Self::Basics => &[
                FieldKey::ConfigurationName,
                FieldKey::ChamberType,
                FieldKey::HvbSize,
            ],
            Self::Probes => &[
                FieldKey::ProbeDiameter,
                FieldKey::ProbeCount,
                FieldKey::ConnectionTopology,
                FieldKey::ProbeSpacing,
            ],
            Self::Fittings | Self::Review | Self::Result => &[],
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.number()).copied()
    }

    pub fn previous(self) -> Option<Self> {
        (self as usize)
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// Owns everything one configuration session needs.
pub struct Wizard<A> {
    api: A,
    session_id: Uuid,
    settings: Settings,
    draft: ConfigurationDraft,
    step: WizardStep,
    options: OptionSets,
    guard: RequestGuard,
    summary: Option<ConfigurationSummary>,
    check: Option<CheckOutcome>,
    bom: Option<BomResponse>,
}

impl<A: ConfiguratorApi> Wizard<A> {
    pub fn new(api: A, settings: Settings) -> Self {
        let mut draft = ConfigurationDraft::default();
        draft.allowance_left_mm = settings.default_allowance_left_mm;
        draft.allowance_right_mm = settings.default_allowance_right_mm;
        Self::with_draft(api, settings, draft)
    }

    /// Start a session on an existing draft, at the first step.
    pub fn with_draft(api: A, settings: Settings, draft: ConfigurationDraft) -> Self {
        let session_id = Uuid::new_v4();
        tracing::debug!(%session_id, "wizard session started");
        Self {
            api,
            session_id,
            settings,
            draft,
            step: WizardStep::Basics,
            options: OptionSets::default(),
            guard: RequestGuard::new(),
            summary: None,
            check: None,
            bom: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ConfigurationDraft {
        &self.draft
    }

    pub fn options(&self) -> &OptionSets {
        &self.options
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn summary(&self) -> Option<&ConfigurationSummary> {
        self.summary.as_ref()
    }

    pub fn check_outcome(&self) -> Option<&CheckOutcome> {
        self.check.as_ref()
    }

    pub fn bom(&self) -> Option<&BomResponse> {
        self.bom.as_ref()
    }

    pub fn lengths(&self) -> DraftLengths {
        self.draft.lengths(&self.settings.length_policy)
    }

    pub fn probe_count_bounds(&self) -> ProbeCountBounds {
        self.options.probe_count_bounds(&self.draft)
    }

    pub fn payload(&self) -> ConfigurationPayload {
        ConfigurationPayload::from_draft(&self.draft)
    }

    pub fn to_draft_file(&self) -> DraftFile {
        DraftFile::new(self.draft.clone())
    }

    // Field changes

    /// Store a form value and run the fetches that depend on it.
    pub fn set_field(&mut self, key: FieldKey, raw: &str) -> WizardResult<SyncReport> {
        self.set_field_from(key, View::Primary, raw)
    }

    /// Store the value reported by the two views of a field.
    pub fn report_views(
        &mut self,
        key: FieldKey,
        primary: Option<&str>,
        alternative: Option<&str>,
    ) -> WizardResult<SyncReport> {
        let raw = resolve_views(primary, alternative);
        let view = if raw.is_some() && raw == alternative {
            View::Alternative
        } else {
            View::Primary
        };
        self.set_field_from(key, view, raw.unwrap_or_default())
    }

    fn set_field_from(&mut self, key: FieldKey, view: View, raw: &str) -> WizardResult<SyncReport> {
        match key {
            FieldKey::ProbeSpacing => Ok(self.options.select_spacing(&mut self.draft, view, raw)),
            FieldKey::DfmCategory => {
                let mut report = self.options.select_dfm_category(&mut self.draft, raw);
                report.merge(self.refresh_dfm_options()?);
                Ok(report)
            }
            FieldKey::ProbeCount => {
                self.draft.set_field(key, raw);
                Ok(SyncReport {
                    clamped: self.options.clamp_probe_count(&mut self.draft),
                    ..Default::default()
                })
            }
            _ => {
                if self.draft.set_field(key, raw).is_changed() {
                    self.on_field_changed(key)
                } else {
                    Ok(SyncReport::default())
                }
            }
        }
    }

    fn on_field_changed(&mut self, key: FieldKey) -> WizardResult<SyncReport> {
        let mut report = SyncReport::default();
        match key {
            FieldKey::ChamberType => {
                self.options.reset_for_chamber();
                report.merge(self.refresh_allowed_hvb_sizes()?);
                report.merge(self.refresh_chamber_limits()?);
                self.refresh_probe_diameters()?;
                report.merge(self.refresh_probe_options()?);
                self.refresh_gnx_articles()?;
            }
            FieldKey::HvbSize => {
                report.merge(self.refresh_probe_options()?);
                self.refresh_gnx_articles()?;
            }
            FieldKey::ProbeDiameter => {
                report.clamped = self.options.clamp_probe_count(&mut self.draft);
            }
            FieldKey::ConnectionTopology => {
                report.merge(self.refresh_spacing_options()?);
            }
            _ => {}
        }
        Ok(report)
    }

    /// Refetch every dependent option list, e.g. after loading a draft.
    pub fn refresh_all(&mut self) -> WizardResult<SyncReport> {
        let mut report = SyncReport::default();
        report.merge(self.refresh_allowed_hvb_sizes()?);
        report.merge(self.refresh_chamber_limits()?);
        self.refresh_probe_diameters()?;
        report.merge(self.refresh_probe_options()?);
        report.merge(self.refresh_spacing_options()?);
        report.merge(self.refresh_dfm_options()?);
        self.refresh_gnx_articles()?;
        Ok(report)
    }

    pub fn set_gnx_quantity(&mut self, id: u64, raw: &str) -> WizardResult<()> {
        self.options.set_gnx_quantity(&mut self.draft, id, raw)
    }

    // Transitions

    /// Validate the active step and move forward. Entering review builds the
    /// summary and runs the configuration check.
    pub fn next(&mut self) -> WizardResult<WizardStep> {
        let from = self.step;
        let target = match from.next() {
            Some(target) if from != WizardStep::Review => target,
            _ => {
                return Err(WizardError::InvalidTransition {
                    step: from,
                    action: "advance",
                });
            }
        };

        let missing = self.draft.missing(from.required_fields());
        if !missing.is_empty() {
            tracing::debug!(step = %from, ?missing, "required fields missing");
            return Err(WizardError::MissingFields {
                step: from,
                fields: missing,
            });
        }
        validate_values(&self.draft)?;

        self.step = target;
        tracing::debug!(%from, to = %target, "wizard step");
        if target == WizardStep::Review {
            self.enter_review()?;
        }
        Ok(self.step)
    }

    /// Move back one step without validation. No-op at the first step.
    pub fn previous(&mut self) -> WizardResult<WizardStep> {
        let from = self.step;
        if from == WizardStep::Result {
            return Err(WizardError::InvalidTransition {
                step: from,
                action: "go back",
            });
        }
        if let Some(target) = from.previous() {
            if from == WizardStep::Review {
                self.leave_review();
            }
            self.step = target;
            tracing::debug!(%from, to = %target, "wizard step");
        }
        Ok(self.step)
    }

    fn enter_review(&mut self) -> WizardResult<()> {
        self.summary = Some(build_summary(&self.draft, &self.settings.length_policy));
        self.check = None;
        self.refresh_check()
    }

    fn leave_review(&mut self) {
        self.summary = None;
        self.check = None;
        self.guard.invalidate(RequestKind::CheckConfiguration);
        self.draft.article = ArticleNumbers::default();
    }

    /// Article number typed during review: the child number for a mother
    /// article, the full number for a new configuration.
    pub fn set_article_number(&mut self, raw: &str) -> WizardResult<()> {
        let value = Some(raw.trim().to_string()).filter(|s| !s.is_empty());
        match &self.check {
            Some(CheckOutcome::MotherArticle { .. }) => self.draft.article.child = value,
            Some(CheckOutcome::NewConfiguration { .. }) => self.draft.article.full = value,
            Some(CheckOutcome::FullConfiguration { article_number, .. }) => {
                return Err(WizardError::Validation(format!(
                    "existing configuration keeps article number {article_number}"
                )));
            }
            None => {
                return Err(WizardError::InvalidTransition {
                    step: self.step,
                    action: "enter an article number",
                });
            }
        }
        Ok(())
    }

    /// Send the configuration for BOM generation. Success moves to the
    /// result step; a rejection keeps the wizard on review.
    pub fn generate_bom(&mut self) -> WizardResult<&BomResponse> {
        if self.step != WizardStep::Review {
            return Err(WizardError::InvalidTransition {
                step: self.step,
                action: "generate the BOM",
            });
        }
        let missing_article = match &self.check {
            None => {
                return Err(WizardError::InvalidTransition {
                    step: self.step,
                    action: "generate the BOM before the configuration check",
                });
            }
            Some(CheckOutcome::MotherArticle { .. }) if self.draft.article.child.is_none() => {
                Some("Kindartikelnummer")
            }
            Some(CheckOutcome::NewConfiguration { .. }) if self.draft.article.full.is_none() => {
                Some("Neue Artikelnummer")
            }
            Some(_) => None,
        };
        if let Some(field) = missing_article {
            return Err(WizardError::ArticleNumberRequired(field.to_string()));
        }

        let response = self.api.generate_bom(&self.payload())?;
        if !response.success {
            let message = response
                .message
                .or(response.error)
                .unwrap_or_else(|| "Fehler beim Generieren der BOM.".to_string());
            tracing::warn!(%message, "BOM generation rejected");
            return Err(WizardError::BomRejected { message });
        }

        tracing::info!(
            session_id = %self.session_id,
            article_number = response.article_number.as_deref().unwrap_or_default(),
            items = response.bom_items.len(),
            "BOM generated"
        );
        self.step = WizardStep::Result;
        Ok(&*self.bom.insert(response))
    }

    // Configuration check

    pub fn begin_check(&mut self) -> Pending<ConfigurationPayload> {
        let kind = RequestKind::CheckConfiguration;
        Pending {
            kind,
            token: self.guard.issue(kind),
            request: self.payload(),
        }
    }

    pub fn apply_check(&mut self, pending: &Pending<ConfigurationPayload>, outcome: CheckOutcome) {
        if !self.guard.accept(pending.kind, pending.token) {
            return;
        }
        tracing::info!(status = outcome.status_text(), message = outcome.message(), "configuration checked");
        let article = &mut self.draft.article;
        match &outcome {
            CheckOutcome::FullConfiguration { article_number, .. } => {
                article.full = Some(article_number.clone());
            }
            CheckOutcome::MotherArticle {
                mother_article_number,
                suggested_child_number,
                ..
            } => {
                article.mother = Some(mother_article_number.clone());
                article.child = Some(suggested_child_number.clone());
            }
            CheckOutcome::NewConfiguration { .. } => {}
        }
        self.check = Some(outcome);
    }

    pub fn refresh_check(&mut self) -> WizardResult<()> {
        let pending = self.begin_check();
        let outcome = self.api.check_configuration(&pending.request)?;
        self.apply_check(&pending, outcome);
        Ok(())
    }

    // Dependent option fetches

    fn chamber_request(&self) -> Option<ChamberTypeRequest> {
        self.draft
            .chamber_type
            .as_ref()
            .map(|c| ChamberTypeRequest {
                chamber_type: c.to_string(),
            })
    }

    pub fn begin_probe_diameters(&mut self) -> Option<Pending<ChamberTypeRequest>> {
        let request = self.chamber_request()?;
        Some(self.issue(RequestKind::ProbeDiameters, request))
    }

    pub fn apply_probe_diameters(
        &mut self,
        pending: &Pending<ChamberTypeRequest>,
        response: ProbeDiameterOptionsResponse,
    ) {
        if self.guard.accept(pending.kind, pending.token) {
            self.options.apply_probe_diameters(response);
        }
    }

    pub fn refresh_probe_diameters(&mut self) -> WizardResult<()> {
        match self.begin_probe_diameters() {
            Some(pending) => {
                let response = self.api.probe_diameter_options(&pending.request)?;
                self.apply_probe_diameters(&pending, response);
            }
            None => {
                self.guard.invalidate(RequestKind::ProbeDiameters);
                self.options.probe_diameters.clear();
            }
        }
        Ok(())
    }

    pub fn begin_probe_options(&mut self) -> Option<Pending<ProbeOptionsRequest>> {
        let chamber_type = self.draft.chamber_type.as_ref()?.to_string();
        let hvb_size = self.draft.field_text(FieldKey::HvbSize)?;
        Some(self.issue(
            RequestKind::ProbeOptions,
            ProbeOptionsRequest {
                chamber_type,
                hvb_size,
            },
        ))
    }

    pub fn apply_probe_options(
        &mut self,
        pending: &Pending<ProbeOptionsRequest>,
        response: ProbeOptionsResponse,
    ) -> SyncReport {
        if !self.guard.accept(pending.kind, pending.token) {
            return SyncReport::default();
        }
        self.options.apply_probe_options(&mut self.draft, response)
    }

    pub fn refresh_probe_options(&mut self) -> WizardResult<SyncReport> {
        match self.begin_probe_options() {
            Some(pending) => {
                let response = self.api.probe_options(&pending.request)?;
                Ok(self.apply_probe_options(&pending, response))
            }
            None => {
                self.guard.invalidate(RequestKind::ProbeOptions);
                self.options.probe_options.clear();
                Ok(SyncReport::default())
            }
        }
    }

    pub fn begin_spacing_options(&mut self) -> Option<Pending<SpacingOptionsRequest>> {
        let topology = self.draft.connection_topology?;
        Some(self.issue(
            RequestKind::SpacingOptions,
            SpacingOptionsRequest { topology },
        ))
    }

    pub fn apply_spacing_options(
        &mut self,
        pending: &Pending<SpacingOptionsRequest>,
        response: SpacingOptionsResponse,
    ) -> SyncReport {
        if !self.guard.accept(pending.kind, pending.token) {
            return SyncReport::default();
        }
        self.options
            .apply_spacing_options(&mut self.draft, pending.request.topology, response)
    }

    pub fn refresh_spacing_options(&mut self) -> WizardResult<SyncReport> {
        match self.begin_spacing_options() {
            Some(pending) => {
                let response = self.api.spacing_options(&pending.request)?;
                Ok(self.apply_spacing_options(&pending, response))
            }
            None => {
                self.guard.invalidate(RequestKind::SpacingOptions);
                self.options.spacing = None;
                let mut report = SyncReport::default();
                if self.draft.clear_field(FieldKey::ProbeSpacing).is_changed() {
                    report.cleared.push(FieldKey::ProbeSpacing);
                }
                Ok(report)
            }
        }
    }

    pub fn begin_dfm_options(&mut self) -> Option<Pending<DfmOptionsRequest>> {
        let category = self.draft.dfm_category?;
        Some(self.issue(RequestKind::DfmOptions, DfmOptionsRequest { category }))
    }

    pub fn apply_dfm_options(
        &mut self,
        pending: &Pending<DfmOptionsRequest>,
        response: DfmOptionsResponse,
    ) -> SyncReport {
        if !self.guard.accept(pending.kind, pending.token) {
            return SyncReport::default();
        }
        self.options
            .apply_dfm_options(&mut self.draft, pending.request.category, response)
    }

    pub fn refresh_dfm_options(&mut self) -> WizardResult<SyncReport> {
        match self.begin_dfm_options() {
            Some(pending) => {
                let response = self.api.dfm_options(&pending.request)?;
                Ok(self.apply_dfm_options(&pending, response))
            }
            None => {
                self.guard.invalidate(RequestKind::DfmOptions);
                self.options.dfm_types.clear();
                Ok(SyncReport::default())
            }
        }
    }

    pub fn begin_gnx_articles(&mut self) -> Option<Pending<GnxArticlesRequest>> {
        if !self.draft.is_gnx_chamber() {
            return None;
        }
        let hvb_size = self.draft.hvb_size_mm?.round() as i64;
        Some(self.issue(RequestKind::GnxArticles, GnxArticlesRequest { hvb_size }))
    }

    pub fn apply_gnx_articles(
        &mut self,
        pending: &Pending<GnxArticlesRequest>,
        response: GnxArticlesResponse,
    ) {
        if self.guard.accept(pending.kind, pending.token) {
            self.options.apply_gnx_articles(&mut self.draft, response);
        }
    }

    pub fn refresh_gnx_articles(&mut self) -> WizardResult<()> {
        match self.begin_gnx_articles() {
            Some(pending) => {
                let response = self.api.gnx_chamber_articles(&pending.request)?;
                self.apply_gnx_articles(&pending, response);
            }
            None => {
                self.guard.invalidate(RequestKind::GnxArticles);
                self.options.clear_gnx_articles(&mut self.draft);
            }
        }
        Ok(())
    }

    pub fn begin_allowed_hvb_sizes(&mut self) -> Option<Pending<ChamberTypeRequest>> {
        let request = self.chamber_request()?;
        Some(self.issue(RequestKind::AllowedHvbSizes, request))
    }

    pub fn apply_allowed_hvb_sizes(
        &mut self,
        pending: &Pending<ChamberTypeRequest>,
        response: AllowedHvbSizesResponse,
    ) -> SyncReport {
        if !self.guard.accept(pending.kind, pending.token) {
            return SyncReport::default();
        }
        self.options
            .apply_allowed_hvb_sizes(&mut self.draft, response)
    }

    pub fn refresh_allowed_hvb_sizes(&mut self) -> WizardResult<SyncReport> {
        match self.begin_allowed_hvb_sizes() {
            Some(pending) => {
                let response = self.api.allowed_hvb_sizes(&pending.request)?;
                Ok(self.apply_allowed_hvb_sizes(&pending, response))
            }
            None => {
                self.guard.invalidate(RequestKind::AllowedHvbSizes);
                self.options.allowed_hvb = None;
                Ok(SyncReport::default())
            }
        }
    }

    pub fn begin_chamber_limits(&mut self) -> Option<Pending<ChamberTypeRequest>> {
        let request = self.chamber_request()?;
        Some(self.issue(RequestKind::ChamberLimits, request))
    }

    pub fn apply_chamber_limits(
        &mut self,
        pending: &Pending<ChamberTypeRequest>,
        response: ChamberLimitsResponse,
    ) -> SyncReport {
        if !self.guard.accept(pending.kind, pending.token) {
            return SyncReport::default();
        }
        self.options.apply_chamber_limits(
            &mut self.draft,
            &pending.request.chamber_type,
            response,
        )
    }

    pub fn refresh_chamber_limits(&mut self) -> WizardResult<SyncReport> {
        match self.begin_chamber_limits() {
            Some(pending) => {
                let response = self.api.chamber_limits(&pending.request)?;
                Ok(self.apply_chamber_limits(&pending, response))
            }
            None => {
                self.guard.invalidate(RequestKind::ChamberLimits);
                self.options.chamber_bounds = ProbeCountBounds::default();
                Ok(SyncReport::default())
            }
        }
    }

    fn issue<R>(&mut self, kind: RequestKind, request: R) -> Pending<R> {
        let token = self.guard.issue(kind);
        tracing::debug!(?kind, %token, endpoint = %kind.endpoint(), "request issued");
        Pending {
            kind,
            token,
            request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_ordered() {
        assert_eq!(WizardStep::Basics.next(), Some(WizardStep::Probes));
        assert_eq!(WizardStep::Result.next(), None);
        assert_eq!(WizardStep::Basics.previous(), None);
        assert_eq!(WizardStep::Review.previous(), Some(WizardStep::Fittings));
        assert_eq!(WizardStep::Review.to_string(), "4. Prüfung");
    }

    #[test]
    fn only_input_steps_require_fields() {
        assert!(WizardStep::Probes.required_fields().contains(&FieldKey::ProbeSpacing));
        assert!(WizardStep::Fittings.required_fields().is_empty());
    }
}
