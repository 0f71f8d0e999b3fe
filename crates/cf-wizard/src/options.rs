//! Dependent option lists and how they feed back into the draft.
//!
//! Every logical field has one stored value in the draft. The form may show
//! it through two views (the main select and an alternative one); both views
//! read the same option list and the same value. When both report a value,
//! the alternative view wins.
//!
//! The `apply_*` methods take a response that is already known to be the
//! latest one and reconcile the draft with it: values that left the option
//! set are cleared, defaults are filled in, the probe count is clamped.

use cf_core::numeric::{Real, Tolerances, nearly_equal};
use cf_draft::{ConfigurationDraft, DfmCategory, FieldKey, GnxArticleSelection};
use cf_length::{ConnectionTopology, ProbeCountBounds, derive_probe_count_bounds};

use crate::api::{
    AllowedHvbSizesResponse, ChamberLimitsResponse, DiameterOption, DfmOptionsResponse,
    GnxArticle, GnxArticlesResponse, ProbeDiameterOptionsResponse, ProbeOption,
    ProbeOptionsResponse, SpacingOption, SpacingOptionsResponse,
};
use crate::error::{WizardError, WizardResult};

/// One of the two bound views of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Primary,
    Alternative,
}

/// Pick the value reported by the two views of a field. Empty text counts as
/// no report.
pub fn resolve_views<'a>(primary: Option<&'a str>, alternative: Option<&'a str>) -> Option<&'a str> {
    let reported = |v: Option<&'a str>| v.filter(|s| !s.trim().is_empty());
    reported(alternative).or_else(|| reported(primary))
}

/// A probe count moved into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamp {
    pub from: i64,
    pub to: u32,
}

/// What an option update did to the draft.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncReport {
    pub cleared: Vec<FieldKey>,
    pub defaulted: Vec<FieldKey>,
    pub clamped: Option<Clamp>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.cleared.is_empty() && self.defaulted.is_empty() && self.clamped.is_none()
    }

    pub fn merge(&mut self, other: SyncReport) {
        self.cleared.extend(other.cleared);
        self.defaulted.extend(other.defaulted);
        if other.clamped.is_some() {
            self.clamped = other.clamped;
        }
    }

    fn clear(&mut self, draft: &mut ConfigurationDraft, key: FieldKey) {
        if draft.clear_field(key).is_changed() {
            tracing::debug!(field = %key, "cleared value no longer offered");
            self.cleared.push(key);
        }
    }

    fn default_number(&mut self, draft: &mut ConfigurationDraft, key: FieldKey, v: Option<Real>) {
        let text = v.map(|x| x.to_string()).unwrap_or_default();
        if draft.set_field(key, &text).is_changed() {
            self.defaulted.push(key);
        }
    }
}

/// Spacing options are fetched per topology.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacingOptionSet {
    pub topology: ConnectionTopology,
    pub options: Vec<SpacingOption>,
}

impl SpacingOptionSet {
    pub fn find(&self, spacing_mm: Real) -> Option<&SpacingOption> {
        self.options
            .iter()
            .find(|o| same_mm(o.spacing_mm, spacing_mm))
    }

    /// The first option marked standard.
    pub fn standard(&self) -> Option<&SpacingOption> {
        self.options.iter().find(|o| o.is_standard_option())
    }
}

/// What one view shows for a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState<'a, T> {
    pub view: View,
    pub options: &'a [T],
    pub selected: Option<Real>,
}

fn same_mm(a: Real, b: Real) -> bool {
    nearly_equal(a, b, Tolerances::default())
}

/// Option lists owned by the wizard.
#[derive(Debug, Clone, Default)]
pub struct OptionSets {
    pub probe_diameters: Vec<DiameterOption>,
    pub probe_options: Vec<ProbeOption>,
    pub spacing: Option<SpacingOptionSet>,
    pub dfm_types: Vec<String>,
    pub gnx_articles: Vec<GnxArticle>,
    pub allowed_hvb: Option<AllowedHvbSizesResponse>,
    pub chamber_bounds: ProbeCountBounds,
}

impl OptionSets {
    /// Drop everything fetched for the previous chamber type.
    pub fn reset_for_chamber(&mut self) {
        self.probe_diameters.clear();
        self.probe_options.clear();
        self.gnx_articles.clear();
        self.allowed_hvb = None;
        self.chamber_bounds = ProbeCountBounds::default();
    }

    pub fn spacing_view(&self, draft: &ConfigurationDraft, view: View) -> ViewState<'_, SpacingOption> {
        ViewState {
            view,
            options: self
                .spacing
                .as_ref()
                .map(|s| s.options.as_slice())
                .unwrap_or_default(),
            selected: draft.probe_spacing_mm,
        }
    }

    pub fn probe_option_for(&self, diameter_mm: Real) -> Option<&ProbeOption> {
        self.probe_options
            .iter()
            .find(|o| o.diameter_mm().is_some_and(|d| same_mm(d, diameter_mm)))
    }

    /// Chamber bounds narrowed by the selected probe option's range.
    pub fn probe_count_bounds(&self, draft: &ConfigurationDraft) -> ProbeCountBounds {
        match draft.probe_diameter_mm.and_then(|d| self.probe_option_for(d)) {
            Some(option) => self
                .chamber_bounds
                .narrowed(option.count_min, option.count_max),
            None => self.chamber_bounds,
        }
    }

    /// Move the probe count into the current bounds.
    pub fn clamp_probe_count(&self, draft: &mut ConfigurationDraft) -> Option<Clamp> {
        let count = draft.probe_count?;
        let bounds = self.probe_count_bounds(draft);
        if bounds.contains(count) {
            return None;
        }
        let to = bounds.clamp(count);
        tracing::warn!(count, clamped = to, hint = %bounds.range_hint(), "probe count out of range");
        draft.probe_count = Some(i64::from(to));
        Some(Clamp { from: count, to })
    }

    pub fn apply_probe_diameters(&mut self, response: ProbeDiameterOptionsResponse) {
        if let Some(error) = &response.error {
            tracing::warn!(error, "probe diameter options reported an error");
        }
        self.probe_diameters = response.options;
    }

    pub fn apply_probe_options(
        &mut self,
        draft: &mut ConfigurationDraft,
        response: ProbeOptionsResponse,
    ) -> SyncReport {
        if let Some(error) = &response.error {
            tracing::warn!(error, "probe options reported an error");
        }
        self.probe_options = response.options;

        let mut report = SyncReport::default();
        if let Some(d) = draft.probe_diameter_mm
            && self.probe_option_for(d).is_none()
        {
            report.clear(draft, FieldKey::ProbeDiameter);
        }
        report.clamped = self.clamp_probe_count(draft);
        report
    }

    pub fn apply_spacing_options(
        &mut self,
        draft: &mut ConfigurationDraft,
        topology: ConnectionTopology,
        response: SpacingOptionsResponse,
    ) -> SyncReport {
        let set = SpacingOptionSet {
            topology,
            options: response.options,
        };
        let mut report = SyncReport::default();

        // Allowances belong to the option, so a kept spacing takes the
        // allowances of this set's entry.
        let kept = draft.probe_spacing_mm.and_then(|s| set.find(s)).cloned();
        match kept.or_else(|| set.standard().cloned()) {
            Some(option) => {
                tracing::debug!(spacing_mm = option.spacing_mm, %topology, "spacing synced to option");
                report.merge(select_spacing_option(draft, &option));
            }
            None => report.clear(draft, FieldKey::ProbeSpacing),
        }

        self.spacing = Some(set);
        report
    }

    /// Store a spacing picked in `view` and take the allowances it carries.
    pub fn select_spacing(
        &self,
        draft: &mut ConfigurationDraft,
        view: View,
        raw: &str,
    ) -> SyncReport {
        tracing::debug!(?view, raw, "spacing selected");
        let mut report = SyncReport::default();
        draft.set_field(FieldKey::ProbeSpacing, raw);
        let option = draft
            .probe_spacing_mm
            .and_then(|s| self.spacing.as_ref().and_then(|set| set.find(s)))
            .cloned();
        if let Some(option) = option {
            report.merge(select_spacing_option(draft, &option));
        }
        report
    }

    pub fn apply_allowed_hvb_sizes(
        &mut self,
        draft: &mut ConfigurationDraft,
        response: AllowedHvbSizesResponse,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        if let Some(error) = &response.error {
            // Without an answer nothing is known to be disallowed.
            tracing::warn!(error, "allowed HVB sizes reported an error");
            self.allowed_hvb = None;
            return report;
        }
        if let Some(size) = draft.hvb_size_mm
            && !response.allows(size)
        {
            report.clear(draft, FieldKey::HvbSize);
        }
        self.allowed_hvb = Some(response);
        report
    }

    pub fn apply_chamber_limits(
        &mut self,
        draft: &mut ConfigurationDraft,
        chamber_type: &str,
        response: ChamberLimitsResponse,
    ) -> SyncReport {
        if let Some(error) = &response.error {
            tracing::debug!(chamber_type, error, "no chamber limit");
        }
        // A reported minimum raises the floor but never lowers it.
        self.chamber_bounds = derive_probe_count_bounds(chamber_type, response.max_probe_count)
            .narrowed(response.min_probe_count, None);
        SyncReport {
            clamped: self.clamp_probe_count(draft),
            ..Default::default()
        }
    }

    /// Load GN X articles into the draft. Quantities already chosen for an
    /// article survive a reload; new articles start at 1.
    pub fn apply_gnx_articles(
        &mut self,
        draft: &mut ConfigurationDraft,
        response: GnxArticlesResponse,
    ) {
        let selections: Vec<GnxArticleSelection> = response
            .articles
            .iter()
            .map(|article| {
                let previous = draft
                    .gnx_articles
                    .iter()
                    .find(|s| s.id == article.id && !article.is_automatic)
                    .map(|s| s.quantity);
                GnxArticleSelection {
                    id: article.id,
                    article_number: article.article_number.clone(),
                    quantity: previous.unwrap_or(1.0),
                    is_automatic: article.is_automatic,
                }
            })
            .collect();
        draft.gnx_articles = selections;
        self.gnx_articles = response.articles;
    }

    pub fn clear_gnx_articles(&mut self, draft: &mut ConfigurationDraft) {
        self.gnx_articles.clear();
        draft.gnx_articles.clear();
    }

    /// Change the quantity of a loaded GN X article.
    pub fn set_gnx_quantity(
        &self,
        draft: &mut ConfigurationDraft,
        id: u64,
        raw: &str,
    ) -> WizardResult<()> {
        let quantity = cf_core::numeric::parse_number(raw)
            .filter(|q| *q >= 0.0)
            .ok_or_else(|| {
                WizardError::Validation(format!("invalid quantity {raw:?} for GN X article {id}"))
            })?;
        let selection = draft
            .gnx_articles
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| WizardError::Validation(format!("GN X article {id} is not loaded")))?;
        if selection.is_automatic {
            return Err(WizardError::Validation(format!(
                "GN X article {id} is automatic and cannot be changed"
            )));
        }
        selection.quantity = quantity;
        Ok(())
    }

    /// Store the DFM category; a changed category invalidates the type.
    pub fn select_dfm_category(&mut self, draft: &mut ConfigurationDraft, raw: &str) -> SyncReport {
        let mut report = SyncReport::default();
        if draft.set_field(FieldKey::DfmCategory, raw).is_changed() {
            self.dfm_types.clear();
            report.clear(draft, FieldKey::DfmType);
        }
        report
    }

    pub fn apply_dfm_options(
        &mut self,
        draft: &mut ConfigurationDraft,
        category: DfmCategory,
        response: DfmOptionsResponse,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        if draft.dfm_category != Some(category) {
            tracing::debug!(?category, "DFM options for a category no longer selected");
            return report;
        }
        if let Some(t) = draft.dfm_type.as_deref()
            && !response.types.iter().any(|o| o == t)
        {
            report.clear(draft, FieldKey::DfmType);
        }
        self.dfm_types = response.types;
        report
    }
}

fn select_spacing_option(draft: &mut ConfigurationDraft, option: &SpacingOption) -> SyncReport {
    let mut report = SyncReport::default();
    report.default_number(draft, FieldKey::ProbeSpacing, Some(option.spacing_mm));
    report.default_number(draft, FieldKey::AllowanceLeft, option.allowance_left_mm);
    report.default_number(draft, FieldKey::AllowanceRight, option.allowance_right_mm);
    report
}
