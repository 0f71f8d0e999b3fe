//! Service layer for the probe chamber configurator.
//!
//! This crate holds everything between the length engine and a front-end:
//! the wizard state machine, option sync with the configuration API, request
//! guards, summary and payload building, settings, and draft file access.

pub mod api;
pub mod draft_service;
pub mod error;
pub mod guard;
pub mod options;
pub mod payload;
pub mod settings;
pub mod summary;
pub mod wizard;

// Re-export key types for convenience
pub use api::{CheckOutcome, ConfiguratorApi, Endpoint};
pub use draft_service::{compute_lengths, load_draft, save_draft, validate_draft};
pub use error::{WizardError, WizardResult};
pub use guard::{Pending, RequestGuard, RequestKind};
pub use options::{Clamp, OptionSets, SyncReport, View, resolve_views};
pub use payload::{ConfigurationPayload, GnxArticleQuantity};
pub use settings::Settings;
pub use summary::{ConfigurationSummary, SummaryRow, build_summary};
pub use wizard::{Wizard, WizardStep};
