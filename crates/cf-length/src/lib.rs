//! cf-length: length calculation engine for probe chamber layouts.
//!
//! Computes the two lengths shown while configuring a chamber:
//! - main conduit (HVB) length from probe count, spacing, layout form and
//!   left/right allowances
//! - inter-probe run length from probe count, spacing and connection topology
//!
//! Every function here is pure and deterministic. Missing or malformed inputs
//! never produce an error; they produce [`LengthOutcome::NotComputable`]
//! carrying the reason to display instead of a value.
//!
//! # Example
//!
//! ```
//! use cf_length::{compute_main_conduit_length, LayoutForm, LengthPolicy, MainConduitInput};
//!
//! let input = MainConduitInput {
//!     probe_count: Some(5),
//!     probe_spacing_mm: Some(500.0),
//!     allowance_left_mm: Some(50.0),
//!     allowance_right_mm: Some(30.0),
//!     layout_form: LayoutForm::I,
//! };
//! let outcome = compute_main_conduit_length(&input, &LengthPolicy::default());
//! assert_eq!(outcome.result().unwrap().meters_display(), "2.08");
//! ```

pub mod bounds;
pub mod inter_probe;
pub mod layout;
pub mod main_conduit;
pub mod outcome;
pub mod policy;

pub use bounds::{MIN_PROBE_COUNT, ProbeCountBounds, derive_probe_count_bounds};
pub use inter_probe::{InterProbeInput, compute_inter_probe_run_length};
pub use layout::{ConnectionTopology, LayoutForm};
pub use main_conduit::{MainConduitInput, compute_main_conduit_length};
pub use outcome::{LengthOutcome, LengthResult, MissingInput};
pub use policy::LengthPolicy;
