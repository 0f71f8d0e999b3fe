//! cf-core: stable foundation for the probe chamber configurator.
//!
//! Contains:
//! - units (uom length types + millimeter/meter constructors)
//! - numeric (Real, tolerances, lenient field parsing, quantity formatting)
//! - ids (request generation tokens)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CfError, CfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
