//! Formula policy.
//!
//! The U-Form main-conduit formula exists in two revisions. The unified one
//! treats U like I; the earlier folded one multiplied the probe span by 2 twice.

use cf_core::numeric::Real;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthPolicy {
    /// Multiplier applied to the probe span for U-Form layouts.
    #[serde(default = "default_u_form_span_factor")]
    pub u_form_span_factor: Real,
}

fn default_u_form_span_factor() -> Real {
    1.0
}

impl LengthPolicy {
    /// `(n - 1) * spacing + allowances` for both forms.
    pub const UNIFIED: Self = Self {
        u_form_span_factor: 1.0,
    };

    /// `(n - 1) * spacing * 2 * 2 + allowances` for U-Form.
    pub const LEGACY_FOLDED: Self = Self {
        u_form_span_factor: 4.0,
    };
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self::UNIFIED
    }
}
