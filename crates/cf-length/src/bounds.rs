//! Probe count bounds per chamber type.

use serde::{Deserialize, Serialize};

/// Hard floor for the number of probes in any chamber.
pub const MIN_PROBE_COUNT: u32 = 2;

/// Allowed probe count range. `max` is `None` when no limit is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeCountBounds {
    pub min: u32,
    pub max: Option<u32>,
}

impl Default for ProbeCountBounds {
    fn default() -> Self {
        Self {
            min: MIN_PROBE_COUNT,
            max: None,
        }
    }
}

impl ProbeCountBounds {
    /// Narrow by a probe option's own `[min, max]` range. The floor of two
    /// always holds, and a narrower max wins.
    pub fn narrowed(self, option_min: Option<u32>, option_max: Option<u32>) -> Self {
        let min = option_min.map_or(self.min, |m| m.max(self.min));
        let max = match (self.max, option_max) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self {
            min,
            max: max.map(|m| m.max(min)),
        }
    }

    pub fn contains(&self, count: i64) -> bool {
        count >= i64::from(self.min) && self.max.is_none_or(|m| count <= i64::from(m))
    }

    /// Clamp a count into range: below `min` becomes `min`, above a known
    /// `max` becomes `max`.
    pub fn clamp(&self, count: i64) -> u32 {
        let min = i64::from(self.min);
        let mut clamped = count.max(min);
        if let Some(max) = self.max {
            clamped = clamped.min(i64::from(max));
        }
        if clamped != count {
            tracing::debug!(count, clamped, "probe count clamped into range");
        }
        u32::try_from(clamped).unwrap_or(self.min)
    }

    /// Range hint shown under the probe count field.
    pub fn range_hint(&self) -> String {
        match self.max {
            Some(max) => format!("Erlaubter Bereich: {} - {} Sonden", self.min, max),
            None => format!("Mindestens {} Sonden", self.min),
        }
    }
}

/// Bounds for a chamber type given the limit reported by the chamber limits
/// endpoint, if any. A reported max below the floor is raised to the floor.
pub fn derive_probe_count_bounds(chamber_type: &str, server_max: Option<u32>) -> ProbeCountBounds {
    let max = server_max.map(|m| {
        if m < MIN_PROBE_COUNT {
            tracing::warn!(chamber_type, max = m, "chamber limit below probe floor");
        }
        m.max(MIN_PROBE_COUNT)
    });
    tracing::debug!(chamber_type, ?max, "derived probe count bounds");
    ProbeCountBounds {
        min: MIN_PROBE_COUNT,
        max,
    }
}
