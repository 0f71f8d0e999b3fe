//! Generation tokens for dependent option requests.
//!
//! Each request kind keeps the token of its latest request. A response
//! carrying an older token lost the race and is dropped.

use std::collections::BTreeMap;

use cf_core::RequestToken;

use crate::api::Endpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestKind {
    ProbeDiameters,
    ProbeOptions,
    SpacingOptions,
    DfmOptions,
    GnxArticles,
    AllowedHvbSizes,
    ChamberLimits,
    CheckConfiguration,
}

impl RequestKind {
    pub fn endpoint(self) -> Endpoint {
        match self {
            Self::ProbeDiameters => Endpoint::ProbeDiameterOptions,
            Self::ProbeOptions => Endpoint::ProbeOptions,
            Self::SpacingOptions => Endpoint::SpacingOptions,
            Self::DfmOptions => Endpoint::DfmOptions,
            Self::GnxArticles => Endpoint::GnxChamberArticles,
            Self::AllowedHvbSizes => Endpoint::AllowedHvbSizes,
            Self::ChamberLimits => Endpoint::ChamberLimits,
            Self::CheckConfiguration => Endpoint::CheckConfiguration,
        }
    }
}

/// A request that has been issued and awaits its response.
#[derive(Debug, Clone, PartialEq)]
pub struct Pending<R> {
    pub kind: RequestKind,
    pub token: RequestToken,
    pub request: R,
}

#[derive(Debug, Default, Clone)]
pub struct RequestGuard {
    latest: BTreeMap<RequestKind, RequestToken>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next token for `kind`, superseding any in flight.
    pub fn issue(&mut self, kind: RequestKind) -> RequestToken {
        let token = self
            .latest
            .get(&kind)
            .map_or_else(RequestToken::first, |t| t.next());
        self.latest.insert(kind, token);
        token
    }

    pub fn latest(&self, kind: RequestKind) -> Option<RequestToken> {
        self.latest.get(&kind).copied()
    }

    /// True when `token` is the latest issued for `kind`.
    pub fn accept(&self, kind: RequestKind, token: RequestToken) -> bool {
        let latest = self.latest(kind);
        if latest == Some(token) {
            true
        } else {
            tracing::debug!(?kind, %token, ?latest, "dropping stale response");
            false
        }
    }

    /// Forget every in-flight request so late responses are dropped.
    pub fn invalidate(&mut self, kind: RequestKind) {
        if self.latest.contains_key(&kind) {
            self.issue(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_is_accepted() {
        let mut g = RequestGuard::new();
        let a = g.issue(RequestKind::SpacingOptions);
        let b = g.issue(RequestKind::SpacingOptions);
        assert!(!g.accept(RequestKind::SpacingOptions, a));
        assert!(g.accept(RequestKind::SpacingOptions, b));
    }

    #[test]
    fn kinds_are_independent() {
        let mut g = RequestGuard::new();
        let s = g.issue(RequestKind::SpacingOptions);
        let _ = g.issue(RequestKind::ProbeOptions);
        let _ = g.issue(RequestKind::ProbeOptions);
        assert!(g.accept(RequestKind::SpacingOptions, s));
        assert_eq!(g.latest(RequestKind::ProbeOptions).map(|t| t.generation()), Some(2));
        assert_eq!(g.latest(RequestKind::DfmOptions), None);
    }

    #[test]
    fn invalidate_drops_in_flight_response() {
        let mut g = RequestGuard::new();
        let t = g.issue(RequestKind::GnxArticles);
        g.invalidate(RequestKind::GnxArticles);
        assert!(!g.accept(RequestKind::GnxArticles, t));
    }

    #[test]
    fn token_from_another_kind_is_rejected() {
        let mut g = RequestGuard::new();
        let t = g.issue(RequestKind::DfmOptions);
        assert!(!g.accept(RequestKind::ChamberLimits, t));
    }
}
