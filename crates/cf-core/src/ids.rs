use core::fmt;
use core::num::NonZeroU64;

/// Generation token attached to an outgoing option request.
///
/// - `u64` never wraps in practice
/// - `NonZero` enables `Option<RequestToken>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(NonZeroU64);

impl RequestToken {
    /// The first token ever issued for a request kind.
    pub fn first() -> Self {
        Self(NonZeroU64::MIN)
    }

    /// The token issued after this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// 1-based generation number.
    pub fn generation(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestToken({})", self.generation())
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase() {
        let a = RequestToken::first();
        let b = a.next();
        assert_eq!(a.generation(), 1);
        assert_eq!(b.generation(), 2);
        assert!(b > a);
    }

    #[test]
    fn option_token_is_small() {
        assert_eq!(
            core::mem::size_of::<RequestToken>(),
            core::mem::size_of::<Option<RequestToken>>()
        );
    }
}
