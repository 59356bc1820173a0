//! Bearer Token Value Object
//!
//! An opaque credential taken from `Authorization: Bearer <token>`. No
//! structure is assumed beyond that framing; its only use is being handed
//! to the verifier.

use std::fmt;

/// Opaque bearer credential
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Scheme prefix, matched exactly (case-sensitive, single space)
    pub const PREFIX: &'static str = "Bearer ";

    /// Parse an `Authorization` header value
    ///
    /// Returns `None` for any other scheme or an empty credential.
    pub fn from_authorization(header: &str) -> Option<Self> {
        header
            .strip_prefix(Self::PREFIX)
            .filter(|token| !token.is_empty())
            .map(|token| Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}
