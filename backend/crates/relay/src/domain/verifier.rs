//! Verifier Trait
//!
//! Interface to whatever can resolve a bearer token to a user.
//! Implementation is in infrastructure layer.

use crate::domain::bearer_token::BearerToken;
use crate::domain::user_projection::UserProjection;
use crate::error::RelayResult;

/// Token verifier trait
#[trait_variant::make(TokenVerifier: Send)]
pub trait LocalTokenVerifier {
    /// Verify a token and return the user it belongs to
    ///
    /// Implementations must contact their authority on every call and map
    /// every rejection to [`crate::error::RelayError::InvalidToken`].
    async fn verify(&self, token: &BearerToken) -> RelayResult<UserProjection>;
}
