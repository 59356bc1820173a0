//! Get Profile Use Case
//!
//! Extracts the bearer token and asks the verifier who it belongs to.

use std::sync::Arc;

use crate::domain::bearer_token::BearerToken;
use crate::domain::user_projection::UserProjection;
use crate::domain::verifier::TokenVerifier;
use crate::error::{RelayError, RelayResult};

/// Get profile use case
pub struct GetProfileUseCase<V>
where
    V: TokenVerifier + Send + Sync + 'static,
{
    verifier: Arc<V>,
}

impl<V> GetProfileUseCase<V>
where
    V: TokenVerifier + Send + Sync + 'static,
{
    pub fn new(verifier: Arc<V>) -> Self {
        Self { verifier }
    }

    /// Resolve the user behind an `Authorization` header value
    ///
    /// The verifier is not contacted when the header is absent or malformed.
    pub async fn execute(&self, authorization: Option<&str>) -> RelayResult<UserProjection> {
        let token = authorization
            .and_then(BearerToken::from_authorization)
            .ok_or(RelayError::MissingBearerToken)?;

        self.verifier.verify(&token).await
    }
}
