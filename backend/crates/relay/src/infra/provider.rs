//! Hosted Auth Provider Verifier
//!
//! [`TokenVerifier`] backed by the provider's `GET auth/v1/user`.

use platform::provider::{AuthProviderClient, ProviderError, ProviderUser};

use crate::domain::bearer_token::BearerToken;
use crate::domain::user_projection::UserProjection;
use crate::domain::verifier::TokenVerifier;
use crate::error::{RelayError, RelayResult};

/// Verifier that asks the hosted provider on every call
#[derive(Debug, Clone)]
pub struct ProviderTokenVerifier {
    client: AuthProviderClient,
}

impl ProviderTokenVerifier {
    pub fn new(client: AuthProviderClient) -> Self {
        Self { client }
    }
}

impl From<ProviderUser> for UserProjection {
    fn from(user: ProviderUser) -> Self {
        UserProjection::new(user.id, user.email)
    }
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        match err {
            // Network errors, rejected tokens and absent users all look the same
            // to the caller.
            ProviderError::Transport(_)
            | ProviderError::Rejected { .. }
            | ProviderError::MissingUser => RelayError::invalid_token(err.to_string()),
            ProviderError::InvalidConfiguration(_) => RelayError::Unexpected(err.to_string()),
        }
    }
}

impl TokenVerifier for ProviderTokenVerifier {
    async fn verify(&self, token: &BearerToken) -> RelayResult<UserProjection> {
        let user = self.client.get_user(token.as_str()).await?;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::config::ProviderConfig;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn verifier_for(uri: &str) -> ProviderTokenVerifier {
        let config = ProviderConfig::new(uri, "anon").unwrap();
        ProviderTokenVerifier::new(AuthProviderClient::new(config).unwrap())
    }

    fn token(raw: &str) -> BearerToken {
        BearerToken::from_authorization(&format!("Bearer {raw}")).unwrap()
    }

    #[tokio::test]
    async fn verifies_every_call_without_caching() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u1",
                "email": "a@b.com",
                "aud": "authenticated"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let verifier = verifier_for(&server.uri());
        for _ in 0..2 {
            let user = verifier.verify(&token("t1")).await.unwrap();
            assert_eq!(user, UserProjection::new("u1", Some("a@b.com".to_string())));
        }
    }

    #[tokio::test]
    async fn provider_rejection_is_invalid_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "msg": "token is expired"
            })))
            .mount(&server)
            .await;

        let err = verifier_for(&server.uri())
            .verify(&token("expired"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidToken { .. }));
    }

    #[tokio::test]
    async fn unreachable_provider_is_invalid_token() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = verifier_for(&format!("http://127.0.0.1:{port}"))
            .verify(&token("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidToken { .. }));
    }

    #[test]
    fn misconfiguration_is_unexpected() {
        let err: RelayError = ProviderError::InvalidConfiguration("bad".to_string()).into();
        assert!(matches!(err, RelayError::Unexpected(_)));
    }
}
