//! Relay Client
//!
//! Calls the API relay with the current access token and hands back the raw
//! response text. Status codes are not interpreted; error bodies are
//! displayed the same way as successes.

use url::Url;

use crate::error::{SessionError, SessionResult};

const PROFILE_PATH: &str = "api/profile";

#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    profile_url: Url,
}

impl RelayClient {
    pub fn new(api_base: &str) -> SessionResult<Self> {
        let mut base =
            Url::parse(api_base).map_err(|e| SessionError::InvalidRelayUrl(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let profile_url = base
            .join(PROFILE_PATH)
            .map_err(|e| SessionError::InvalidRelayUrl(e.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            profile_url,
        })
    }

    pub fn profile_url(&self) -> &Url {
        &self.profile_url
    }

    /// `GET /api/profile`; no `Authorization` header without a token
    pub async fn profile(&self, access_token: Option<&str>) -> SessionResult<String> {
        let mut request = self.http.get(self.profile_url.clone());
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        tracing::debug!(status = %response.status(), "Relay answered");
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_profile_url_joins_base() {
        let client = RelayClient::new("http://localhost:5174").unwrap();
        assert_eq!(client.profile_url().as_str(), "http://localhost:5174/api/profile");

        let client = RelayClient::new("https://example.com/relay").unwrap();
        assert_eq!(
            client.profile_url().as_str(),
            "https://example.com/relay/api/profile"
        );

        assert!(RelayClient::new("not a url").is_err());
    }

    #[tokio::test]
    async fn test_profile_sends_bearer_and_returns_raw_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile"))
            .and(header("authorization", "Bearer at"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"user":{"id":"u1","email":null}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let text = RelayClient::new(&server.uri())
            .unwrap()
            .profile(Some("at"))
            .await
            .unwrap();
        assert_eq!(text, r#"{"user":{"id":"u1","email":null}}"#);
    }

    #[tokio::test]
    async fn test_profile_without_token_and_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"error":"Missing bearer token"}"#),
            )
            .mount(&server)
            .await;

        let text = RelayClient::new(&server.uri())
            .unwrap()
            .profile(None)
            .await
            .unwrap();
        assert_eq!(text, r#"{"error":"Missing bearer token"}"#);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_profile_unreachable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = RelayClient::new(&format!("http://127.0.0.1:{port}"))
            .unwrap()
            .profile(None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Relay(_)));
    }
}
