//! Auth Gateway Trait
//!
//! Provider calls the client makes directly. Implementation is in the
//! infrastructure layer.

use crate::domain::session::Session;
use crate::error::SessionResult;

#[trait_variant::make(AuthGateway: Send)]
pub trait LocalAuthGateway {
    /// Exchange email + password for a new session
    async fn sign_in_with_password(&self, email: &str, password: &str) -> SessionResult<Session>;

    /// Revoke the session behind an access token
    async fn sign_out(&self, access_token: &str) -> SessionResult<()>;
}
