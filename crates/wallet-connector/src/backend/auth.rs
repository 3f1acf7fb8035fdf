/*
[INPUT]:  Client id plus strategy payloads (email, OTP, OAuth provider, JWT)
[OUTPUT]: Authenticated user identity or backend errors
[POS]:    Backend layer - external authentication service abstraction
[UPDATE]: When the embedded wallet auth contract changes
*/

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::OauthProvider;

/// Identity returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// Embedded wallet authentication service.
///
/// Implementations own the actual session (cookies, tokens, device shares);
/// the connector only sees success or failure plus the user's email.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Send a one-time password to `email`
    async fn send_otp(&self, email: &str, client_id: &str) -> Result<()>;

    /// Verify the OTP previously sent to `email`
    async fn verify_otp(&self, email: &str, otp: &str, client_id: &str) -> Result<()>;

    /// Run a social OAuth flow
    async fn social_login(
        &self,
        provider: OauthProvider,
        redirect_url: Option<&str>,
        client_id: &str,
    ) -> Result<AuthenticatedUser>;

    /// Verify a custom JWT issued by the app's own auth
    async fn verify_jwt(
        &self,
        jwt: &str,
        password: Option<&str>,
        client_id: &str,
    ) -> Result<AuthenticatedUser>;

    /// Invalidate the backend session
    async fn logout(&self, client_id: &str) -> Result<()>;
}
