/*
[INPUT]:  Email/OTP, OAuth provider, or JWT credentials
[OUTPUT]: Established sessions and authentication outcomes
[POS]:    Connector layer - authentication strategy dispatch
[UPDATE]: When adding login types or changing session establishment
*/

use tracing::{debug, info, warn};

use super::EmbeddedWalletConnector;
use crate::error::{ConnectorError, Result};
use crate::types::{AuthOutcome, ConnectorEvent, OauthProvider};

impl EmbeddedWalletConnector {
    /// Request a one-time code for `email`.
    ///
    /// The email is held as pending until the code is verified.
    pub async fn send_email_otp(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ConnectorError::EmailRequired);
        }

        self.session.set_pending_email(Some(email.to_string()));
        self.auth.send_otp(email, &self.client_id).await?;
        info!(%email, "one-time code sent");
        Ok(())
    }

    /// Verify `otp` against the pending email
    pub async fn verify_email_otp(&self, otp: &str) -> Result<AuthOutcome> {
        let email = self
            .session
            .pending_email()
            .ok_or(ConnectorError::EmailRequired)?;
        let _guard = self.session.begin_authentication();

        if let Err(err) = self.auth.verify_otp(&email, otp, &self.client_id).await {
            warn!(%email, error = %err, "one-time code rejected");
            return Ok(AuthOutcome::failed(err));
        }

        self.session.set_pending_email(None);
        Ok(self.establish_session(email).await)
    }

    pub async fn social_login(
        &self,
        provider: OauthProvider,
        redirect_url: Option<&str>,
    ) -> Result<AuthOutcome> {
        let _guard = self.session.begin_authentication();
        debug!(%provider, redirect_url, "starting social login");

        match self
            .auth
            .social_login(provider, redirect_url, &self.client_id)
            .await
        {
            Ok(user) => Ok(self.establish_session(user.email).await),
            Err(err) => {
                warn!(%provider, error = %err, "social login failed");
                Ok(AuthOutcome::failed(err))
            }
        }
    }

    /// Authenticate with an externally issued JWT.
    ///
    /// Any failure tears the session down before the error is returned.
    pub async fn custom_jwt(&self, jwt: &str, password: Option<&str>) -> Result<AuthOutcome> {
        let _guard = self.session.begin_authentication();

        let outcome = match self.auth.verify_jwt(jwt, password, &self.client_id).await {
            Ok(user) => self.establish_session(user.email).await,
            Err(err) => AuthOutcome::failed(err),
        };

        match outcome {
            AuthOutcome::Failed { error } => {
                warn!(%error, "jwt authentication failed; clearing session");
                if let Err(err) = self.disconnect().await {
                    warn!(error = %err, "teardown after jwt failure incomplete");
                }
                Err(ConnectorError::AuthenticationFailed(error))
            }
            success => Ok(success),
        }
    }

    async fn establish_session(&self, email: String) -> AuthOutcome {
        if let Err(err) = self.store.save(&email) {
            warn!(%email, error = %err, "failed to persist session");
            return AuthOutcome::failed(err);
        }
        self.session.authenticate(email.clone());

        match self.get_signer().await {
            Ok(_) => {
                info!(%email, "session established");
                self.events.emit(ConnectorEvent::Connected);
                AuthOutcome::success()
            }
            Err(err) => {
                warn!(%email, error = %err, "signer resolution failed after login");
                AuthOutcome::failed(err)
            }
        }
    }
}
