/*
[INPUT]:  HTTP configuration (base URL, timeouts) and auth payloads
[OUTPUT]: Embedded wallet auth backend over REST
[POS]:    HTTP layer - reference AuthBackend implementation
[UPDATE]: When auth endpoints or client behavior change
*/

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::backend::{AuthBackend, AuthenticatedUser};
use crate::error::{ConnectorError, Result};
use crate::types::OauthProvider;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

pub(crate) fn build_http_client(config: &ClientConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()?)
}

/// Read a response, mapping non-2xx statuses to `Api` errors
pub(crate) async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
    let response = builder.send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ConnectorError::api_error(status, message));
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

pub(crate) async fn send_empty(builder: RequestBuilder) -> Result<()> {
    let response = builder.send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ConnectorError::api_error(status, message));
    }
    Ok(())
}

/// Auth backend talking to an embedded wallet service over REST
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    http_client: Client,
    base_url: Url,
}

impl HttpAuthBackend {
    /// Create a new backend with default configuration
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), base_url)
    }

    /// Create a new backend with custom configuration
    pub fn with_config(config: ClientConfig, base_url: &str) -> Result<Self> {
        Ok(Self {
            http_client: build_http_client(&config)?,
            base_url: Url::parse(base_url)?,
        })
    }

    fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        Ok(self.http_client.request(method, url))
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    /// POST /v1/auth/otp/send
    async fn send_otp(&self, email: &str, client_id: &str) -> Result<()> {
        debug!(client_id, "sending email otp");
        let builder = self
            .request(Method::POST, "/v1/auth/otp/send")?
            .json(&json!({ "email": email, "clientId": client_id }));
        send_empty(builder).await
    }

    /// POST /v1/auth/otp/verify
    async fn verify_otp(&self, email: &str, otp: &str, client_id: &str) -> Result<()> {
        let builder = self
            .request(Method::POST, "/v1/auth/otp/verify")?
            .json(&json!({ "email": email, "otp": otp, "clientId": client_id }));
        send_empty(builder).await
    }

    /// POST /v1/auth/oauth/{provider}
    async fn social_login(
        &self,
        provider: OauthProvider,
        redirect_url: Option<&str>,
        client_id: &str,
    ) -> Result<AuthenticatedUser> {
        let endpoint = format!("/v1/auth/oauth/{}", provider.as_str());
        let builder = self
            .request(Method::POST, &endpoint)?
            .json(&json!({ "redirectUrl": redirect_url, "clientId": client_id }));
        send_json(builder).await
    }

    /// POST /v1/auth/jwt
    async fn verify_jwt(
        &self,
        jwt: &str,
        password: Option<&str>,
        client_id: &str,
    ) -> Result<AuthenticatedUser> {
        let builder = self
            .request(Method::POST, "/v1/auth/jwt")?
            .json(&json!({ "jwt": jwt, "password": password, "clientId": client_id }));
        send_json(builder).await
    }

    /// POST /v1/auth/logout
    async fn logout(&self, client_id: &str) -> Result<()> {
        let builder = self
            .request(Method::POST, "/v1/auth/logout")?
            .json(&json!({ "clientId": client_id }));
        send_empty(builder).await
    }
}
