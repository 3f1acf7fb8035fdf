/*
[INPUT]:  Login payloads from apps, CLI flags or JSON
[OUTPUT]: Typed login requests, one variant per auth strategy
[POS]:    Data layer - auth strategy selection
[UPDATE]: When adding a login strategy or changing wire tags
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, Result};

/// Social OAuth identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OauthProvider {
    #[default]
    Google,
    Apple,
    Facebook,
}

impl OauthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OauthProvider::Google => "google",
            OauthProvider::Apple => "apple",
            OauthProvider::Facebook => "facebook",
        }
    }
}

impl fmt::Display for OauthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OauthProvider {
    type Err = ConnectorError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(OauthProvider::Google),
            "apple" => Ok(OauthProvider::Apple),
            "facebook" => Ok(OauthProvider::Facebook),
            other => Err(ConnectorError::Config(format!(
                "Unsupported OAuth provider: {other}"
            ))),
        }
    }
}

/// Discriminant of [`LoginRequest`], parsed from the `loginType` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginType {
    SocialOAuth,
    OtpVerification,
    Jwt,
}

impl LoginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginType::SocialOAuth => "social_oauth",
            LoginType::OtpVerification => "headless_email_otp_verification",
            LoginType::Jwt => "jwt",
        }
    }
}

impl FromStr for LoginType {
    type Err = ConnectorError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "social_oauth" | "headless_google_oauth" => Ok(LoginType::SocialOAuth),
            "headless_email_otp_verification" => Ok(LoginType::OtpVerification),
            "jwt" => Ok(LoginType::Jwt),
            other => Err(ConnectorError::InvalidLoginType(other.to_string())),
        }
    }
}

/// One login attempt. Exactly one strategy per connect call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "loginType")]
pub enum LoginRequest {
    #[serde(rename = "social_oauth", alias = "headless_google_oauth")]
    SocialOAuth {
        #[serde(default)]
        provider: OauthProvider,
        #[serde(rename = "redirectUrl", default)]
        redirect_url: Option<String>,
    },
    #[serde(rename = "headless_email_otp_verification")]
    OtpVerification { otp: String },
    #[serde(rename = "jwt")]
    Jwt {
        jwt: String,
        #[serde(default)]
        password: Option<String>,
    },
}

impl LoginRequest {
    pub fn social(provider: OauthProvider, redirect_url: Option<String>) -> Self {
        LoginRequest::SocialOAuth {
            provider,
            redirect_url,
        }
    }

    pub fn otp(otp: impl Into<String>) -> Self {
        LoginRequest::OtpVerification { otp: otp.into() }
    }

    pub fn jwt(jwt: impl Into<String>, password: Option<String>) -> Self {
        LoginRequest::Jwt {
            jwt: jwt.into(),
            password,
        }
    }

    pub fn login_type(&self) -> LoginType {
        match self {
            LoginRequest::SocialOAuth { .. } => LoginType::SocialOAuth,
            LoginRequest::OtpVerification { .. } => LoginType::OtpVerification,
            LoginRequest::Jwt { .. } => LoginType::Jwt,
        }
    }

    /// Parse a JSON login payload.
    ///
    /// Unknown or missing `loginType` tags fail with `InvalidLoginType`
    /// before any field validation happens.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let tag = value
            .get("loginType")
            .and_then(|tag| tag.as_str())
            .ok_or_else(|| ConnectorError::InvalidLoginType("<missing>".to_string()))?;
        tag.parse::<LoginType>()?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(raw)?)
    }
}

// Secrets (OTP codes, JWTs, passwords) never reach logs.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginRequest::SocialOAuth {
                provider,
                redirect_url,
            } => f
                .debug_struct("SocialOAuth")
                .field("provider", provider)
                .field("redirect_url", redirect_url)
                .finish(),
            LoginRequest::OtpVerification { .. } => f
                .debug_struct("OtpVerification")
                .field("otp", &"<redacted>")
                .finish(),
            LoginRequest::Jwt { password, .. } => f
                .debug_struct("Jwt")
                .field("jwt", &"<redacted>")
                .field("password", &password.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}
