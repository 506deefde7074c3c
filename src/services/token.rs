use crate::config::ApiSettings;
use crate::error::AuthError;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;

/// Bearer credential for a single update call. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        AccessToken(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

pub async fn acquire_token(client: &Client, settings: &ApiSettings) -> Result<AccessToken, AuthError> {
    let url = settings.token_url();
    log::debug!("Requesting access token from {}", url);

    let form = [
        ("client_id", settings.client_id.as_str()),
        ("grant_type", "client_credentials"),
        ("client_secret", settings.client_secret.as_str()),
    ];

    let response = client
        .post(&url)
        .form(&form)
        .send()
        .await
        .map_err(AuthError::Request)?;

    let status = response.status();
    let body = response.text().await.map_err(AuthError::Request)?;

    if !status.is_success() {
        return Err(AuthError::Status {
            status: status.as_u16(),
            body,
        });
    }

    parse_token(&body)
}

fn parse_token(body: &str) -> Result<AccessToken, AuthError> {
    let parsed: TokenResponse = serde_json::from_str(body)
        .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

    let token = match parsed.access_token {
        Some(token) if !token.is_empty() => token,
        _ => {
            return Err(AuthError::MalformedResponse(
                "response has no access_token".to_string(),
            ))
        }
    };

    log::debug!(
        "Token issued (type: {}, expires in: {})",
        parsed.token_type.as_deref().unwrap_or("unspecified"),
        parsed
            .expires_in
            .map(|secs| format!("{}s", secs))
            .unwrap_or_else(|| "unspecified".to_string())
    );

    Ok(AccessToken::new(token))
}
