use crate::config::ApiSettings;
use crate::error::UpdateError;
use crate::services::token::AccessToken;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResponse {
    pub status: u16,
    pub body: String,
}

/// PUTs the document. There is no read-back of the group afterwards.
pub async fn push_update(
    client: &Client,
    settings: &ApiSettings,
    group_id: &str,
    token: &AccessToken,
    document: String,
) -> Result<UpdateResponse, UpdateError> {
    let url = settings.group_url(group_id)?;
    log::debug!("Sending group update to {}", url);

    let response = client
        .put(url)
        .header(CONTENT_TYPE, "text/xml")
        .bearer_auth(token.as_str())
        .body(document)
        .send()
        .await
        .map_err(UpdateError::Request)?;

    let status = response.status();
    let body = response.text().await.map_err(UpdateError::Request)?;

    if !status.is_success() {
        return Err(UpdateError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(UpdateResponse {
        status: status.as_u16(),
        body,
    })
}
