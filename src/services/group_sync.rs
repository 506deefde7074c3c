use crate::args::InvocationParams;
use crate::config::ApiSettings;
use crate::domain::group_document::GroupUpdateDocument;
use crate::error::{GroupSyncError, Result};
use crate::services::extractor::{extract_members, MEMBER_COLUMN};
use crate::services::token::acquire_token;
use crate::services::update::{push_update, UpdateResponse};
use reqwest::Client;

pub struct GroupSync {
    client: Client,
    settings: ApiSettings,
    member_column: String,
}

impl GroupSync {
    pub fn new(settings: ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GroupSyncError::HttpClient)?;

        Ok(GroupSync {
            client,
            settings,
            member_column: MEMBER_COLUMN.to_string(),
        })
    }

    pub fn with_member_column(mut self, column: impl Into<String>) -> Self {
        self.member_column = column.into();
        self
    }

    pub async fn run(&self, params: &InvocationParams) -> Result<UpdateResponse> {
        let token = acquire_token(&self.client, &self.settings).await?;
        log::info!("Access token acquired");

        let members = extract_members(&params.csv_path, &self.member_column)?;
        log::info!(
            "Extracted {} unique device(s) from {}",
            members.len(),
            params.csv_path.display()
        );
        if members.is_empty() {
            log::warn!("No devices found; the group update will carry an empty member list");
        }

        let document =
            GroupUpdateDocument::new(params.group_id.as_str(), params.group_name.as_str(), members);
        let body = document.to_xml()?;

        let response =
            push_update(&self.client, &self.settings, &params.group_id, &token, body).await?;
        log::info!(
            "Group {} ('{}') updated with status {}",
            params.group_id,
            params.group_name,
            response.status
        );

        Ok(response)
    }
}
