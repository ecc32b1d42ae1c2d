use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use playmark_core::api::{
    routes::{contents, users, utils as route_utils},
    types::{
        ApiResponse, FinalPositionRequest, HistoryRequest,
        PlaybackPositionRequest, StreamingInfoResponse, SuccessResponse,
        ViewingHistoryEntry,
    },
};
use playmark_model::ContentId;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::sync::RwLock;
use url::Url;

use crate::domains::progress::PlaybackGateway;

/// Non-success answers from the progress server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unauthorized - please login again")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Rejected by server: {0}")]
    BadRequest(String),
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Server did not acknowledge the write")]
    NotAcknowledged,
}

/// HTTP client for the Playmark API with bearer authentication.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

/// Add `http://` when no scheme was given and drop trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme = if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
    {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    Url::parse(&with_scheme)
        .with_context(|| format!("invalid server URL '{}'", raw))?;

    if with_scheme != raw {
        warn!(
            "[ApiClient] Normalized base URL from '{}' to '{}'",
            raw, with_scheme
        );
    }
    Ok(with_scheme)
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to create HTTP client")?;

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        Ok(Self {
            client,
            base_url,
            token_store: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        format!("{}/{}", self.base_url, path.as_ref().trim_start_matches('/'))
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    pub async fn get_token(&self) -> Option<String> {
        self.token_store.read().await.clone()
    }

    async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.bearer_auth(token)
        } else {
            builder
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET {}", url);

        let request = self.build_request(self.client.get(&url)).await;
        let response = request.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let url = self.build_url(path);
        debug!("[ApiClient] POST {}", url);

        let request = self.build_request(self.client.post(&url).json(body)).await;
        let response = request.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<R>().await?)
    }

    async fn post_acknowledged<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<()> {
        let ack: SuccessResponse = self.post(path, body).await?;
        if ack.success {
            Ok(())
        } else {
            Err(ClientError::NotAcknowledged.into())
        }
    }

    /// In-progress rows for the signed-in user, newest first.
    pub async fn continue_watching(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ViewingHistoryEntry>> {
        let limit = limit.map(|l| l.to_string());
        let path = match limit.as_deref() {
            Some(limit) => route_utils::with_query(
                users::CONTINUE_WATCHING,
                &[("limit", limit)],
            ),
            None => users::CONTINUE_WATCHING.to_string(),
        };

        let response: ApiResponse<Vec<ViewingHistoryEntry>> =
            self.get(&path).await?;
        Ok(response.data.unwrap_or_default())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|body| {
            body["error"]["message"].as_str().map(str::to_string)
        })
        .unwrap_or(text);

    let err = match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
        other => ClientError::Status {
            status: other.as_u16(),
            message,
        },
    };
    Err(err.into())
}

#[async_trait]
impl PlaybackGateway for ApiClient {
    async fn stream_info(
        &self,
        content_id: ContentId,
    ) -> Result<StreamingInfoResponse> {
        self.get(&route_utils::content_path(contents::STREAM, content_id))
            .await
    }

    async fn update_playback(
        &self,
        content_id: ContentId,
        request: PlaybackPositionRequest,
    ) -> Result<()> {
        self.post_acknowledged(
            &route_utils::content_path(contents::PLAYBACK, content_id),
            &request,
        )
        .await
    }

    async fn save_final_position(
        &self,
        content_id: ContentId,
        request: FinalPositionRequest,
    ) -> Result<()> {
        self.post_acknowledged(
            &route_utils::content_path(contents::FINAL_POSITION, content_id),
            &request,
        )
        .await
    }

    async fn update_history(
        &self,
        content_id: ContentId,
        request: HistoryRequest,
    ) -> Result<()> {
        self.post_acknowledged(
            &route_utils::content_path(contents::HISTORY, content_id),
            &request,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slash() {
        assert_eq!(
            normalize_base_url("localhost:3000/").unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            normalize_base_url("https://media.example.com").unwrap(),
            "https://media.example.com"
        );
    }

    #[test]
    fn garbage_base_url_is_rejected() {
        assert!(normalize_base_url("http://exa mple.com").is_err());
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(
            client.build_url("/api/contents/1/stream"),
            "http://localhost:3000/api/contents/1/stream"
        );
    }
}
