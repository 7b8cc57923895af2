// File: youddit-core/src/platforms/youtube/client.rs

use std::collections::HashSet;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;

use crate::Error;
use crate::config::API_PACING;
use crate::models::VideoId;
use crate::platforms::PlaylistStore;

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// A small wrapper client for the YouTube Data API v3.
///
/// Endpoint calls live in `requests::*`; this struct only carries the token,
/// base URL and the pause inserted between calls.
pub struct YouTubeClient {
    http: ReqwestClient,
    bearer_token: String,
    base_url: String,
    pacing: Duration,
}

impl YouTubeClient {
    pub fn new(http: ReqwestClient, bearer_token: &str) -> Self {
        Self {
            http,
            bearer_token: bearer_token.to_string(),
            base_url: YOUTUBE_API_BASE.to_string(),
            pacing: API_PACING,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn http_client(&self) -> &ReqwestClient {
        &self.http
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn pace(&self) {
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
    }
}

#[async_trait]
impl PlaylistStore for YouTubeClient {
    async fn list_video_ids(&self, playlist_id: &str) -> Result<HashSet<VideoId>, Error> {
        self.list_playlist_video_ids(playlist_id).await
    }

    async fn insert_video(&self, playlist_id: &str, video_id: &VideoId) -> Result<(), Error> {
        self.insert_playlist_item(playlist_id, video_id).await
    }
}
