//! playlistItems: list (paged) and insert.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Error;
use crate::config::PLAYLIST_PAGE_SIZE;
use crate::models::VideoId;
use crate::platforms::youtube::client::YouTubeClient;
use crate::platforms::youtube::error;

/// Response from `GET /playlistItems?part=contentDetails`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub video_id: VideoId,
}

/// JSON body sent to `POST /playlistItems?part=snippet`.
#[derive(Debug, Serialize)]
struct InsertRequest<'a> {
    snippet: InsertSnippet<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertSnippet<'a> {
    playlist_id: &'a str,
    position: u32,
    resource_id: ResourceId<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId<'a> {
    kind: &'a str,
    video_id: &'a str,
}

impl YouTubeClient {
    /// Fetches one page of playlist items.
    pub async fn list_playlist_items_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, Error> {
        let mut query: Vec<(&str, String)> = vec![
            ("part", "contentDetails".to_string()),
            ("maxResults", PLAYLIST_PAGE_SIZE.to_string()),
            ("playlistId", playlist_id.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let resp = self
            .http_client()
            .get(self.endpoint("playlistItems"))
            .query(&query)
            .bearer_auth(self.bearer_token())
            .send()
            .await
            .map_err(|e| Error::Platform(format!("playlistItems.list network error: {e}")))?;

        error::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| Error::Platform(format!("playlistItems.list parse error: {e}")))
    }

    /// Every video id currently in the playlist, following `nextPageToken` to the end.
    pub async fn list_playlist_video_ids(&self, playlist_id: &str) -> Result<HashSet<VideoId>, Error> {
        let mut values = HashSet::new();
        let mut page = self.list_playlist_items_page(playlist_id, None).await?;

        loop {
            values.extend(page.items.into_iter().map(|item| item.content_details.video_id));
            let Some(token) = page.next_page_token else {
                break;
            };
            debug!("getting page {}", token);
            self.pace().await;
            page = self.list_playlist_items_page(playlist_id, Some(&token)).await?;
        }

        Ok(values)
    }

    /// Inserts `video_id` at the top of the playlist.
    pub async fn insert_playlist_item(&self, playlist_id: &str, video_id: &VideoId) -> Result<(), Error> {
        let body = InsertRequest {
            snippet: InsertSnippet {
                playlist_id,
                position: 0,
                resource_id: ResourceId {
                    kind: "youtube#video",
                    video_id: video_id.as_str(),
                },
            },
        };

        let resp = self
            .http_client()
            .post(self.endpoint("playlistItems"))
            .query(&[("part", "snippet")])
            .bearer_auth(self.bearer_token())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("playlistItems.insert network error: {e}")))?;

        // Success JSON is ignored; nothing downstream needs it.
        error::check(resp).await?;
        self.pace().await;
        Ok(())
    }
}
