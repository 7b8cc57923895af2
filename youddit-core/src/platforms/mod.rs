// File: src/platforms/mod.rs

use std::collections::HashSet;
use async_trait::async_trait;
use crate::Error;
use crate::models::VideoId;

pub use reddit::listing::SortOrder;

/// Where candidate videos come from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// Video ids linked from the first `limit` submissions, deduplicated, in listing order.
    async fn fetch_video_ids(
        &self,
        subreddit: &str,
        order: SortOrder,
        limit: u32,
    ) -> Result<Vec<VideoId>, Error>;
}

/// The playlist being filled.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn list_video_ids(&self, playlist_id: &str) -> Result<HashSet<VideoId>, Error>;
    async fn insert_video(&self, playlist_id: &str, video_id: &VideoId) -> Result<(), Error>;
}

pub mod reddit;
pub mod youtube;
