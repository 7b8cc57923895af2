// File: youddit-core/src/platforms/reddit/client.rs

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::{debug, info, warn};

use crate::Error;
use crate::models::{Platform, VideoId};
use crate::platforms::SubmissionSource;
use crate::platforms::reddit::listing::{collect_video_ids, Listing, SortOrder};

pub const REDDIT_API_BASE: &str = "https://oauth.reddit.com";
/// Reddit never returns more than this many things per listing page.
const MAX_PAGE_SIZE: u32 = 100;

/// Read-only client for subreddit listings.
pub struct RedditClient {
    http: ReqwestClient,
    bearer_token: String,
    base_url: String,
}

impl RedditClient {
    pub fn new(http: ReqwestClient, bearer_token: &str) -> Self {
        Self {
            http,
            bearer_token: bearer_token.to_string(),
            base_url: REDDIT_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetches one listing page.
    pub async fn fetch_listing(
        &self,
        subreddit: &str,
        order: SortOrder,
        limit: u32,
        after: Option<&str>,
    ) -> Result<Listing, Error> {
        let url = format!(
            "{}/r/{}/{}",
            self.base_url,
            subreddit.trim_start_matches("r/"),
            order.as_str()
        );

        let mut query: Vec<(&str, String)> = vec![
            ("limit", limit.to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(t) = order.time_filter() {
            query.push(("t", t.to_string()));
        }
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        let resp = self
            .http
            .get(&url)
            .query(&query)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("Reddit listing network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            warn!("fetch_listing => status={} body={}", status, body_text);
            return Err(Error::Api {
                platform: Platform::Reddit,
                status: status.as_u16(),
                reason: None,
                message: body_text,
            });
        }

        resp.json::<Listing>()
            .await
            .map_err(|e| Error::Platform(format!("Error parsing /r/{subreddit} listing JSON: {e}")))
    }
}

#[async_trait]
impl SubmissionSource for RedditClient {
    async fn fetch_video_ids(
        &self,
        subreddit: &str,
        order: SortOrder,
        limit: u32,
    ) -> Result<Vec<VideoId>, Error> {
        info!("Retrieving URLs from subreddit: {}", subreddit);

        let mut ids = Vec::new();
        let mut seen_submissions: u32 = 0;
        let mut after: Option<String> = None;

        while seen_submissions < limit {
            let page_size = (limit - seen_submissions).min(MAX_PAGE_SIZE);
            let listing = self
                .fetch_listing(subreddit, order, page_size, after.as_deref())
                .await?;

            let mut children = listing.data.children;
            children.truncate(page_size as usize);
            if children.is_empty() {
                break;
            }
            seen_submissions += children.len() as u32;
            collect_video_ids(&children, &mut ids);
            debug!("Read {} submissions from r/{} so far", seen_submissions, subreddit);

            after = listing.data.after;
            if after.is_none() {
                break;
            }
        }

        info!("Retrieved {} URLs from subreddit: {}", ids.len(), subreddit);
        Ok(ids)
    }
}
