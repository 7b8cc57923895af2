//! Subreddit listing types and YouTube link extraction.

use std::fmt;
use std::str::FromStr;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::models::VideoId;

/// Which subreddit listing to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    #[default]
    Hot,
    New,
    Top,
    Controversial,
    Rising,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Hot => "hot",
            SortOrder::New => "new",
            SortOrder::Top => "top",
            SortOrder::Controversial => "controversial",
            SortOrder::Rising => "rising",
        }
    }

    /// `top` and `controversial` are windowed; we always ask for all time.
    pub fn time_filter(&self) -> Option<&'static str> {
        match self {
            SortOrder::Top | SortOrder::Controversial => Some("all"),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hot" => Ok(SortOrder::Hot),
            "new" => Ok(SortOrder::New),
            "top" => Ok(SortOrder::Top),
            "controversial" => Ok(SortOrder::Controversial),
            "rising" => Ok(SortOrder::Rising),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// `GET /r/<sub>/<order>` response.
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    pub after: Option<String>,
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub struct Thing {
    pub data: Submission,
}

/// The only submission field we read.
#[derive(Debug, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub url: String,
}

static YOUTUBE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:https?:)?//)?((?:www|m)\.)?((?:youtube\.com|youtu.be))(/(?:[\w\-]+\?v=|embed/|v/)?)([\w\-]+)(\S+)?$",
    )
    .expect("YouTube URL pattern is valid")
});

/// Pulls the video id out of a YouTube link, or `None` for anything else.
pub fn extract_youtube_id(url: &str) -> Option<VideoId> {
    YOUTUBE_URL_RE
        .captures(url)
        .and_then(|caps| caps.get(5))
        .map(|m| VideoId::from(m.as_str()))
}

/// Video ids from a page of submissions, skipping ids already in `seen`.
pub fn collect_video_ids(children: &[Thing], seen: &mut Vec<VideoId>) {
    for thing in children {
        if let Some(id) = extract_youtube_id(&thing.data.url) {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(url: &str) -> Option<String> {
        extract_youtube_id(url).map(|v| v.to_string())
    }

    #[test]
    fn watch_urls() {
        assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(id("http://m.youtube.com/watch?v=abc-DEF_1&t=42s").as_deref(), Some("abc-DEF_1"));
        assert_eq!(id("youtube.com/watch?v=xyz").as_deref(), Some("xyz"));
        assert_eq!(id("//www.youtube.com/watch?v=xyz").as_deref(), Some("xyz"));
    }

    #[test]
    fn short_and_embed_urls() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ?si=tracking").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(id("https://www.youtube.com/embed/abc_123").as_deref(), Some("abc_123"));
        assert_eq!(id("https://www.youtube.com/v/abc_123?version=3").as_deref(), Some("abc_123"));
    }

    #[test]
    fn non_youtube_urls_are_rejected() {
        assert_eq!(id("https://www.reddit.com/r/videos/comments/abc/title/"), None);
        assert_eq!(id("https://vimeo.com/123456"), None);
        assert_eq!(id("https://i.redd.it/xyz.jpg"), None);
        assert_eq!(id("https://www.youtube.com/watch?v=abc def"), None);
        assert_eq!(id(""), None);
    }

    #[test]
    fn collect_dedupes_in_listing_order() {
        let json = r#"{"data": {"after": null, "children": [
            {"kind": "t3", "data": {"id": "1", "url": "https://youtu.be/bbb"}},
            {"kind": "t3", "data": {"id": "2", "url": "https://example.com"}},
            {"kind": "t3", "data": {"id": "3", "url": "https://www.youtube.com/watch?v=aaa"}},
            {"kind": "t3", "data": {"id": "4", "url": "https://m.youtube.com/watch?v=bbb"}}
        ]}}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        let mut seen = Vec::new();
        collect_video_ids(&listing.data.children, &mut seen);
        assert_eq!(seen, vec![VideoId::from("bbb"), VideoId::from("aaa")]);
    }

    #[test]
    fn sort_order_parse_and_time_filter() {
        assert_eq!("TOP".parse::<SortOrder>().unwrap(), SortOrder::Top);
        assert_eq!(SortOrder::default(), SortOrder::Hot);
        assert_eq!(SortOrder::Top.time_filter(), Some("all"));
        assert_eq!(SortOrder::Rising.time_filter(), None);
        assert!("best".parse::<SortOrder>().is_err());
    }
}
