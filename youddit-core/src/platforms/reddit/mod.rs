pub mod auth;
pub mod client;
pub mod listing;

pub use auth::RedditAuthenticator;
pub use client::RedditClient;
pub use listing::{extract_youtube_id, SortOrder};
