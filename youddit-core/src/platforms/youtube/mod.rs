// File: youddit-core/src/platforms/youtube/mod.rs

pub mod auth;
pub mod client;
pub mod error;
pub mod requests;

pub use auth::YouTubeAuthenticator;
pub use client::YouTubeClient;
