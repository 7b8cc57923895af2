// File: youddit-common/src/models/mod.rs
pub mod auth;
pub mod credential;
pub mod platform;
pub mod video;

pub use auth::{AuthenticationPrompt, AuthenticationResponse, CallbackResult};
pub use credential::CredentialType;
pub use platform::{Platform, PlatformCredential};
pub use video::VideoId;
