// =============================================================================
// youddit-core/src/auth/mod.rs
// =============================================================================

pub mod callback_server;
pub mod console;
pub mod manager;

pub use callback_server::CallbackServer;
pub use console::ConsoleAuthHandler;
pub use manager::AuthManager;
pub use youddit_common::models::{AuthenticationPrompt, AuthenticationResponse, CallbackResult};
pub use youddit_common::traits::auth_traits::{AuthenticationHandler, PlatformAuthenticator};
