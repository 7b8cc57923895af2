/// What the user has to do to finish authenticating a platform.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticationPrompt {
    /// Open `url` in a browser; the authenticator is listening for the redirect itself.
    Browser { url: String },
    /// Open `url` in a browser and paste back the code (or the whole redirect URL).
    Code { url: String, message: String },
    /// Nothing to ask, e.g. app-only grants.
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticationResponse {
    /// A pasted authorization code. `state` is set when a full redirect URL was pasted.
    Code { code: String, state: Option<String> },
    None,
}

/// Structure to hold the final result from the OAuth callback.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackResult {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
