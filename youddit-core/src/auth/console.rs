use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use crate::Error;
use crate::auth::{AuthenticationHandler, AuthenticationPrompt, AuthenticationResponse};

/// Prints prompts to stdout and, for code prompts, reads the answer from stdin.
#[derive(Debug, Default)]
pub struct ConsoleAuthHandler;

impl ConsoleAuthHandler {
    pub fn new() -> Self {
        Self
    }
}

/// Accepts either a bare authorization code or the full redirect URL the browser landed on.
pub fn extract_code(input: &str) -> Option<AuthenticationResponse> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(input) {
        let mut code = None;
        let mut state = None;
        for (k, v) in url.query_pairs() {
            match k.as_ref() {
                "code" => code = Some(v.into_owned()),
                "state" => state = Some(v.into_owned()),
                _ => {}
            }
        }
        return code.map(|code| AuthenticationResponse::Code { code, state });
    }
    Some(AuthenticationResponse::Code { code: input.to_string(), state: None })
}

#[async_trait]
impl AuthenticationHandler for ConsoleAuthHandler {
    async fn handle_prompt(&self, prompt: AuthenticationPrompt) -> Result<AuthenticationResponse, Error> {
        match prompt {
            AuthenticationPrompt::Browser { url } => {
                println!("Please visit this URL to authorize this application: {}", url);
                Ok(AuthenticationResponse::None)
            }
            AuthenticationPrompt::Code { url, message } => {
                println!("Please visit this URL to authorize this application: {}", url);
                println!("{}", message);

                let mut line = String::new();
                BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
                extract_code(&line)
                    .ok_or_else(|| Error::Auth("No authorization code entered".into()))
            }
            AuthenticationPrompt::None => Ok(AuthenticationResponse::None),
        }
    }
}
