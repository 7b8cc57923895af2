use std::sync::Arc;
use std::time::Duration;
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use youddit_common::Error;
use youddit_core::YoudditConfig;
use youddit_core::auth::{AuthManager, AuthenticationResponse, ConsoleAuthHandler, PlatformAuthenticator};
use youddit_core::config::{DEFAULT_AUTH_PORT, DEFAULT_CONF_DIR, DEFAULT_MAX_VIDEOS, REDDIT_USER_AGENT};
use youddit_core::platforms::SortOrder;
use youddit_core::platforms::reddit::{RedditAuthenticator, RedditClient};
use youddit_core::platforms::youtube::{YouTubeAuthenticator, YouTubeClient};
use youddit_core::repositories::FileCredentialsRepository;
use youddit_core::services::{PlaylistSyncService, SyncRequest};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug, Clone)]
#[command(name = "youddit")]
#[command(author, version, about = "Add YouTube videos posted to a subreddit to a YouTube playlist")]
struct Args {
    /// ID of the YouTube playlist to add videos to
    #[arg(short, long)]
    playlist_id: String,

    /// Subreddit to read submissions from
    #[arg(short, long)]
    subreddit: String,

    /// Maximum number of subreddit submissions to look at
    #[arg(short, long, default_value_t = DEFAULT_MAX_VIDEOS,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_videos: u32,

    /// Directory holding reddit.json, youtube.json and the cached YouTube token
    #[arg(short, long, default_value = DEFAULT_CONF_DIR)]
    conf_dir: String,

    /// Subreddit sort order
    #[arg(short, long, value_enum, default_value_t = SortOrder::Hot)]
    order: SortOrder,

    /// Local port for the OAuth redirect
    #[arg(long, default_value_t = DEFAULT_AUTH_PORT)]
    auth_port: u16,

    /// Paste the authorization code instead of waiting for the browser redirect
    #[arg(long, default_value = "false")]
    console_auth: bool,
}

const DEFAULT_LOG_DIRECTIVES: &str = "youddit=info,youddit_core=info";

/// `RUST_LOG` wins when set and valid; the defaults apply only otherwise.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVES))
}

fn init_tracing() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let config = YoudditConfig::from_arg(&args.conf_dir);
    info!("Using config directory {}", config.conf_dir().display());

    let http = reqwest::Client::builder()
        .user_agent(REDDIT_USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()?;

    // Reddit first: a missing reddit.json should fail before any browser prompt.
    let reddit_creds = config.load_reddit_credentials()?;
    let mut reddit_auth = RedditAuthenticator::new(http.clone(), reddit_creds);
    let reddit_token = reddit_auth
        .complete_authentication(AuthenticationResponse::None)
        .await?;
    let reddit = RedditClient::new(http.clone(), &reddit_token.primary_token);

    let secret = config.load_youtube_client_secrets()?;
    let auth_manager = AuthManager::new(
        Box::new(FileCredentialsRepository::new(config.conf_dir())),
        Arc::new(ConsoleAuthHandler::new()),
    );
    let mut youtube_auth = YouTubeAuthenticator::new(http.clone(), secret, args.auth_port, args.console_auth);
    let youtube_token = auth_manager.get_or_authenticate(&mut youtube_auth).await?;
    let youtube = YouTubeClient::new(http, &youtube_token.primary_token);

    let request = SyncRequest {
        playlist_id: args.playlist_id,
        subreddit: args.subreddit,
        order: args.order,
        max_videos: args.max_videos,
    };
    let report = PlaylistSyncService::new(reddit, youtube).sync(&request).await?;
    info!(
        "Added {} of {} new videos ({} failed)",
        report.added.len(),
        report.to_add,
        report.failed.len()
    );
    Ok(())
}
