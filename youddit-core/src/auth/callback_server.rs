use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::{oneshot, Mutex};
use axum::{
    Router,
    routing::get,
    extract::{Query, State},
    response::Html,
    http::StatusCode,
};
use axum_server::{Server, Handle};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use serde::Deserialize;
use tracing::{info, error, debug};

use crate::Error;
use crate::models::CallbackResult;

/// Query string Google redirects back with: ?code=xxx&state=... or ?error=access_denied
#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Shared state for the Axum callback route.
#[derive(Clone)]
struct CallbackServerState {
    /// Taken by the first request carrying a code or an error.
    done_tx: Arc<Mutex<Option<oneshot::Sender<CallbackResult>>>>,
}

/// A one-shot loopback HTTP server that waits for an OAuth redirect on `/callback`.
pub struct CallbackServer {
    addr: SocketAddr,
    result_rx: oneshot::Receiver<CallbackResult>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl CallbackServer {
    /// Binds `127.0.0.1:<port>`; port 0 picks a free one.
    pub async fn start(port: u16) -> Result<Self, Error> {
        let (done_tx, result_rx) = oneshot::channel::<CallbackResult>();
        let state = CallbackServerState {
            done_tx: Arc::new(Mutex::new(Some(done_tx))),
        };

        let app = Router::new()
            .route("/callback", get(handle_callback))
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let bind_addr = SocketAddr::from(([127, 0, 0, 1], port));

        let handle = Handle::new();
        let handle_clone = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown_rx.await;
            handle_clone.graceful_shutdown(Some(Duration::from_secs(1)));
        });

        let server = Server::bind(bind_addr)
            .handle(handle.clone())
            .serve(app.into_make_service());

        tokio::spawn(async move {
            if let Err(e) = server.await {
                error!("Callback server error: {}", e);
            }
            debug!("Callback server shut down.");
        });

        let addr = handle
            .listening()
            .await
            .ok_or_else(|| Error::Auth(format!("Port {} not available for the OAuth callback", port)))?;
        info!("OAuth callback server listening on http://{}", addr);

        Ok(Self {
            addr,
            result_rx,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://{}/callback", self.addr)
    }

    /// Waits for the redirect, then shuts the server down.
    pub async fn wait_for_callback(mut self, timeout: Duration) -> Result<CallbackResult, Error> {
        let received = tokio::time::timeout(timeout, &mut self.result_rx).await;
        self.shutdown();
        received?.map_err(|_| Error::Auth("Callback server stopped before a code arrived".into()))
    }

    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn handle_callback(
    State(state): State<CallbackServerState>,
    Query(query): Query<AuthQuery>,
) -> (StatusCode, Html<String>) {
    if let Some(err) = query.error.as_ref() {
        if let Some(tx) = state.done_tx.lock().await.take() {
            let _ = tx.send(CallbackResult {
                code: None,
                state: query.state.clone(),
                error: Some(err.clone()),
            });
        }
        let desc = query.error_description.clone().unwrap_or_default();
        let msg = format!("<h2>OAuth Error</h2><p>{}</p><p>{}</p>", err, desc);
        return (StatusCode::OK, Html(msg));
    }

    if let Some(code) = query.code.clone() {
        if let Some(tx) = state.done_tx.lock().await.take() {
            let _ = tx.send(CallbackResult {
                code: Some(code),
                state: query.state.clone(),
                error: None,
            });
        }

        let success = r#"
<h2>Authentication Successful</h2>
<p>youddit has your code. You can close this window now.</p>
<script>
  window.onload = function() {
      window.open('about:blank', '_self');
      window.close();
  };
</script>
"#;
        return (StatusCode::OK, Html(success.to_string()));
    }

    let msg = "<h2>Missing 'code' query param</h2><p>Check logs or try again.</p>";
    (StatusCode::BAD_REQUEST, Html(msg.to_string()))
}
