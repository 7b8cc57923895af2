// tests/test_utils/mod.rs
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use axum::Router;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral loopback port and returns its base URL.
pub async fn spawn_mock_server(router: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    format!("http://{}", addr)
}

/// Requests seen by a mock endpoint, in arrival order.
#[derive(Clone)]
pub struct Recorder<T: Clone> {
    inner: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> Default for Recorder<T> {
    fn default() -> Self {
        Self { inner: Arc::new(Mutex::new(Vec::new())) }
    }
}

impl<T: Clone> Recorder<T> {
    pub fn push(&self, value: T) {
        self.inner.lock().unwrap().push(value);
    }

    pub fn all(&self) -> Vec<T> {
        self.inner.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}
