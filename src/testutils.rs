use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::any};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-process stand-in for the upstream clan API. Binds an ephemeral port,
/// answers every request with one canned response, and records the request
/// URIs it saw.
pub struct MockUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockUpstream {
    /// Serve `body` as JSON with a 200 status for any request.
    pub async fn serve(body: Value) -> Self {
        Self::spawn(Duration::ZERO, move || {
            (StatusCode::OK, Json(body.clone())).into_response()
        })
        .await
    }

    /// Serve an empty response with the given status for any request.
    pub async fn serve_status(status: StatusCode) -> Self {
        Self::spawn(Duration::ZERO, move || status.into_response()).await
    }

    /// Serve `body` only after holding each request open for `delay`.
    pub async fn serve_delayed(body: Value, delay: Duration) -> Self {
        Self::spawn(delay, move || {
            (StatusCode::OK, Json(body.clone())).into_response()
        })
        .await
    }

    /// Request URIs (path + query) received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    async fn spawn<F>(delay: Duration, respond: F) -> Self
    where
        F: Fn() -> axum::response::Response + Clone + Send + Sync + 'static,
    {
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let seen = requests.clone();
        let app = Router::new().route(
            "/{*path}",
            any(move |request: Request| {
                seen.lock().unwrap().push(request.uri().to_string());
                let response = respond();
                async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    response
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockUpstream {
            base_url: format!("http://{addr}/wot"),
            requests,
            handle,
        }
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
