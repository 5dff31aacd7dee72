//! Local axum server with canned responses, for exercising the API client in tests

use std::sync::{Arc, Mutex};

use axum::extract::Request;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

/// Response served for GET on an exact path
#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn new(path: &'static str, status: u16, body: &str) -> Self {
        Self {
            path,
            status,
            body: body.to_string(),
        }
    }
}

/// What the server saw of one request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query exactly as sent, percent-escapes included
    pub uri: String,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    /// Serve `routes` on an ephemeral loopback port until the runtime shuts down.
    /// Unknown paths get a 404 with body `not found`.
    pub async fn start(routes: Vec<Route>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));

        let mut app = Router::new();
        for route in routes {
            let status = StatusCode::from_u16(route.status).expect("valid status code");
            let body = route.body;
            app = app.route(
                route.path,
                get(move || {
                    let body = body.clone();
                    async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }
                }),
            );
        }

        let recorded = requests.clone();
        let app = app
            .fallback(|| async { (StatusCode::NOT_FOUND, "not found") })
            .layer(middleware::from_fn(move |request: Request, next: Next| {
                let recorded = recorded.clone();
                async move {
                    recorded.lock().expect("request log").push(RecordedRequest {
                        method: request.method().to_string(),
                        uri: request.uri().to_string(),
                        headers: request.headers().clone(),
                    });
                    next.run(request).await
                }
            }));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("test listener address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log").clone()
    }
}
