//! Mock endpoint server engine and HTTP glue.
//!
//! [`MockServer`] maps (method, path) to a configured route and produces the
//! canned response, applying the route's delay and request-body echo. The
//! axum layer at the bottom of this module feeds every incoming request
//! through a single fallback handler, so routing stays in [`RouteTable`]
//! rather than in the framework.

use crate::config::{ConfigError, GlobalSettings, MockConfig, RouteSpec};
use crate::table::RouteTable;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Largest request body the echo path will read.
const BODY_LIMIT: usize = 1024 * 1024;

/// Mock endpoint server.
///
/// Looks up incoming requests in the compiled route table and emits the
/// configured response. Stateless across requests; only relaxed counters
/// are shared.
pub struct MockServer {
    table: RouteTable,
    settings: GlobalSettings,
    default_response: Option<crate::config::DefaultResponse>,
    /// Total requests processed.
    requests_total: AtomicU64,
    /// Total requests that matched a route.
    requests_matched: AtomicU64,
    /// Total requests no route matched.
    requests_unmatched: AtomicU64,
}

impl MockServer {
    /// Build a server from a validated configuration.
    pub fn new(config: MockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = RouteTable::new(config.routes)?;

        info!(routes = table.len(), "Mock endpoint server initialized");

        Ok(Self {
            table,
            settings: config.settings,
            default_response: config.default_response,
            requests_total: AtomicU64::new(0),
            requests_matched: AtomicU64::new(0),
            requests_unmatched: AtomicU64::new(0),
        })
    }

    /// Number of configured routes.
    pub fn route_count(&self) -> usize {
        self.table.len()
    }

    /// Get total requests processed.
    pub fn total_requests(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    /// Get total requests matched.
    pub fn total_matched(&self) -> u64 {
        self.requests_matched.load(Ordering::Relaxed)
    }

    /// Get total requests unmatched.
    pub fn total_unmatched(&self) -> u64 {
        self.requests_unmatched.load(Ordering::Relaxed)
    }

    /// Handle one request: exact lookup, then the configured response.
    pub async fn handle(&self, method: &str, path: &str, raw_body: &[u8]) -> Response {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        match self.table.lookup(method, path) {
            Some(route) => {
                self.requests_matched.fetch_add(1, Ordering::Relaxed);
                if self.settings.log_matches {
                    info!(
                        method = %method,
                        path = %path,
                        status = route.status,
                        "Request matched route"
                    );
                }
                self.respond(route, raw_body).await
            }
            None => {
                self.requests_unmatched.fetch_add(1, Ordering::Relaxed);
                if self.settings.log_unmatched {
                    warn!(
                        method = %method,
                        path = %path,
                        "No matching route"
                    );
                }
                self.unmatched_response()
            }
        }
    }

    /// Build the response for a matched route.
    async fn respond(&self, route: &RouteSpec, raw_body: &[u8]) -> Response {
        // The delay suspends this request's task only; concurrent requests
        // keep flowing.
        if route.delay_seconds > 0 {
            debug!(
                path = %route.path,
                delay_seconds = route.delay_seconds,
                "Applying delay"
            );
            tokio::time::sleep(std::time::Duration::from_secs(route.delay_seconds)).await;
        }

        let mut body = route.body.clone();
        if route.echo_request_body {
            body.insert("sentBody".to_string(), parse_sent_body(raw_body));
        }

        let mut response = json_response(route.status, &body);
        for (name, value) in &route.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => {
                    warn!(header = %name, "Skipping invalid response header");
                }
            }
        }
        response
    }

    /// Response for requests no route matches: the configured default, or a
    /// bare 404 with an empty body.
    fn unmatched_response(&self) -> Response {
        match &self.default_response {
            Some(default) => json_response(default.status, &default.body),
            None => {
                let mut response = Response::new(Body::empty());
                *response.status_mut() = StatusCode::NOT_FOUND;
                response
            }
        }
    }
}

/// Parse the client-submitted body for echoing. Unparseable input becomes an
/// empty object rather than an error.
fn parse_sent_body(raw: &[u8]) -> serde_json::Value {
    serde_json::from_slice(raw)
        .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()))
}

/// Serialize a JSON map into a response with the given status.
fn json_response(status: u16, body: &serde_json::Map<String, serde_json::Value>) -> Response {
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() =
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// axum fallback handler: every request lands here and goes through the
/// route table.
async fn handle_request(State(server): State<Arc<MockServer>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let raw_body = to_bytes(body, BODY_LIMIT).await.unwrap_or_default();
    server
        .handle(parts.method.as_str(), parts.uri.path(), &raw_body)
        .await
}

/// Build the axum router around a shared server instance.
pub fn router(server: Arc<MockServer>) -> Router {
    Router::new().fallback(handle_request).with_state(server)
}

/// Serve requests on an already-bound listener until ctrl-c.
pub async fn serve(listener: TcpListener, config: MockConfig) -> anyhow::Result<()> {
    let server = Arc::new(MockServer::new(config)?);
    let app = router(server.clone());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(server))
        .await?;

    Ok(())
}

async fn shutdown_signal(server: Arc<MockServer>) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    info!(
        total = server.total_requests(),
        matched = server.total_matched(),
        unmatched = server.total_unmatched(),
        "Shutdown requested"
    );
}
