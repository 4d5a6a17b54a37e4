//! HTTP server setup and the gateway route handler.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (tracing, request ID)
//! - Answer preflight requests without touching the origin
//! - Forward everything else and rewrite the origin's answer
//! - Convert any pipeline failure into a 500 JSON response

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::{
    decompression::Decompression,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ConfigError, GatewayConfig};
use crate::http::context::GatewayContext;
use crate::http::error::{error_response, GatewayError};
use crate::http::request::{build_upstream_request, resolve_target};
use crate::http::response::{finalize, Outcome};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::resilience::timeouts::with_deadline;
use crate::rewrite::is_asset_path;

/// Pooled HTTP/1.1 client to the origin, decoding compressed bodies.
pub type UpstreamClient = Decompression<Client<HttpConnector, Body>>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayContext>,
    pub client: UpstreamClient,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    gateway: Arc<GatewayContext>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let gateway = Arc::new(GatewayContext::from_config(&config)?);

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Decompression::new(Client::builder(TokioExecutor::new()).build(connector));

        let state = AppState {
            gateway: gateway.clone(),
            client,
        };

        Ok(Self {
            router: Self::build_router(state),
            gateway,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(gateway_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            gateway_path = %self.gateway.path,
            origin = %self.gateway.endpoints.origin_base(),
            public_host = %self.gateway.endpoints.public_origin(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Entry point for every request.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    if method == Method::OPTIONS {
        tracing::debug!(request_id = %request_id, path = %request.uri().path(), "Answering preflight");
        metrics::record_request(
            method.as_str(),
            StatusCode::NO_CONTENT.as_u16(),
            Outcome::Preflight.as_str(),
            start,
        );
        return (StatusCode::NO_CONTENT, state.gateway.headers.preflight()).into_response();
    }

    match forward(&state, request, &request_id).await {
        Ok((response, outcome)) => {
            let status = response.status();
            tracing::debug!(
                request_id = %request_id,
                status = %status,
                outcome = outcome.as_str(),
                "Request completed"
            );
            metrics::record_request(method.as_str(), status.as_u16(), outcome.as_str(), start);
            response
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, method = %method, error = %e, "Gateway request failed");
            metrics::record_request(
                method.as_str(),
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                Outcome::Failed.as_str(),
                start,
            );
            error_response(&state.gateway.headers, &e)
        }
    }
}

/// Forward to the origin and rewrite its response.
async fn forward(
    state: &AppState,
    request: Request<Body>,
    request_id: &str,
) -> Result<(Response, Outcome), GatewayError> {
    let gateway = &state.gateway;

    let target = resolve_target(request.uri(), &gateway.path);
    let url = gateway.endpoints.resolve(&target)?;
    let force_identity = is_asset_path(&target);

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        target = %url,
        asset = force_identity,
        "Forwarding request"
    );

    let (parts, body) = request.into_parts();
    let upstream = build_upstream_request(&parts, body, &url, force_identity)?;
    let response = with_deadline(gateway.upstream_timeout, state.client.clone().oneshot(upstream)).await?;

    let (parts, body) = response.into_parts();
    finalize(gateway, parts, Body::new(body)).await
}
