//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler on every path and verb
//! - Wire up middleware (request ID, tracing)
//! - Buffer request bodies and extract the routing id
//! - Hand requests to the dispatcher and write exactly one response

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::FailurePolicy;
use crate::dispatch::{DispatchOutcome, Dispatcher, InboundRequest};
use crate::http::request::{request_id, routing_id, MakeRequestUuid};
use crate::http::response;
use crate::lifecycle::shutdown::ShutdownListener;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub failure_policy: FailurePolicy,
}

/// HTTP front end of the RPC proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around a dispatcher.
    pub fn new(dispatcher: Dispatcher, failure_policy: FailurePolicy) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            failure_policy,
        };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id(request),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id());

        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Proxy handler for every path and verb.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let routing_id = routing_id(request.uri().path());

    let raw_body = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            metrics::record_request("unreadable_body", 500, start);
            return response::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("failed to read request body: {}", e),
            );
        }
    };

    match state
        .dispatcher
        .dispatch(InboundRequest {
            raw_body,
            routing_id,
        })
        .await
    {
        Ok(outcome) => {
            let label = outcome.label();
            if matches!(outcome, DispatchOutcome::UpstreamFailed(_))
                && state.failure_policy == FailurePolicy::Swallow
            {
                tracing::debug!("Answering upstream failure with an empty 200");
            }
            let response = response::from_outcome(outcome, state.failure_policy);
            metrics::record_request(label, response.status().as_u16(), start);
            response
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected request");
            metrics::record_request("malformed", 500, start);
            response::error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}
