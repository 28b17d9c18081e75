//! Router construction and server host for the API.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use archivist_config::TransferPolicy;
use archivist_fsops::MoveService;
use archivist_telemetry::{REQUEST_ID_HEADER, build_sha};
use axum::{
    Router,
    http::Request,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::handlers::{directory_size, method_not_allowed, move_directory, ready};
use crate::state::ApiState;
use crate::workflow::TransferFacade;

/// Axum router wrapper that hosts the Archivist endpoints.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Build a server whose endpoints run the given workflows.
    #[must_use]
    pub fn new(transfers: Arc<dyn TransferFacade>) -> Self {
        let state = Arc::new(ApiState::new(transfers));
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(archivist_telemetry::set_request_id_layer())
            .layer(archivist_telemetry::propagate_request_id_layer())
            .layer(trace_layer);

        let router = Self::build_router()
            .route_layer(layered)
            .with_state(state);
        Self { router }
    }

    /// Build a server backed by a [`MoveService`] applying `policy`.
    #[must_use]
    pub fn with_policy(policy: TransferPolicy) -> Self {
        Self::new(Arc::new(MoveService::new(policy)))
    }

    fn build_router() -> Router<Arc<ApiState>> {
        Router::new()
            .route(
                "/",
                get(ready)
                    .post(move_directory)
                    .fallback(method_not_allowed),
            )
            .route(
                "/size",
                post(directory_size).fallback(method_not_allowed),
            )
    }

    /// Bind a listener on `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError::Bind`] if the address cannot be bound.
    pub async fn bind(addr: SocketAddr) -> ApiServerResult<TcpListener> {
        TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })
    }

    /// Serve on `addr` until the process exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> ApiServerResult<()> {
        let listener = Self::bind(addr).await?;
        self.serve_with_shutdown(listener, std::future::pending())
            .await
    }

    /// Serve on an already bound listener until `shutdown` resolves, then
    /// finish in-flight requests and return.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError::Serve`] if the server terminates unexpectedly.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> ApiServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            info!(addr = %addr, "Starting API");
        }
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ApiServerError::Serve { source })?;
        info!("API stopped");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }
}
