//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap a service router with the shared middleware stack
//! - Assign and propagate `x-request-id`
//! - Trace every request and enforce the per-service deadline
//! - Answer handler panics with a 500 `{detail}` body
//! - Serve until the shutdown broadcast fires

use axum::Router;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::http::error::panic_response;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// One HealthGuard service bound to a router.
pub struct HttpServer {
    name: &'static str,
    router: Router,
}

impl HttpServer {
    /// Create a server for `router`, applying the middleware stack.
    pub fn new(name: &'static str, router: Router, request_timeout: Duration) -> Self {
        Self {
            name,
            router: Self::apply_middleware(router, request_timeout),
        }
    }

    /// Layers run outermost-last: request IDs are assigned before tracing sees the request.
    #[allow(deprecated)]
    fn apply_middleware(router: Router, request_timeout: Duration) -> Router {
        router
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            service = self.name,
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!(service = self.name, "HTTP server stopped");
        Ok(())
    }
}
