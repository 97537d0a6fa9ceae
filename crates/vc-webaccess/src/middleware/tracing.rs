//! Per-request tracing span.

use axum::{body::Body, http::Request, response::Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, info_span, Instrument, Span};

/// Tracing layer that creates a span for each request
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        let span = info_span!(
            "web_request",
            http.method = %req.method(),
            http.target = %req.uri().path(),
            http.upgrade = is_upgrade(&req),
            http.status_code = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let result = inner.call(req).await;

                if let Ok(response) = &result {
                    let status = response.status();
                    Span::current().record("http.status_code", status.as_u16());
                    debug!(status = %status, "Request served");
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Whether the request asks for a protocol upgrade (the push channel)
fn is_upgrade<B>(req: &Request<B>) -> bool {
    req.headers()
        .get(axum::http::header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[test]
    fn test_upgrade_detection() {
        let req = Request::builder()
            .header("upgrade", "WebSocket")
            .body(Body::empty())
            .unwrap();
        assert!(is_upgrade(&req));

        let req = Request::builder().body(Body::empty()).unwrap();
        assert!(!is_upgrade(&req));
    }

    #[tokio::test]
    async fn test_layer_passes_response_through() {
        let inner = tower::service_fn(|_req: Request<Body>| async {
            Ok::<_, std::convert::Infallible>(
                Response::builder()
                    .status(StatusCode::CREATED)
                    .body(Body::empty())
                    .unwrap(),
            )
        });
        let service = TracingLayer::new().layer(inner);

        let response = service
            .oneshot(Request::builder().uri("/config").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
