//! Request ID middleware - correlation ids and the uniform error envelope.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    error::InternalError,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::{
        StatusCode,
        header::{self, HeaderMap, HeaderName, HeaderValue},
    },
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use tracing::Instrument;
use uuid::Uuid;

use eventix_shared::ErrorResponse;

/// Header name for request ID.
static REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Assigns every request a correlation id and rewrites error bodies.
///
/// The id is taken from an inbound `X-Request-ID` header or generated,
/// attached to the request span and echoed back. Any
/// response produced from an error (handler, extractor or inner middleware)
/// is re-rendered as `{ "error": ..., "requestId": ... }` with its status and
/// headers kept.
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequestIdService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Check if request already has an ID (from client or load balancer)
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty() && v.len() <= 128)
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = tracing::info_span!("request", request_id = %request_id);
        let fut = span.in_scope(|| self.service.call(req));

        Box::pin(
            async move {
                match fut.await {
                    Ok(res) => {
                        let mut res = if needs_envelope(&res) {
                            envelope(res, &request_id)
                        } else {
                            res.map_into_left_body()
                        };
                        set_request_id(res.headers_mut(), &request_id);
                        Ok(res)
                    }
                    // Error escaped the inner service; render it in the envelope.
                    Err(err) => {
                        let original = err.error_response();
                        let mut response = render(
                            original.status(),
                            Some(err.to_string()),
                            original.headers(),
                            &request_id,
                        );
                        set_request_id(response.headers_mut(), &request_id);
                        Err(InternalError::from_response(err, response).into())
                    }
                }
            }
            .instrument(span),
        )
    }
}

fn set_request_id(headers: &mut HeaderMap, request_id: &str) {
    headers.insert(
        HeaderName::from_static("x-request-id"),
        HeaderValue::from_str(request_id).unwrap_or_else(|_| HeaderValue::from_static("unknown")),
    );
}

/// Responses built from an error, plus the router's bare 404/405.
fn needs_envelope<B>(res: &ServiceResponse<B>) -> bool {
    res.response().error().is_some()
        || matches!(
            res.status(),
            StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
        )
}

/// Re-render an error response as the JSON envelope, keeping status and headers.
fn envelope<B, L>(res: ServiceResponse<B>, request_id: &str) -> ServiceResponse<EitherBody<L>> {
    let message = res.response().error().map(ToString::to_string);
    let (req, original) = res.into_parts();
    let response = render(original.status(), message, original.headers(), request_id);

    ServiceResponse::new(req, response).map_into_right_body()
}

fn render(
    status: StatusCode,
    error: Option<String>,
    headers: &HeaderMap,
    request_id: &str,
) -> HttpResponse {
    let message = match error {
        _ if status == StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
        Some(message) => message,
        None => status.canonical_reason().unwrap_or("Error").to_string(),
    };

    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), %message, "Request failed");
    } else {
        tracing::debug!(status = status.as_u16(), %message, "Request rejected");
    }

    let mut builder = HttpResponse::build(status);
    for (name, value) in headers {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            builder.append_header((name.clone(), value.clone()));
        }
    }
    builder.json(ErrorResponse::new(message).with_request_id(request_id))
}
