//! Rate limiting middleware.

use actix_web::{
    Error,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderMap, HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::net::SocketAddr;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use eventix_core::ports::{RateLimitResult, RateLimiter};

use super::error::AppError;

const LIMIT: &str = "ratelimit-limit";
const REMAINING: &str = "ratelimit-remaining";
const RESET: &str = "ratelimit-reset";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Whole seconds until reset, rounded up.
pub(crate) fn reset_secs(reset_after: Duration) -> u64 {
    reset_after.as_secs() + u64::from(reset_after.subsec_nanos() > 0)
}

pub(crate) fn write_rate_limit_headers(headers: &mut HeaderMap, result: &RateLimitResult) {
    headers.insert(
        HeaderName::from_static(LIMIT),
        HeaderValue::from(result.limit),
    );
    headers.insert(
        HeaderName::from_static(REMAINING),
        HeaderValue::from(result.remaining),
    );
    headers.insert(
        HeaderName::from_static(RESET),
        HeaderValue::from(reset_secs(result.reset_after)),
    );
}

/// Client identity used as the limiter key.
///
/// Behind a proxy only the hop it appended (the rightmost `X-Forwarded-For`
/// entry) is trusted; everything left of it is client supplied.
fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> String {
    let forwarded = trust_proxy
        .then(|| headers.get_all(X_FORWARDED_FOR).last())
        .flatten()
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.rsplit(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty());

    match (forwarded, peer) {
        (Some(hop), _) => hop.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}

/// Rate limiting middleware factory, one per route group.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
    group: &'static str,
    trust_proxy: bool,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>, group: &'static str, trust_proxy: bool) -> Self {
        Self {
            limiter,
            group,
            trust_proxy,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            group: self.group,
            trust_proxy: self.trust_proxy,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    group: &'static str,
    trust_proxy: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();
        let group = self.group;
        let key = client_key(req.headers(), req.peer_addr(), self.trust_proxy);

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    tracing::warn!(group, client = %key, "Rate limit exceeded");

                    let (http_req, _) = req.into_parts();
                    let res = ServiceResponse::from_err(AppError::RateLimited(result), http_req);
                    Ok(res.map_into_right_body())
                }
                Ok(result) => {
                    let mut res = service.call(req).await?;
                    write_rate_limit_headers(res.headers_mut(), &result);
                    Ok(res.map_into_left_body())
                }
                Err(e) => {
                    tracing::error!(group, error = %e, "Rate limiter error, failing open");
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}
