//! Baseline security headers on every response.

use actix_web::middleware::DefaultHeaders;

/// Header set applied unless a handler already chose a value.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

pub fn security_headers() -> DefaultHeaders {
    SECURITY_HEADERS
        .iter()
        .fold(DefaultHeaders::new(), |headers, &pair| headers.add(pair))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, test, web};

    use super::*;

    #[actix_web::test]
    async fn test_headers_applied_without_overriding() {
        let app = test::init_service(
            App::new()
                .wrap(security_headers())
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() }))
                .route(
                    "/framed",
                    web::get().to(|| async {
                        HttpResponse::Ok()
                            .insert_header(("x-frame-options", "DENY"))
                            .finish()
                    }),
                ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        for (name, value) in SECURITY_HEADERS {
            assert_eq!(res.headers().get(*name).unwrap(), *value, "{name}");
        }

        let req = test::TestRequest::get().uri("/framed").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.headers().get("x-frame-options").unwrap(), "DENY");
    }
}
