//! CORS policy built from configuration.

use actix_cors::Cors;
use actix_web::http::{Uri, header};

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Exact origins allowed, e.g. `http://localhost:5173`.
    pub allowed_origins: Vec<String>,
    /// Also allow `localhost` / `127.0.0.1` on any port.
    pub allow_localhost: bool,
}

impl CorsConfig {
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        if self.allowed_origins.iter().any(|o| o == origin) {
            return true;
        }
        if !self.allow_localhost {
            return false;
        }

        origin
            .parse::<Uri>()
            .ok()
            .filter(|uri| matches!(uri.scheme_str(), Some("http" | "https")))
            .and_then(|uri| uri.host().map(str::to_owned))
            .is_some_and(|host| host == "localhost" || host == "127.0.0.1")
    }

    /// Credentialed CORS middleware enforcing this policy.
    pub fn middleware(&self) -> Cors {
        let policy = self.clone();
        Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                origin
                    .to_str()
                    .is_ok_and(|origin| policy.is_origin_allowed(origin))
            })
            .allowed_methods(["GET", "POST", "DELETE", "OPTIONS"])
            .allowed_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
            .allowed_header("x-request-id")
            .expose_headers([
                "x-request-id",
                "ratelimit-limit",
                "ratelimit-remaining",
                "ratelimit-reset",
                "retry-after",
            ])
            .supports_credentials()
            .max_age(3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(allow_localhost: bool) -> CorsConfig {
        CorsConfig {
            allowed_origins: vec!["https://tickets.example".to_string()],
            allow_localhost,
        }
    }

    #[test]
    fn test_allow_list() {
        let cors = config(false);
        assert!(cors.is_origin_allowed("https://tickets.example"));
        assert!(!cors.is_origin_allowed("https://evil.example"));
        assert!(!cors.is_origin_allowed("http://localhost:3000"));
    }

    #[test]
    fn test_localhost_any_port() {
        let cors = config(true);
        assert!(cors.is_origin_allowed("http://localhost:3000"));
        assert!(cors.is_origin_allowed("http://127.0.0.1:8080"));
        assert!(cors.is_origin_allowed("http://localhost"));
        assert!(!cors.is_origin_allowed("http://localhost.evil.example"));
        assert!(!cors.is_origin_allowed("null"));
    }
}
