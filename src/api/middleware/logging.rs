//! Request/response logging with credential redaction

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::info;

/// Log each request and its outcome.
///
/// Credential-bearing headers are redacted; requests without an
/// `x-request-id` get one generated for correlation.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = extract_request_id(&request);
    let headers_log = redact_headers(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %headers_log,
        "Incoming request"
    );

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn redact_headers(request: &Request<Body>) -> String {
    let mut parts = Vec::new();

    for (name, value) in request.headers() {
        let name_str = name.as_str().to_lowercase();
        let value_str = if is_sensitive_header(&name_str) {
            "[REDACTED]".to_string()
        } else {
            value.to_str().unwrap_or("[invalid]").to_string()
        };
        parts.push(format!("{}={}", name_str, value_str));
    }

    parts.join(", ")
}

fn is_sensitive_header(name: &str) -> bool {
    matches!(name, "authorization" | "x-api-key" | "cookie")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_are_redacted() {
        let request = Request::builder()
            .uri("/v1/session")
            .header("authorization", "Bearer secret-token")
            .header("x-api-key", "sk_secret")
            .header("accept", "application/json")
            .body(Body::empty())
            .unwrap();

        let log = redact_headers(&request);

        assert!(!log.contains("secret-token"));
        assert!(!log.contains("sk_secret"));
        assert!(log.contains("authorization=[REDACTED]"));
        assert!(log.contains("x-api-key=[REDACTED]"));
        assert!(log.contains("accept=application/json"));
    }

    #[test]
    fn test_request_id_fallback() {
        let without = Request::builder().body(Body::empty()).unwrap();
        assert!(!extract_request_id(&without).is_empty());

        let with = Request::builder()
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_request_id(&with), "req-42");
    }
}
