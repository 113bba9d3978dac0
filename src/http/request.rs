//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Extract the routing id from the URL path

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates `x-request-id` values for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request id set by the middleware, for log fields.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Parse the first path segment as a decimal routing id.
///
/// `/7` and `/7/anything` give `Some(7)`; `/`, `/abc` and `/1.5` give `None`.
pub fn routing_id(path: &str) -> Option<i64> {
    path.split('/')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .and_then(|segment| segment.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_id() {
        assert_eq!(routing_id("/5"), Some(5));
        assert_eq!(routing_id("/0"), Some(0));
        assert_eq!(routing_id("/42/ignored/rest"), Some(42));
        assert_eq!(routing_id("/-3"), Some(-3));
    }

    #[test]
    fn test_missing_or_invalid_routing_id() {
        assert_eq!(routing_id("/"), None);
        assert_eq!(routing_id(""), None);
        assert_eq!(routing_id("/abc"), None);
        assert_eq!(routing_id("/1.5"), None);
        assert_eq!(routing_id("//5"), None);
        assert_eq!(routing_id("/99999999999999999999999"), None);
    }

    #[test]
    fn test_make_request_id() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let mut maker = MakeRequestUuid;
        let id = maker.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[test]
    fn test_request_id_header() {
        let request = Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, "abc-123")
            .body(())
            .unwrap();
        assert_eq!(request_id(&request), "abc-123");

        let request = Request::builder().uri("/").body(()).unwrap();
        assert_eq!(request_id(&request), "unknown");
    }
}
