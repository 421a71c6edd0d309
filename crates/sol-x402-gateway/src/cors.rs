//! CORS configuration for the gateway binary.

use actix_cors::Cors;

/// Build the CORS middleware from allowed origins. An empty list denies
/// cross-origin requests; `*` permits any origin (dev only).
pub fn build_cors(allowed_origins: &[String]) -> Cors {
    let allowed = allowed_origins.to_vec();
    Cors::default()
        .allowed_origin_fn(move |origin, _req_head| {
            let origin_str = origin.to_str().unwrap_or("");
            allowed.iter().any(|a| a == "*" || a == origin_str)
        })
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::ACCEPT,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::HeaderName::from_static("x-payment-x402"),
        ])
        .expose_headers(vec![
            actix_web::http::header::HeaderName::from_static("x-payment-required"),
            actix_web::http::header::HeaderName::from_static("x-payment-status"),
            actix_web::http::header::HeaderName::from_static("x-payment-protocol-version"),
        ])
        .max_age(3600)
}
