use actix_web::{HttpRequest, HttpResponse, ResponseError};
use bytes::Bytes;

/// Headers never forwarded upstream: hop-by-hop headers, the payment proof,
/// and every carried x-payment-* header so a client cannot spoof a
/// verification result into the settlement phase.
const HEADERS_TO_STRIP: &[&str] = &[
    "host",
    "connection",
    "keep-alive",
    "transfer-encoding",
    "content-length", // Will be recalculated
    "x-payment-x402",
    "x-payment-valid",
    "x-payment-network",
    "x-payment-tx",
    "x-payment-payer",
    "x-payment-amount",
    "x-payment-token",
    "x-payment-recipient",
];

/// Allowlist of response headers to forward from the upstream. Prevents
/// leaking internal upstream headers (e.g. Server, X-Powered-By).
const ALLOWED_RESPONSE_HEADERS: &[&str] = &[
    "content-type",
    "content-length",
    "content-encoding",
    "cache-control",
    "etag",
    "last-modified",
    "date",
    "vary",
];

/// Maximum upstream response body size (10 MB).
const MAX_RESPONSE_BODY_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("upstream response too large (max {MAX_RESPONSE_BODY_SIZE} bytes)")]
    ResponseTooLarge,
}

impl ResponseError for ProxyError {
    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self, "proxy error");
        HttpResponse::BadGateway().json(serde_json::json!({
            "error": "bad_gateway",
            "message": "Failed to reach upstream service",
        }))
    }
}

/// Forward a request to the upstream, attaching the carried payment headers
/// produced by the verification phase.
pub async fn forward(
    client: &reqwest::Client,
    original: &HttpRequest,
    upstream_base: &str,
    body: Bytes,
    carried_headers: &[(&'static str, String)],
) -> Result<HttpResponse, ProxyError> {
    let target = format!(
        "{}{}",
        upstream_base.trim_end_matches('/'),
        original
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
    );

    let method = match original.method().as_str() {
        "GET" => reqwest::Method::GET,
        "POST" => reqwest::Method::POST,
        "PUT" => reqwest::Method::PUT,
        "DELETE" => reqwest::Method::DELETE,
        "PATCH" => reqwest::Method::PATCH,
        "HEAD" => reqwest::Method::HEAD,
        "OPTIONS" => reqwest::Method::OPTIONS,
        other => return Err(ProxyError::UnsupportedMethod(other.to_string())),
    };

    let mut builder = client.request(method, &target);

    // Copy client headers except the stripped set
    for (name, value) in original.headers() {
        let name_lower = name.as_str().to_ascii_lowercase();
        if HEADERS_TO_STRIP.contains(&name_lower.as_str()) {
            continue;
        }
        if let Ok(value_str) = value.to_str() {
            builder = builder.header(name.as_str(), value_str);
        }
    }

    // Attach the verification result for the upstream and the settlement
    // phase
    for (name, value) in carried_headers {
        builder = builder.header(*name, value.as_str());
    }

    if !body.is_empty() {
        builder = builder.body(body.to_vec());
    }

    let mut response = builder.send().await.map_err(|e| {
        tracing::error!(error = %e, "upstream request failed");
        ProxyError::Upstream(e.to_string())
    })?;

    let status = response.status();
    let headers = response.headers().clone();

    // Fast path: reject oversized bodies before reading
    if let Some(length) = response.content_length() {
        if length > MAX_RESPONSE_BODY_SIZE as u64 {
            return Err(ProxyError::ResponseTooLarge);
        }
    }

    // Stream with progressive size enforcement for chunked responses
    let mut buf: Vec<u8> = Vec::with_capacity(
        response
            .content_length()
            .map(|length| length as usize)
            .unwrap_or(8192)
            .min(MAX_RESPONSE_BODY_SIZE),
    );
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ProxyError::Upstream(e.to_string()))?
    {
        if buf.len() + chunk.len() > MAX_RESPONSE_BODY_SIZE {
            return Err(ProxyError::ResponseTooLarge);
        }
        buf.extend_from_slice(&chunk);
    }

    let mut out = HttpResponse::build(
        actix_web::http::StatusCode::from_u16(status.as_u16())
            .unwrap_or(actix_web::http::StatusCode::OK),
    );
    for (name, value) in headers.iter() {
        let name_lower = name.as_str().to_ascii_lowercase();
        if ALLOWED_RESPONSE_HEADERS.contains(&name_lower.as_str()) {
            if let Ok(value_str) = value.to_str() {
                out.insert_header((name.as_str(), value_str));
            }
        }
    }

    Ok(out.body(buf))
}
