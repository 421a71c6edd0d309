//! The two-phase request handler: verify, proxy, settle.

use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use bytes::Bytes;

use x402::constants::HEADER_PAYMENT_PROOF;
use x402::headers::{normalize, CarriedMetadata};
use x402::response::{for_outcome, GateResponse};
use x402::verify::{verify, VerificationOutcome};

use crate::proxy;
use crate::state::AppState;

/// Convert a host-agnostic gate response into an actix response.
pub fn to_http_response(gate: &GateResponse) -> HttpResponse {
    let mut builder = HttpResponse::build(
        actix_web::http::StatusCode::from_u16(gate.status)
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
    );
    for (name, value) in &gate.headers {
        builder.insert_header((*name, value.as_str()));
    }
    builder.json(&gate.body)
}

/// Read the payment proof header. Repeated values are normalized to one
/// canonical string at this boundary; actix matches the name
/// case-insensitively.
fn proof_header(req: &HttpRequest) -> Option<String> {
    let values: Vec<&str> = req
        .headers()
        .get_all(HEADER_PAYMENT_PROOF)
        .filter_map(|v| v.to_str().ok())
        .collect();
    normalize(values)
}

/// Default service for every route the gateway fronts.
///
/// Phase ordering within one request: verification strictly precedes the
/// upstream call, which strictly precedes settlement. Settlement runs on a
/// spawned task and is reconstructed from the echoed carried headers, so
/// its latency and outcome cannot reach the response returned here.
pub async fn gate(req: HttpRequest, body: Bytes, state: web::Data<AppState>) -> HttpResponse {
    let requirement = state.routes.resolve(req.path(), req.method().as_str());

    let proof = proof_header(&req);
    let outcome = verify(proof.as_deref(), requirement, &state.facilitator).await;

    if let Some(gate_response) = for_outcome(&outcome, requirement) {
        return to_http_response(&gate_response);
    }

    let carried = match outcome {
        VerificationOutcome::Allowed { carried } => carried,
        // for_outcome returned a response for every non-Allowed variant
        _ => return to_http_response(&x402::response::internal_fault()),
    };

    let carried_headers = carried
        .as_ref()
        .map(|c| c.to_headers())
        .unwrap_or_default();

    let response = match proxy::forward(
        &state.http_client,
        &req,
        &state.config.upstream_url,
        body,
        &carried_headers,
    )
    .await
    {
        Ok(response) => response,
        Err(e) => return e.error_response(),
    };

    // Settlement phase. The host contract is that the verification-phase
    // headers come back unmodified; this adapter honors it by handing the
    // settlement phase the exact header set attached above, and the core
    // re-derives its input only from that echo.
    if !carried_headers.is_empty() {
        let echoed: Vec<(String, String)> = carried_headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        let facilitator = state.facilitator.clone();
        tokio::spawn(async move {
            let lookup = |name: &str| {
                echoed
                    .iter()
                    .find(|(n, _)| n.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v.clone())
            };
            if let Some(carried) = CarriedMetadata::from_lookup(lookup) {
                x402::settle::settle(&carried, &facilitator).await;
            }
        });
    }

    response
}
