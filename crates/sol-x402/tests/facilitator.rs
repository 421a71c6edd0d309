//! Failure-classification tests for the facilitator client, against real
//! sockets.

use actix_web::{web, App, HttpResponse, HttpServer};
use std::time::Duration;

use x402::facilitator_client::{
    FacilitatorClient, FacilitatorConfig, FacilitatorError, SettleRequest, VerifyPayload,
    VerifyRequest, VerifyRequirements, VerifyResponse,
};

/// Serve a fixed status/body on `/v1/verify`, bound to an ephemeral port.
async fn spawn_facilitator(status: u16, body: &'static str) -> String {
    let server = HttpServer::new(move || {
        App::new().route(
            "/v1/verify",
            web::post().to(move || async move {
                HttpResponse::build(
                    actix_web::http::StatusCode::from_u16(status).expect("valid status"),
                )
                .content_type("application/json")
                .body(body)
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind mock facilitator");

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    format!("http://{}", addr)
}

fn client(base_url: &str) -> FacilitatorClient {
    let config = FacilitatorConfig::new(base_url, Duration::from_secs(2)).expect("valid url");
    FacilitatorClient::new(&config)
}

fn verify_request() -> VerifyRequest {
    VerifyRequest {
        payment_payload: VerifyPayload {
            network: "solana-devnet".to_string(),
            transaction: serde_json::json!("BASE64BLOB"),
        },
        payment_requirements: VerifyRequirements {
            network: "solana-devnet".to_string(),
            kind: "spl-token".to_string(),
            recipient: "RECIPIENT".to_string(),
            fee_payer: None,
            amount: 100,
            token: "TOKEN".to_string(),
        },
    }
}

#[actix_rt::test]
async fn success_returns_decoded_body() {
    let base = spawn_facilitator(
        200,
        r#"{"isValid":true,"transaction":"SIG123","payer":"PAYER1"}"#,
    )
    .await;

    let response: VerifyResponse = client(&base).verify(&verify_request()).await.unwrap();
    assert!(response.is_valid);
    assert_eq!(response.transaction.as_deref(), Some("SIG123"));
    assert_eq!(response.payer.as_deref(), Some("PAYER1"));
}

#[actix_rt::test]
async fn non_2xx_is_protocol_failure() {
    let base = spawn_facilitator(503, r#"{"error":"overloaded"}"#).await;

    match client(&base).verify(&verify_request()).await {
        Err(FacilitatorError::Protocol { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("overloaded"));
        }
        other => panic!("expected Protocol failure, got {other:?}"),
    }
}

#[actix_rt::test]
async fn undecodable_body_is_decode_failure() {
    let base = spawn_facilitator(200, "this is not json").await;

    match client(&base).verify(&verify_request()).await {
        Err(FacilitatorError::Decode(_)) => {}
        other => panic!("expected Decode failure, got {other:?}"),
    }
}

#[actix_rt::test]
async fn missing_required_field_is_decode_failure() {
    // 2xx with valid JSON that lacks isValid.
    let base = spawn_facilitator(200, r#"{"transaction":"SIG123"}"#).await;

    match client(&base).verify(&verify_request()).await {
        Err(FacilitatorError::Decode(_)) => {}
        other => panic!("expected Decode failure, got {other:?}"),
    }
}

#[actix_rt::test]
async fn connection_refused_is_transport_failure() {
    match client("http://127.0.0.1:1").verify(&verify_request()).await {
        Err(FacilitatorError::Transport(_)) => {}
        other => panic!("expected Transport failure, got {other:?}"),
    }
}

#[actix_rt::test]
async fn settle_reaches_v1_settle() {
    let server = HttpServer::new(|| {
        App::new().route(
            "/v1/settle",
            web::post().to(|body: web::Json<serde_json::Value>| async move {
                assert_eq!(body["transaction"], "SIG123");
                assert_eq!(body["amount"], 100);
                HttpResponse::Ok()
                    .content_type("application/json")
                    .body(r#"{"signature":"SETTLE_SIG"}"#)
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind mock facilitator");
    let base = format!("http://{}", server.addrs()[0]);
    actix_rt::spawn(server.run());

    let request = SettleRequest {
        network: "solana-devnet".to_string(),
        transaction: "SIG123".to_string(),
        recipient: "RECIPIENT".to_string(),
        amount: 100,
        token: "TOKEN".to_string(),
    };
    let response = client(&base).settle(&request).await.unwrap();
    assert_eq!(response.signature.as_deref(), Some("SETTLE_SIG"));
}
