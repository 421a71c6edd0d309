//! HTTP client for the remote facilitator's `/v1/verify` and `/v1/settle`
//! endpoints.
//!
//! Every call is a single attempt with a fixed timeout. Failures are
//! classified so callers can tell "facilitator unreachable" from
//! "facilitator rejected the payment" — the two have different
//! client-visible consequences.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::constants::DEFAULT_FACILITATOR_TIMEOUT;

/// Process-wide facilitator settings, read-only after initialization.
#[derive(Debug, Clone)]
pub struct FacilitatorConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl FacilitatorConfig {
    /// Validate and store the base URL; the timeout bounds every call.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, url::ParseError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)?;
        Ok(Self { base_url, timeout })
    }

    pub fn with_default_timeout(base_url: impl Into<String>) -> Result<Self, url::ParseError> {
        Self::new(base_url, DEFAULT_FACILITATOR_TIMEOUT)
    }
}

/// The two facilitator operations. Each maps to one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Verify,
    Settle,
}

impl Operation {
    pub fn path(self) -> &'static str {
        match self {
            Operation::Verify => "/v1/verify",
            Operation::Settle => "/v1/settle",
        }
    }
}

/// Classification of facilitator call failures.
#[derive(Debug, thiserror::Error)]
pub enum FacilitatorError {
    /// No response at all: connection refused, DNS failure, timeout.
    #[error("facilitator unreachable: {0}")]
    Transport(String),

    /// The facilitator answered with a non-2xx status.
    #[error("facilitator returned {status}: {body}")]
    Protocol { status: u16, body: String },

    /// The facilitator answered 2xx but the body was not the expected shape.
    #[error("facilitator response not decodable: {0}")]
    Decode(String),
}

#[derive(Clone)]
pub struct FacilitatorClient {
    http: reqwest::Client,
    base_url: String,
}

impl FacilitatorClient {
    pub fn new(config: &FacilitatorConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to create HTTP client");
        Self {
            http,
            base_url: config.base_url.clone(),
        }
    }

    /// POST `payload` as JSON to the operation's endpoint. Single attempt,
    /// no retries.
    pub async fn call<T: DeserializeOwned>(
        &self,
        op: Operation,
        payload: &impl Serialize,
    ) -> Result<T, FacilitatorError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), op.path());

        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| FacilitatorError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FacilitatorError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(FacilitatorError::Protocol {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| FacilitatorError::Decode(e.to_string()))
    }

    pub async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, FacilitatorError> {
        self.call(Operation::Verify, request).await
    }

    pub async fn settle(&self, request: &SettleRequest) -> Result<SettleResponse, FacilitatorError> {
        self.call(Operation::Settle, request).await
    }
}

/// Body of `POST /v1/verify`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub payment_payload: VerifyPayload,
    pub payment_requirements: VerifyRequirements,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPayload {
    pub network: String,
    pub transaction: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequirements {
    pub network: String,
    /// Always `"spl-token"` for this gate.
    pub kind: String,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<String>,
    pub amount: u64,
    pub token: String,
}

/// Decoded body of a `/v1/verify` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_valid: bool,
    pub transaction: Option<String>,
    pub payer: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Body of `POST /v1/settle`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    pub network: String,
    pub transaction: String,
    pub recipient: String,
    pub amount: u64,
    pub token: String,
}

/// Decoded body of a `/v1/settle` response. Only the settlement signature is
/// interpreted; everything else is kept for logging.
#[derive(Debug, Clone, Deserialize)]
pub struct SettleResponse {
    pub signature: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
