//! x402 payment gating for priced HTTP routes, settled in SPL tokens.
//!
//! Gates access to configured routes behind a payment proof that a remote
//! facilitator verifies against chain state before the resource is served,
//! and settles on-chain after the resource is served.
//!
//! # Two-phase model
//!
//! The host runs the gate twice per request, with no shared memory between
//! the invocations:
//!
//! - **Verification phase** ([`verify::verify`]) — consumes the client's
//!   `X-Payment-x402` proof header and the route's [`PaymentRequirement`],
//!   asks the facilitator's `/v1/verify`, and either grants access or
//!   short-circuits to a 402/500 response ([`response`]).
//! - **Settlement phase** ([`settle::settle`]) — runs after the client
//!   response is committed, driven solely by the [`CarriedMetadata`] headers
//!   the verification phase attached and the host echoed back. It is
//!   fire-and-forget: no outcome of settlement can reach the client.
//!
//! Verification fails closed: if the facilitator is unreachable or its
//! answer is not decodable, access is rejected with 402, never granted.

pub mod constants;
pub mod facilitator_client;
pub mod headers;
pub mod payment;
pub mod response;
pub mod routes;
pub mod settle;
pub mod verify;

pub use constants::X402_VERSION;
pub use facilitator_client::{
    FacilitatorClient, FacilitatorConfig, FacilitatorError, Operation, SettleRequest,
    SettleResponse, VerifyRequest, VerifyResponse,
};
pub use headers::CarriedMetadata;
pub use payment::{PaymentProof, PaymentRequirement, RequirementError};
pub use response::GateResponse;
pub use routes::RouteTable;
pub use verify::{RejectionKind, VerificationOutcome};
