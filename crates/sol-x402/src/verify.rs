//! Verification phase: decide whether the request may reach the resource.
//!
//! Each step short-circuits on first failure; the facilitator is consulted
//! only after the proof parses. Failure to verify is never an access grant
//! (fail-closed).

use crate::constants::{KIND_SPL_TOKEN, PAYER_ANONYMOUS, TX_UNKNOWN};
use crate::facilitator_client::{
    FacilitatorClient, VerifyPayload, VerifyRequest, VerifyRequirements,
};
use crate::headers::CarriedMetadata;
use crate::payment::{PaymentProof, PaymentRequirement};

/// How a rejected request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// No proof was presented at all; the response carries pricing
    /// instructions.
    NoPayment,
    /// A proof was presented but did not hold up.
    Invalid,
}

/// Outcome of the verification phase. Produced once per request, never
/// persisted.
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    /// Access granted. `carried` is `None` for unmetered pass-through.
    Allowed { carried: Option<CarriedMetadata> },
    Rejected { kind: RejectionKind, reason: String },
    /// Configuration or logic fault. `detail` is for logs only and must
    /// never reach the client.
    InternalFault { detail: String },
}

pub async fn verify(
    raw_proof: Option<&str>,
    requirement: Option<&PaymentRequirement>,
    facilitator: &FacilitatorClient,
) -> VerificationOutcome {
    let requirement = match requirement {
        Some(r) => r,
        None => return VerificationOutcome::Allowed { carried: None },
    };

    let raw = match raw_proof.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw,
        None => {
            return VerificationOutcome::Rejected {
                kind: RejectionKind::NoPayment,
                reason: "no payment provided".to_string(),
            }
        }
    };

    let proof = match PaymentProof::parse(raw) {
        Ok(proof) => proof,
        Err(e) => {
            tracing::debug!(error = %e, "payment proof failed to parse");
            return VerificationOutcome::Rejected {
                kind: RejectionKind::Invalid,
                reason: "malformed proof".to_string(),
            };
        }
    };

    // A requirement violating its own invariants is a configuration fault,
    // not a client error.
    let amount = match requirement.amount() {
        Ok(amount) => amount,
        Err(e) => {
            return VerificationOutcome::InternalFault {
                detail: e.to_string(),
            }
        }
    };

    let request = VerifyRequest {
        payment_payload: VerifyPayload {
            network: proof.network.clone(),
            transaction: proof.transaction.clone(),
        },
        payment_requirements: VerifyRequirements {
            network: requirement.network.clone(),
            kind: KIND_SPL_TOKEN.to_string(),
            recipient: requirement.pay_to.clone(),
            fee_payer: requirement.fee_payer.clone(),
            amount,
            token: requirement.asset.clone(),
        },
    };

    let response = match facilitator.verify(&request).await {
        Ok(response) => response,
        Err(e) => {
            // Fail closed: if the facilitator cannot vouch for the payment,
            // access is not granted.
            tracing::warn!(error = %e, "facilitator verify call failed");
            return VerificationOutcome::Rejected {
                kind: RejectionKind::Invalid,
                reason: e.to_string(),
            };
        }
    };

    if !response.is_valid {
        let reason = response
            .error
            .or(response.message)
            .unwrap_or_else(|| "payment not valid".to_string());
        return VerificationOutcome::Rejected {
            kind: RejectionKind::Invalid,
            reason,
        };
    }

    let carried = CarriedMetadata {
        network: requirement.network.clone(),
        transaction: response
            .transaction
            .unwrap_or_else(|| TX_UNKNOWN.to_string()),
        payer: response
            .payer
            .unwrap_or_else(|| PAYER_ANONYMOUS.to_string()),
        amount: requirement.max_amount_required.clone(),
        token: requirement.asset.clone(),
        recipient: requirement.pay_to.clone(),
    };

    VerificationOutcome::Allowed {
        carried: Some(carried),
    }
}
