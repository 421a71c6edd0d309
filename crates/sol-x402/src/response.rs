//! Literal 402/500 payloads and header sets.

use serde_json::json;

use crate::constants::{HEADER_PAYMENT_PROOF, MAX_TIMEOUT_SECONDS, X402_VERSION};
use crate::payment::PaymentRequirement;
use crate::verify::{RejectionKind, VerificationOutcome};

/// Host-agnostic response description; the host adapter turns this into
/// its own response type.
#[derive(Debug, Clone, PartialEq)]
pub struct GateResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: serde_json::Value,
}

/// 402 for a metered route with no proof presented: pricing plus
/// instructions for retrying with payment.
pub fn payment_required(requirement: &PaymentRequirement) -> GateResponse {
    let body = json!({
        "error": "Payment Required",
        "message": format!(
            "Payment of {} base units is required to access this resource",
            requirement.max_amount_required
        ),
        "x402Version": X402_VERSION,
        "paymentRequirements": {
            "scheme": requirement.scheme,
            "network": requirement.network,
            "description": requirement.description,
            "payTo": requirement.pay_to,
            "asset": requirement.asset,
            "maxAmountRequired": requirement.max_amount_required,
            "maxTimeoutSeconds": MAX_TIMEOUT_SECONDS,
        },
        "instructions": {
            "step1": "Pay the required amount of the asset to the payTo address",
            "step2": format!(
                "Retry the request with the signed payment proof in the {} header",
                HEADER_PAYMENT_PROOF
            ),
            "headerExample": format!(
                "{}: {{\"network\":\"{}\",\"transaction\":\"<signed-transaction>\"}}",
                HEADER_PAYMENT_PROOF, requirement.network
            ),
        },
    });

    GateResponse {
        status: 402,
        headers: vec![
            ("content-type", "application/json".to_string()),
            ("x-payment-required", "x402".to_string()),
            ("x-payment-status", "required".to_string()),
            ("x-payment-protocol-version", X402_VERSION.to_string()),
        ],
        body,
    }
}

/// 402 for a proof that was presented but rejected. The facilitator's
/// reason is surfaced verbatim.
pub fn payment_invalid(reason: &str) -> GateResponse {
    GateResponse {
        status: 402,
        headers: vec![
            ("content-type", "application/json".to_string()),
            ("x-payment-status", "invalid".to_string()),
        ],
        body: json!({
            "error": "Payment Invalid",
            "message": reason,
        }),
    }
}

/// 500 for any internal fault. The body takes no detail parameter: the
/// underlying fault stays in the logs.
pub fn internal_fault() -> GateResponse {
    GateResponse {
        status: 500,
        headers: vec![("content-type", "application/json".to_string())],
        body: json!({
            "error": "Internal Server Error",
            "message": "Payment verification failed due to internal error",
        }),
    }
}

/// Map a verification outcome to the response that terminates the request,
/// if any. `Allowed` maps to `None`: the resource decides the response.
pub fn for_outcome(
    outcome: &VerificationOutcome,
    requirement: Option<&PaymentRequirement>,
) -> Option<GateResponse> {
    match outcome {
        VerificationOutcome::Allowed { .. } => None,
        VerificationOutcome::Rejected {
            kind: RejectionKind::NoPayment,
            ..
        } => match requirement {
            Some(requirement) => Some(payment_required(requirement)),
            // NoPayment is only produced for metered routes; treat a
            // missing requirement here as a logic fault.
            None => Some(internal_fault()),
        },
        VerificationOutcome::Rejected {
            kind: RejectionKind::Invalid,
            reason,
        } => Some(payment_invalid(reason)),
        VerificationOutcome::InternalFault { detail } => {
            tracing::error!(detail = %detail, "internal fault during payment verification");
            Some(internal_fault())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement() -> PaymentRequirement {
        PaymentRequirement {
            network: "solana-devnet".to_string(),
            scheme: "exact".to_string(),
            pay_to: "11111111111111111111111111111111".to_string(),
            asset: "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".to_string(),
            max_amount_required: "100".to_string(),
            fee_payer: None,
            description: Some("BTC price".to_string()),
        }
    }

    #[test]
    fn test_payment_required_payload() {
        let response = payment_required(&requirement());
        assert_eq!(response.status, 402);
        assert_eq!(response.body["error"], "Payment Required");
        assert_eq!(response.body["x402Version"], 1);
        // The configured amount survives exactly as a string.
        assert_eq!(
            response.body["paymentRequirements"]["maxAmountRequired"],
            "100"
        );
        assert_eq!(
            response.body["paymentRequirements"]["maxTimeoutSeconds"],
            60
        );
        assert_eq!(response.body["paymentRequirements"]["scheme"], "exact");
        assert!(response.body["instructions"]["headerExample"]
            .as_str()
            .unwrap()
            .contains("x-payment-x402"));
    }

    #[test]
    fn test_payment_required_headers() {
        let response = payment_required(&requirement());
        assert!(response
            .headers
            .contains(&("x-payment-status", "required".to_string())));
        assert!(response
            .headers
            .contains(&("x-payment-required", "x402".to_string())));
        assert!(response
            .headers
            .contains(&("x-payment-protocol-version", "1".to_string())));
    }

    #[test]
    fn test_payment_invalid_carries_reason_verbatim() {
        let response = payment_invalid("insufficient funds");
        assert_eq!(response.status, 402);
        assert_eq!(response.body["error"], "Payment Invalid");
        assert_eq!(response.body["message"], "insufficient funds");
        assert!(response
            .headers
            .contains(&("x-payment-status", "invalid".to_string())));
    }

    #[test]
    fn test_internal_fault_is_generic() {
        let response = internal_fault();
        assert_eq!(response.status, 500);
        assert_eq!(response.body["error"], "Internal Server Error");
        assert_eq!(
            response.body["message"],
            "Payment verification failed due to internal error"
        );
    }

    #[test]
    fn test_for_outcome_mapping() {
        let req = requirement();

        let allowed = VerificationOutcome::Allowed { carried: None };
        assert!(for_outcome(&allowed, Some(&req)).is_none());

        let no_payment = VerificationOutcome::Rejected {
            kind: RejectionKind::NoPayment,
            reason: "no payment provided".to_string(),
        };
        let response = for_outcome(&no_payment, Some(&req)).unwrap();
        assert_eq!(response.body["error"], "Payment Required");

        let invalid = VerificationOutcome::Rejected {
            kind: RejectionKind::Invalid,
            reason: "nope".to_string(),
        };
        let response = for_outcome(&invalid, Some(&req)).unwrap();
        assert_eq!(response.body["message"], "nope");

        let fault = VerificationOutcome::InternalFault {
            detail: "secret detail".to_string(),
        };
        let response = for_outcome(&fault, Some(&req)).unwrap();
        assert_eq!(response.status, 500);
        // Internal detail never leaks into the body.
        assert!(!response.body.to_string().contains("secret detail"));
    }
}
