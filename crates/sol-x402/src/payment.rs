use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;

use crate::constants::SCHEME_EXACT;

fn default_scheme() -> String {
    SCHEME_EXACT.to_string()
}

/// Per-route pricing and recipient configuration a client must satisfy.
/// Owned by the route table, read-only to the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirement {
    /// Network identifier, e.g. `"solana-devnet"`.
    pub network: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    pub pay_to: String,
    pub asset: String,
    /// Price in token base units, as a decimal string.
    pub max_amount_required: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RequirementError {
    #[error("maxAmountRequired must be a positive integer, got {0:?}")]
    InvalidAmount(String),

    #[error("{field} is not a valid address: {value}")]
    InvalidAddress { field: &'static str, value: String },
}

impl PaymentRequirement {
    /// Price in base units. The configured string must parse to a positive
    /// integer; anything else violates the requirement invariant.
    pub fn amount(&self) -> Result<u64, RequirementError> {
        match self.max_amount_required.parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(RequirementError::InvalidAmount(
                self.max_amount_required.clone(),
            )),
        }
    }

    /// Check the amount and address invariants. Run once at load time so a
    /// bad route table is caught at startup, not per request.
    pub fn validate(&self) -> Result<(), RequirementError> {
        self.amount()?;
        check_address("payTo", &self.pay_to)?;
        check_address("asset", &self.asset)?;
        if let Some(ref fee_payer) = self.fee_payer {
            check_address("feePayer", fee_payer)?;
        }
        Ok(())
    }
}

fn check_address(field: &'static str, value: &str) -> Result<(), RequirementError> {
    Pubkey::from_str(value)
        .map(|_| ())
        .map_err(|_| RequirementError::InvalidAddress {
            field,
            value: value.to_string(),
        })
}

/// Wire-format payment proof, sent JSON-encoded in the `X-Payment-x402`
/// header. Created by the client per request, parsed once per verification
/// attempt, discarded afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProof {
    pub network: String,
    /// Opaque signed-transaction blob; forwarded to the facilitator as-is.
    pub transaction: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
    /// Scheme-specific fields the gate does not interpret.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl PaymentProof {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAY_TO: &str = "11111111111111111111111111111111";
    const ASSET: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

    fn requirement(amount: &str) -> PaymentRequirement {
        PaymentRequirement {
            network: "solana-devnet".to_string(),
            scheme: SCHEME_EXACT.to_string(),
            pay_to: PAY_TO.to_string(),
            asset: ASSET.to_string(),
            max_amount_required: amount.to_string(),
            fee_payer: None,
            description: None,
        }
    }

    #[test]
    fn test_amount_positive_integer() {
        assert_eq!(requirement("100").amount().unwrap(), 100);
    }

    #[test]
    fn test_amount_rejects_zero_and_garbage() {
        assert!(requirement("0").amount().is_err());
        assert!(requirement("-5").amount().is_err());
        assert!(requirement("1.5").amount().is_err());
        assert!(requirement("lots").amount().is_err());
    }

    #[test]
    fn test_validate_accepts_wellformed() {
        requirement("100").validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_address() {
        let mut req = requirement("100");
        req.pay_to = "not-an-address".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_checks_fee_payer() {
        let mut req = requirement("100");
        req.fee_payer = Some("nope".to_string());
        assert!(req.validate().is_err());
        req.fee_payer = Some(PAY_TO.to_string());
        req.validate().unwrap();
    }

    #[test]
    fn test_scheme_defaults_to_exact() {
        let req: PaymentRequirement = serde_json::from_value(serde_json::json!({
            "network": "solana-devnet",
            "payTo": PAY_TO,
            "asset": ASSET,
            "maxAmountRequired": "100",
        }))
        .unwrap();
        assert_eq!(req.scheme, "exact");
    }

    #[test]
    fn test_proof_parse_keeps_unknown_fields() {
        let proof = PaymentProof::parse(
            r#"{"network":"solana-devnet","transaction":"BASE64BLOB","payer":"PAYER1","memo":"x"}"#,
        )
        .unwrap();
        assert_eq!(proof.network, "solana-devnet");
        assert_eq!(proof.payer.as_deref(), Some("PAYER1"));
        assert!(proof.extra.contains_key("memo"));
    }

    #[test]
    fn test_proof_parse_rejects_non_json() {
        assert!(PaymentProof::parse("not json at all").is_err());
        assert!(PaymentProof::parse("").is_err());
    }
}
