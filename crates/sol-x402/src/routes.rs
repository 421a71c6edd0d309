//! Per-route payment configuration lookup.

use serde::Deserialize;
use std::collections::HashMap;

use crate::payment::{PaymentRequirement, RequirementError};

/// One configured route. A missing `x402` block means the route is
/// unmetered and requests pass through unchecked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteEntry {
    pub x402: Option<PaymentRequirement>,
}

/// Route table keyed by exact path, then exact method:
/// `{ "/market/crypto/bitcoin": { "GET": { "x402": { ... } } } }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: HashMap<String, HashMap<String, RouteEntry>>,
}

impl RouteTable {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Exact-match lookup. No wildcards, no prefix matching, no failure
    /// mode beyond `None`.
    pub fn resolve(&self, path: &str, method: &str) -> Option<&PaymentRequirement> {
        self.routes.get(path)?.get(method)?.x402.as_ref()
    }

    /// Check every configured requirement's invariants. Run once at load
    /// time.
    pub fn validate(&self) -> Result<(), RequirementError> {
        for methods in self.routes.values() {
            for entry in methods.values() {
                if let Some(ref requirement) = entry.x402 {
                    requirement.validate()?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "/market/crypto/bitcoin": {
            "GET": {
                "x402": {
                    "network": "solana-devnet",
                    "payTo": "11111111111111111111111111111111",
                    "asset": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
                    "maxAmountRequired": "100"
                }
            }
        },
        "/free/health": {
            "GET": {}
        }
    }"#;

    #[test]
    fn test_resolve_exact_match() {
        let table = RouteTable::from_json(TABLE).unwrap();
        let requirement = table.resolve("/market/crypto/bitcoin", "GET").unwrap();
        assert_eq!(requirement.max_amount_required, "100");
    }

    #[test]
    fn test_resolve_is_strictly_exact() {
        let table = RouteTable::from_json(TABLE).unwrap();
        assert!(table.resolve("/market/crypto/bitcoin/", "GET").is_none());
        assert!(table.resolve("/market/crypto", "GET").is_none());
        assert!(table.resolve("/market/crypto/bitcoin", "POST").is_none());
        assert!(table.resolve("/market/crypto/bitcoin", "get").is_none());
    }

    #[test]
    fn test_entry_without_x402_is_unmetered() {
        let table = RouteTable::from_json(TABLE).unwrap();
        assert!(table.resolve("/free/health", "GET").is_none());
    }

    #[test]
    fn test_validate_catches_bad_requirement() {
        let table = RouteTable::from_json(
            r#"{"/p": {"GET": {"x402": {
                "network": "solana-devnet",
                "payTo": "bad",
                "asset": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
                "maxAmountRequired": "100"
            }}}}"#,
        )
        .unwrap();
        assert!(table.validate().is_err());

        let table = RouteTable::from_json(TABLE).unwrap();
        table.validate().unwrap();
    }
}
