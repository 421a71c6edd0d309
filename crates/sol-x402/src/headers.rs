//! Carried-metadata header codec and boundary normalization.
//!
//! The verification and settlement phases run as independent invocations
//! with no shared process memory. The headers defined in [`crate::constants`]
//! are the only channel between them: verification attaches them to the
//! request, the host echoes them back, settlement reconstructs its input
//! from the echo. The gate cannot verify the echo happens — the host
//! adapter owns that contract and should assert it.

use crate::constants::{
    HEADER_AMOUNT, HEADER_NETWORK, HEADER_PAYER, HEADER_RECIPIENT, HEADER_TOKEN, HEADER_TX,
    HEADER_VALID, PAYER_ANONYMOUS, TX_UNKNOWN,
};

/// Collapse a scalar-or-list header value into one canonical string.
///
/// Hosts may surface a repeated header as a list; callers normalize here
/// once, at the boundary, instead of branching on the shape throughout.
/// The first non-empty value wins.
pub fn normalize<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// Verification result carried to the settlement phase. Request-scoped;
/// never persisted, never shared across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarriedMetadata {
    pub network: String,
    pub transaction: String,
    pub payer: String,
    /// Price in base units, as configured (decimal string).
    pub amount: String,
    pub token: String,
    pub recipient: String,
}

impl CarriedMetadata {
    /// The header set attached to the outgoing request in the verification
    /// phase. Includes the `"true"` validity flag.
    pub fn to_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (HEADER_VALID, "true".to_string()),
            (HEADER_NETWORK, self.network.clone()),
            (HEADER_TX, self.transaction.clone()),
            (HEADER_PAYER, self.payer.clone()),
            (HEADER_AMOUNT, self.amount.clone()),
            (HEADER_TOKEN, self.token.clone()),
            (HEADER_RECIPIENT, self.recipient.clone()),
        ]
    }

    /// Rebuild metadata from the echoed header set. Returns `None` unless
    /// the validity flag is the literal `"true"` — in that case no
    /// settlement attempt may occur. Missing fields fall back to the
    /// sentinels.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        if lookup(HEADER_VALID).as_deref() != Some("true") {
            return None;
        }
        let field =
            |name: &str, fallback: &str| lookup(name).unwrap_or_else(|| fallback.to_string());
        Some(Self {
            network: field(HEADER_NETWORK, ""),
            transaction: field(HEADER_TX, TX_UNKNOWN),
            payer: field(HEADER_PAYER, PAYER_ANONYMOUS),
            amount: field(HEADER_AMOUNT, "0"),
            token: field(HEADER_TOKEN, ""),
            recipient: field(HEADER_RECIPIENT, ""),
        })
    }
}
