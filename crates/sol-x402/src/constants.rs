//! Protocol constants: header names, sentinels, advertised limits.

use std::time::Duration;

/// x402 protocol version advertised in 402 responses and response headers.
pub const X402_VERSION: u32 = 1;

/// The only payment scheme this gate supports.
pub const SCHEME_EXACT: &str = "exact";

/// Requirement kind sent to the facilitator.
pub const KIND_SPL_TOKEN: &str = "spl-token";

/// Window a client is told it has to complete payment, in seconds.
pub const MAX_TIMEOUT_SECONDS: u64 = 60;

/// Sentinel transaction reference when the facilitator reports none.
/// Settlement is skipped for this value.
pub const TX_UNKNOWN: &str = "unknown";

/// Sentinel payer reference when the facilitator reports none.
pub const PAYER_ANONYMOUS: &str = "anonymous";

/// Client-supplied payment proof header (matched case-insensitively).
pub const HEADER_PAYMENT_PROOF: &str = "x-payment-x402";

/// Validity flag carried from verification to settlement. Settlement only
/// runs when this header is the literal `"true"`.
pub const HEADER_VALID: &str = "x-payment-valid";
pub const HEADER_NETWORK: &str = "x-payment-network";
pub const HEADER_TX: &str = "x-payment-tx";
pub const HEADER_PAYER: &str = "x-payment-payer";
pub const HEADER_AMOUNT: &str = "x-payment-amount";
pub const HEADER_TOKEN: &str = "x-payment-token";
pub const HEADER_RECIPIENT: &str = "x-payment-recipient";

/// Default bound on a single facilitator call.
pub const DEFAULT_FACILITATOR_TIMEOUT: Duration = Duration::from_secs(5);
