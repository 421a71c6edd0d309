//! Settlement phase: finalize payment on-chain after the resource was
//! served.
//!
//! By the time this runs the client response is already committed. The
//! handler takes no response state and returns nothing, so settlement
//! cannot alter what the client sees by construction, not by error
//! suppression. Outcomes are recorded for observability only.

use crate::constants::TX_UNKNOWN;
use crate::facilitator_client::{FacilitatorClient, SettleRequest};
use crate::headers::CarriedMetadata;

/// Fire-and-forget settlement. Skips the facilitator entirely when there is
/// no usable transaction reference; any failure is logged and dropped, no
/// retry.
pub async fn settle(carried: &CarriedMetadata, facilitator: &FacilitatorClient) {
    if carried.transaction == TX_UNKNOWN {
        tracing::debug!("skipping settlement: no transaction reference from verification");
        return;
    }

    let amount = match carried.amount.parse::<u64>() {
        Ok(amount) => amount,
        Err(_) => {
            tracing::warn!(
                amount = %carried.amount,
                "skipping settlement: carried amount is not an integer"
            );
            return;
        }
    };

    let request = SettleRequest {
        network: carried.network.clone(),
        transaction: carried.transaction.clone(),
        recipient: carried.recipient.clone(),
        amount,
        token: carried.token.clone(),
    };

    match facilitator.settle(&request).await {
        Ok(response) => {
            tracing::info!(
                transaction = %carried.transaction,
                payer = %carried.payer,
                signature = response.signature.as_deref().unwrap_or("-"),
                "payment settled"
            );
        }
        Err(e) => {
            tracing::warn!(
                transaction = %carried.transaction,
                error = %e,
                "settlement failed"
            );
        }
    }
}
