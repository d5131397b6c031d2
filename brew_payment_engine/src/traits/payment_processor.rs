use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db_types::Currency;

#[derive(Debug, Clone, Error)]
pub enum ProcessorError {
    /// The processor could not be reached, or did not answer in time.
    #[error("Payment processor is unavailable. {0}")]
    Unavailable(String),
    /// The processor answered with an error status. The status and message are passed on to the client as-is.
    #[error("Payment processor rejected the request ({status}). {message}")]
    Rejected { status: u16, message: String, details: String },
    #[error("Payment processor sent an unexpected response. {0}")]
    InvalidResponse(String),
}

/// A payment address handed out by the processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedAddress {
    pub address: String,
    /// The processor's full response, returned to the storefront unchanged.
    pub payload: Value,
}

/// An upstream service that hands out payment addresses and watches the blockchain on our behalf.
#[allow(async_fn_in_trait)]
pub trait PaymentProcessor {
    /// Requests a fresh payment address for `currency`.
    async fn new_address(&self, currency: Currency) -> Result<IssuedAddress, ProcessorError>;

    /// Asks the processor to watch `txhash` and call back as it confirms.
    async fn monitor_transaction(&self, txhash: &str, currency: Currency) -> Result<(), ProcessorError>;
}
