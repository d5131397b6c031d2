//! Plugs the Blockonomics REST client into the payment engine as a [`PaymentProcessor`].

use blockonomics_tools::{BlockonomicsApi, BlockonomicsApiError, Crypto};
use brew_payment_engine::{
    db_types::Currency,
    traits::{IssuedAddress, PaymentProcessor, ProcessorError},
};
use log::*;

#[derive(Clone)]
pub struct BlockonomicsProcessor {
    api: BlockonomicsApi,
}

impl BlockonomicsProcessor {
    pub fn new(api: BlockonomicsApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &BlockonomicsApi {
        &self.api
    }
}

pub fn crypto_for(currency: Currency) -> Crypto {
    match currency {
        Currency::Btc => Crypto::Btc,
        Currency::Usdt => Crypto::Usdt,
    }
}

pub fn processor_error(e: BlockonomicsApiError) -> ProcessorError {
    match e {
        BlockonomicsApiError::QueryError { status, message, details } => {
            ProcessorError::Rejected { status, message, details }
        },
        BlockonomicsApiError::Initialization(s) => ProcessorError::Unavailable(s),
        BlockonomicsApiError::RestResponseError(s) => ProcessorError::Unavailable(s),
        BlockonomicsApiError::Timeout(s) => ProcessorError::Unavailable(format!("Request timed out. {s}")),
        BlockonomicsApiError::JsonError(s) => ProcessorError::InvalidResponse(s),
    }
}

impl PaymentProcessor for BlockonomicsProcessor {
    async fn new_address(&self, currency: Currency) -> Result<IssuedAddress, ProcessorError> {
        let response = self.api.new_address(crypto_for(currency)).await.map_err(processor_error)?;
        let payload = serde_json::to_value(&response).map_err(|e| {
            error!("🛰️ Could not re-serialize the new_address response. {e}");
            ProcessorError::InvalidResponse(e.to_string())
        })?;
        Ok(IssuedAddress { address: response.address, payload })
    }

    async fn monitor_transaction(&self, txhash: &str, currency: Currency) -> Result<(), ProcessorError> {
        self.api.monitor_transaction(txhash, crypto_for(currency)).await.map_err(processor_error)
    }
}
