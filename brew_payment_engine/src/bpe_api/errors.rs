use thiserror::Error;

use crate::traits::{OrderStoreError, ProcessorError};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Invalid request. {0}")]
    ValidationError(String),
    #[error("Could not save order. {0}")]
    PersistenceError(String),
    #[error("{0}")]
    ProcessorError(#[from] ProcessorError),
}

impl From<OrderStoreError> for OrderFlowError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::OrderNotFound(address) => OrderFlowError::OrderNotFound(address),
            OrderStoreError::DatabaseError(msg) => OrderFlowError::PersistenceError(msg),
        }
    }
}
