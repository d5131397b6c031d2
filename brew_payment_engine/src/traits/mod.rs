//! # Backend contracts
//!
//! The payment engine never talks to a database or to a payment processor directly. Instead, it is generic over two
//! traits that concrete backends implement:
//!
//! * [`OrderStore`] holds one order record per payment address. [`crate::SqliteDatabase`] is the production backend,
//!   and [`crate::MemoryOrderStore`] keeps everything in a hash map for tests and throwaway demos.
//! * [`PaymentProcessor`] issues payment addresses and registers transactions for monitoring. The server implements it
//!   on top of the Blockonomics REST client.
mod order_store;
mod payment_processor;

pub use order_store::{OrderStore, OrderStoreError, Reconciled};
pub use payment_processor::{IssuedAddress, PaymentProcessor, ProcessorError};
