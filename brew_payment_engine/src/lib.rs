//! BitBrew Payment Engine
//!
//! The core of the BitBrew café payment gateway. It keeps one order record per payment address and reconciles the
//! payment signals that the payment processor sends for that address. It is provider-agnostic: the HTTP server plugs
//! in the Blockonomics client through the [`traits::PaymentProcessor`] trait.
//!
//! The library is divided into these sections:
//! 1. Storage. [`traits::OrderStore`] is the storage contract, with [`SqliteDatabase`] and [`MemoryOrderStore`]
//!    backends. The data types stored are defined in [`mod@db_types`] and are public.
//! 2. The [`mod@reducer`], a pure function that folds a payment signal into an order.
//! 3. The public API ([`OrderFlowApi`] and [`CheckoutApi`]), which serializes updates per address and emits events.
//!
//! The engine also provides a set of events that can be subscribed to. For example, when a callback confirms a
//! payment, an `OrderStatusChanged` event is emitted.
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod reducer;
pub mod traits;

mod bpe_api;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use bpe_api::{checkout_api::CheckoutApi, errors::OrderFlowError, order_flow_api::OrderFlowApi};
pub use memory::MemoryOrderStore;
pub use reducer::ReconciliationPolicy;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
