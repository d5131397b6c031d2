//! # BitBrew payment engine public API
//!
//! The `bpe_api` module exposes the programmatic API for the payment engine.
//!
//! * [`order_flow_api`] stores orders and folds payment signals (callbacks and push messages) into them. It is
//!   generic over the [`crate::traits::OrderStore`] backend.
//! * [`checkout_api`] wraps an order flow API together with a [`crate::traits::PaymentProcessor`], and handles the
//!   two ways a shopper starts a payment.
//!
//! # API usage
//!
//! ```rust,ignore
//! use brew_payment_engine::{events::EventProducers, OrderFlowApi, ReconciliationPolicy, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/cafe.db", 5).await?;
//! let api = OrderFlowApi::new(db, ReconciliationPolicy::Monotonic, EventProducers::default());
//! let order = api.order_status("bc1q...").await?;
//! ```
pub mod checkout_api;
pub mod errors;
pub mod order_flow_api;
