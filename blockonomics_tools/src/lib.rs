//! # Blockonomics tools
//!
//! A thin, typed wrapper around the parts of the [Blockonomics](https://www.blockonomics.co) API that the BitBrew café
//! uses:
//! * `POST /api/new_address` to obtain a fresh Bitcoin payment address,
//! * `POST /api/monitor_tx` to ask Blockonomics to watch a transaction hash (used for USDT payments),
//! * the HTTP callback that Blockonomics makes when a monitored payment changes state, and
//! * the `wss://www.blockonomics.co/payment/{address}` push channel.
//!
//! Only the message formats and the REST client live here. What the gateway does with the messages is up to the
//! payment engine.
mod api;
mod config;
mod error;

pub mod data_objects;
pub mod helpers;

pub use api::BlockonomicsApi;
pub use config::BlockonomicsConfig;
pub use data_objects::{CallbackParams, Crypto, MonitorTxRequest, NewAddressResponse, PaymentPush};
pub use error::BlockonomicsApiError;
