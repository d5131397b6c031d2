//! # BitBrew café payment server
//! The HTTP face of the café's payment gateway. It is responsible for:
//! * Handing out Bitcoin payment addresses obtained from Blockonomics, and registering USDT transfers for monitoring.
//! * Receiving the Blockonomics payment callback and feeding it to the order reconciliation engine.
//! * Optionally watching new addresses on the Blockonomics push channel (see [push_watcher]).
//! * Serving the current order state to polling clients.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `POST /new_address`: A fresh Bitcoin address. The Blockonomics response is passed through.
//! * `POST /monitor_usdt_transaction`: Registers a USDT transfer.
//! * `GET /callback`, `POST /callback`: The Blockonomics payment callback.
//! * `GET /order_status/{address}`: The stored order for an address.
//! * `GET /health`: A health check that also reports the number of stored orders.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod push_watcher;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
