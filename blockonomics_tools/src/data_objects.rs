use std::fmt::Display;

use brew_common::{BTC_CURRENCY_CODE, USDT_CURRENCY_CODE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The currencies that Blockonomics monitors on our behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Crypto {
    Btc,
    Usdt,
}

impl Display for Crypto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Crypto::Btc => f.write_str(BTC_CURRENCY_CODE),
            Crypto::Usdt => f.write_str(USDT_CURRENCY_CODE),
        }
    }
}

/// Response body of `POST /api/new_address`.
///
/// Only `address` is interpreted. Everything else Blockonomics sends is kept in `extra` so that the response can be
/// passed on to the storefront unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddressResponse {
    pub address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body of `POST /api/monitor_tx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorTxRequest {
    pub txhash: String,
    pub crypto: Crypto,
    pub match_callback: String,
}

/// The parameters Blockonomics sends with a payment callback.
///
/// Blockonomics issues the callback as a `GET` with these values in the query string. Older storefront builds posted
/// the same fields as JSON, so both shapes deserialize into this struct. All fields are optional at the wire level;
/// validation happens in the handler so that a missing field produces a useful error rather than a generic parse
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackParams {
    pub addr: Option<String>,
    pub status: Option<i64>,
    pub value: Option<i64>,
    pub txid: Option<String>,
    /// Set to 1 by Blockonomics when the transaction signals replace-by-fee.
    pub rbf: Option<i64>,
}

/// A message received on the `wss://www.blockonomics.co/payment/{address}` push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPush {
    pub status: i64,
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}
