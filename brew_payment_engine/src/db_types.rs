use std::{fmt::Display, str::FromStr};

pub use brew_common::MinorUnits;
use brew_common::{BTC_CURRENCY_CODE, USDT_CURRENCY_CODE};
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

impl ConversionError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        Self(msg.into())
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The lifecycle of an order. Variants are declared in lifecycle order, so `Ord` ranks them: a "higher" status is
/// further along in the payment flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// A payment address has been issued, and nothing has been seen on-chain yet.
    #[default]
    Pending,
    /// A payment has been detected, but is not confirmed.
    Paid,
    /// The payment has enough confirmations to be considered settled.
    Confirmed,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Paid => write!(f, "paid"),
            OrderStatusType::Confirmed => write!(f, "confirmed"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "confirmed" => Ok(Self::Confirmed),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to pending");
            OrderStatusType::Pending
        })
    }
}

//--------------------------------------       Currency        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Btc,
    Usdt,
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Btc => f.write_str(BTC_CURRENCY_CODE),
            Currency::Usdt => f.write_str(USDT_CURRENCY_CODE),
        }
    }
}

impl FromStr for Currency {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            BTC_CURRENCY_CODE => Ok(Self::Btc),
            USDT_CURRENCY_CODE => Ok(Self::Usdt),
            _ => Err(ConversionError(format!("Unsupported currency: {s}"))),
        }
    }
}

//--------------------------------------        Order       ---------------------------------------------------------
/// One payment request, keyed by the blockchain address the shopper pays into.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub address: String,
    pub status: OrderStatusType,
    pub txid: Option<String>,
    pub value: Option<MinorUnits>,
    pub confirmations: i64,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {} ({} confirmations, txid: {}, value: {})",
            self.address,
            self.currency,
            self.status,
            self.confirmations,
            self.txid.as_deref().unwrap_or("none"),
            self.value.map(|v| v.to_string()).unwrap_or_else(|| "none".into())
        )
    }
}

impl Order {
    /// Returns a copy of this order with all payment progress wiped, as if the address had just been issued.
    pub fn reset(&self) -> Self {
        let now = Utc::now();
        Self {
            address: self.address.clone(),
            status: OrderStatusType::Pending,
            txid: None,
            value: None,
            confirmations: 0,
            currency: self.currency,
            created_at: now,
            updated_at: now,
        }
    }
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// The payment address issued by the payment processor
    pub address: String,
    pub currency: Currency,
    /// Known up front for transfers the shopper initiated from their own wallet (the USDT flow)
    pub txid: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new<S: Into<String>>(address: S, currency: Currency) -> Self {
        Self { address: address.into(), currency, txid: None, created_at: Utc::now() }
    }

    pub fn with_txid<S: Into<String>>(mut self, txid: S) -> Self {
        self.txid = Some(txid.into());
        self
    }

    /// The order record this request creates: always pending, with no confirmations.
    pub fn into_order(self) -> Order {
        Order {
            address: self.address,
            status: OrderStatusType::Pending,
            txid: self.txid,
            value: None,
            confirmations: 0,
            currency: self.currency,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

impl Display for NewOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} txid: {}", self.address, self.currency, self.txid.as_deref().unwrap_or("none"))
    }
}

//--------------------------------------      PaymentSignal     --------------------------------------------------------
/// Where a payment signal came from. Used for logging only; the reducer treats all sources identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    /// The HTTP callback from the payment processor
    Callback,
    /// The processor's websocket push channel
    Push,
}

impl Display for SignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalSource::Callback => f.write_str("callback"),
            SignalSource::Push => f.write_str("push"),
        }
    }
}

/// A status report for a payment address from the payment processor.
///
/// `status_code` follows the Blockonomics convention: `0` = seen but unconfirmed, `1` = partially confirmed, `2` or
/// more = confirmed. Negative codes flag failed transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSignal {
    pub address: String,
    pub status_code: i64,
    pub txid: Option<String>,
    pub value: Option<MinorUnits>,
    pub source: SignalSource,
}

impl PaymentSignal {
    pub fn new<S: Into<String>>(address: S, status_code: i64, source: SignalSource) -> Self {
        Self { address: address.into(), status_code, txid: None, value: None, source }
    }

    pub fn with_txid<S: Into<String>>(mut self, txid: S) -> Self {
        self.txid = Some(txid.into());
        self
    }

    pub fn with_value(mut self, value: MinorUnits) -> Self {
        self.value = Some(value);
        self
    }
}

impl Display for PaymentSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} for [{}]: status {}, txid: {}, value: {}",
            self.source,
            self.address,
            self.status_code,
            self.txid.as_deref().unwrap_or("none"),
            self.value.map(|v| v.to_string()).unwrap_or_else(|| "none".into())
        )
    }
}
