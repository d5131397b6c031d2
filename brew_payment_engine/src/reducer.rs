//! # Status reducer
//!
//! Payment signals for an address arrive from two independent channels (the HTTP callback and the websocket push
//! channel), and either of them can duplicate, delay or reorder messages. The reducer is the single place where a
//! signal is folded into the stored order record. It is a pure function: it never touches storage, so callers are
//! responsible for serializing read-modify-write cycles on the same address.
//!
//! Status codes map onto order statuses as follows:
//!
//! | code   | status                          |
//! |--------|---------------------------------|
//! | `0`    | `paid`                          |
//! | `1`    | unchanged (still confirming)    |
//! | `>= 2` | `confirmed`                     |
//! | `< 0`  | signal ignored                  |
use std::{fmt::Display, str::FromStr};

use chrono::Utc;
use log::*;

use crate::db_types::{ConversionError, Order, OrderStatusType, PaymentSignal};

/// Controls how out-of-order signals are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconciliationPolicy {
    /// An order never moves backwards. Status and confirmation count only ever increase, and stale signals are
    /// dropped.
    #[default]
    Monotonic,
    /// Every signal overwrites the stored status and confirmation count, so a late `0` after a `2` downgrades a
    /// confirmed order back to paid.
    LastWriteWins,
}

impl ReconciliationPolicy {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            Self::Monotonic
        } else {
            Self::LastWriteWins
        }
    }
}

impl Display for ReconciliationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconciliationPolicy::Monotonic => f.write_str("monotonic"),
            ReconciliationPolicy::LastWriteWins => f.write_str("last-write-wins"),
        }
    }
}

impl FromStr for ReconciliationPolicy {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monotonic" => Ok(Self::Monotonic),
            "last-write-wins" | "lww" => Ok(Self::LastWriteWins),
            _ => Err(ConversionError::new(format!("Unknown reconciliation policy: {s}"))),
        }
    }
}

/// The outcome of folding one signal into an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub order: Order,
    /// False when the signal was a duplicate, stale or ignored, in which case `order` equals the input record.
    pub changed: bool,
}

/// The order status that a Blockonomics status code maps to, if any.
pub fn status_for_code(code: i64) -> Option<OrderStatusType> {
    match code {
        0 => Some(OrderStatusType::Paid),
        c if c >= 2 => Some(OrderStatusType::Confirmed),
        _ => None,
    }
}

/// Folds `signal` into `current` under the given policy.
///
/// `updated_at` is only bumped when something actually changed.
pub fn reduce(current: &Order, signal: &PaymentSignal, policy: ReconciliationPolicy) -> Reduction {
    if signal.status_code < 0 {
        warn!(
            "🔄️ Received status code {} for [{}]. The transaction failed upstream. Leaving the order as is.",
            signal.status_code, current.address
        );
        return Reduction { order: current.clone(), changed: false };
    }
    let mapped = status_for_code(signal.status_code);
    let mut next = current.clone();
    match policy {
        ReconciliationPolicy::Monotonic => {
            let behind_status = mapped.map(|s| s < current.status).unwrap_or(false);
            if behind_status || signal.status_code < current.confirmations {
                debug!("🔄️ Stale {signal} ignored. The order is already at {current}");
                return Reduction { order: current.clone(), changed: false };
            }
            if let Some(status) = mapped {
                next.status = status.max(current.status);
            }
            next.confirmations = signal.status_code.max(current.confirmations);
        },
        ReconciliationPolicy::LastWriteWins => {
            if let Some(status) = mapped {
                next.status = status;
            }
            next.confirmations = signal.status_code;
        },
    }
    if let Some(txid) = &signal.txid {
        next.txid = Some(txid.clone());
    }
    if let Some(value) = signal.value {
        next.value = Some(value);
    }
    let changed = next != *current;
    if changed {
        next.updated_at = Utc::now();
    }
    Reduction { order: next, changed }
}
