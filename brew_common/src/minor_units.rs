use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::Type;

pub const BTC_CURRENCY_CODE: &str = "BTC";
pub const USDT_CURRENCY_CODE: &str = "USDT";

//--------------------------------------     MinorUnits       --------------------------------------------------------
/// An amount in the smallest unit of whatever currency the order is paid in (satoshis for BTC, the token's base unit
/// for USDT). Blockonomics reports all amounts in these units, so no conversion is ever done on our side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} units", self.0)
    }
}

impl MinorUnits {
    pub fn value(&self) -> i64 {
        self.0
    }
}
