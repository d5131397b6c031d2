mod helpers;
mod minor_units;
mod secret;

pub use helpers::{parse_boolean_flag, parse_number};
pub use minor_units::{MinorUnits, BTC_CURRENCY_CODE, USDT_CURRENCY_CODE};
pub use secret::Secret;
