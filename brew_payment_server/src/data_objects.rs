use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /monitor_usdt_transaction`.
///
/// Both fields are optional here so that a missing field is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorUsdtRequest {
    pub txhash: Option<String>,
    #[serde(rename = "usdtAddress")]
    pub usdt_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
}

impl JsonResponse {
    pub fn success() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub orders: i64,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn ok(orders: i64) -> Self {
        Self { status: "ok".into(), orders, timestamp: Utc::now() }
    }
}
