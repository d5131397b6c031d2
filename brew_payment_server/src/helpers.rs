use actix_web::{
    http::{header, Method},
    middleware::DefaultHeaders,
    web,
    HttpRequest,
    HttpResponse,
};
use blockonomics_tools::CallbackParams;
use brew_common::MinorUnits;
use brew_payment_engine::db_types::{PaymentSignal, SignalSource};
use log::*;

use crate::errors::ServerError;

/// Validates a Blockonomics callback and converts it into a payment signal. `addr` and `status` are required.
pub fn signal_from_callback(params: CallbackParams) -> Result<PaymentSignal, ServerError> {
    let address = params.addr.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());
    let (address, status) = match (address, params.status) {
        (Some(address), Some(status)) => (address, status),
        _ => return Err(ServerError::ValidationError("Missing addr or status".into())),
    };
    let mut signal = PaymentSignal::new(address, status, SignalSource::Callback);
    if let Some(txid) = params.txid.filter(|t| !t.is_empty()) {
        signal = signal.with_txid(txid);
    }
    if let Some(value) = params.value {
        signal = signal.with_value(MinorUnits::from(value));
    }
    if params.rbf.unwrap_or_default() != 0 {
        warn!("💻️ Transaction for [{}] signals replace-by-fee. Treat unconfirmed payments with care.", signal.address);
    }
    Ok(signal)
}

/// The CORS headers every response carries.
pub fn cors_headers(origin: &str) -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.to_string()))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
}

/// Fallback service. Answers CORS preflight requests and turns everything else into a JSON 404.
pub async fn preflight_or_not_found(req: HttpRequest) -> Result<HttpResponse, ServerError> {
    if req.method() == Method::OPTIONS {
        trace!("💻️ Preflight request for {}", req.path());
        Ok(HttpResponse::NoContent().finish())
    } else {
        debug!("💻️ No route for {} {}", req.method(), req.path());
        Err(ServerError::RouteNotFound)
    }
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ServerError::InvalidRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| ServerError::InvalidRequest(err.to_string()).into())
}
