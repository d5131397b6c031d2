use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
    HttpResponse,
};
use brew_payment_engine::{
    db_types::{Currency, NewOrder, Order, OrderStatusType},
    events::EventProducers,
    OrderFlowApi,
    ReconciliationPolicy,
};
use log::debug;

use super::mocks::MockStore;
use crate::helpers::{cors_headers, json_config, preflight_or_not_found, query_config};

pub const TEST_ORIGIN: &str = "http://localhost:5173";

/// Runs a single request against an app with the server's extractor configs, CORS headers and fallback service.
/// Errors raised by middleware are rendered the same way the HTTP dispatcher would.
pub async fn response(req: TestRequest, configure: impl FnOnce(&mut ServiceConfig)) -> HttpResponse {
    let app = App::new()
        .app_data(json_config())
        .app_data(query_config())
        .configure(configure)
        .default_service(web::to(preflight_or_not_found))
        .wrap(cors_headers(TEST_ORIGIN));
    let service = test::init_service(app).await;
    debug!("Making request");
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => res.into_parts().1.map_into_boxed_body(),
        Err(e) => e.error_response(),
    }
}

pub async fn send(req: TestRequest, configure: impl FnOnce(&mut ServiceConfig)) -> (StatusCode, String) {
    let res = response(req, configure).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub fn json_body(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("Response body is not JSON")
}

pub fn order_api(store: MockStore) -> OrderFlowApi<MockStore> {
    OrderFlowApi::new(store, ReconciliationPolicy::Monotonic, EventProducers::default())
}

pub fn order(address: &str, status: OrderStatusType, confirmations: i64) -> Order {
    let mut order = NewOrder::new(address, Currency::Btc).into_order();
    order.status = status;
    order.confirmations = confirmations;
    order
}
