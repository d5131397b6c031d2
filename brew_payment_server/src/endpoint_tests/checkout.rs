use actix_web::{http::StatusCode, test::TestRequest, web};
use brew_payment_engine::{
    db_types::{Currency, OrderStatusType},
    traits::{IssuedAddress, ProcessorError},
    CheckoutApi,
};
use serde_json::json;

use super::{
    helpers::{json_body, order_api, send},
    mocks::{MockProcessor, MockStore},
};
use crate::routes::{MonitorUsdtTransactionRoute, NewAddressRoute};

fn configure(store: MockStore, processor: MockProcessor) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let api = CheckoutApi::new(order_api(store), processor);
        cfg.app_data(web::Data::new(api))
            .service(NewAddressRoute::<MockStore, MockProcessor>::new())
            .service(MonitorUsdtTransactionRoute::<MockStore, MockProcessor>::new());
    }
}

fn rejection() -> ProcessorError {
    ProcessorError::Rejected { status: 401, message: "Invalid API key".into(), details: "Unauthorized".into() }
}

#[actix_web::test]
async fn new_address_passes_upstream_response_through() {
    let _ = env_logger::try_init().ok();
    let mut processor = MockProcessor::new();
    processor.expect_new_address().times(1).returning(|currency| {
        assert_eq!(currency, Currency::Btc);
        Ok(IssuedAddress {
            address: "bc1qfresh".into(),
            payload: json!({ "address": "bc1qfresh", "reset": 0, "account": "xpub6C" }),
        })
    });
    let mut store = MockStore::new();
    store
        .expect_insert_order()
        .times(1)
        .withf(|order| order.address == "bc1qfresh" && order.currency == Currency::Btc && order.txid.is_none())
        .returning(|order| Ok((order.into_order(), true)));
    let (status, body) = send(TestRequest::post().uri("/new_address"), configure(store, processor)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({ "address": "bc1qfresh", "reset": 0, "account": "xpub6C" }));
}

#[actix_web::test]
async fn new_address_upstream_rejection() {
    let _ = env_logger::try_init().ok();
    let mut processor = MockProcessor::new();
    processor.expect_new_address().returning(|_| Err(rejection()));
    let mut store = MockStore::new();
    store.expect_insert_order().never();
    let (status, body) = send(TestRequest::post().uri("/new_address"), configure(store, processor)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(&body), json!({ "error": "Invalid API key", "details": "Unauthorized" }));
}

#[actix_web::test]
async fn new_address_upstream_unreachable() {
    let _ = env_logger::try_init().ok();
    let mut processor = MockProcessor::new();
    processor.expect_new_address().returning(|_| Err(ProcessorError::Unavailable("connection refused".into())));
    let (status, _) = send(TestRequest::post().uri("/new_address"), configure(MockStore::new(), processor)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn monitor_usdt_transaction() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_insert_order()
        .times(1)
        .withf(|order| order.address == "0xcafe" && order.txid.as_deref() == Some("0xhash"))
        .returning(|order| Ok((order.into_order(), true)));
    let mut processor = MockProcessor::new();
    processor
        .expect_monitor_transaction()
        .times(1)
        .withf(|txhash, currency| txhash == "0xhash" && *currency == Currency::Usdt)
        .returning(|_, _| Ok(()));
    let req = TestRequest::post()
        .uri("/monitor_usdt_transaction")
        .set_json(json!({ "txhash": "0xhash", "usdtAddress": "0xcafe" }));
    let (status, body) = send(req, configure(store, processor)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true}"#);
}

#[actix_web::test]
async fn monitor_usdt_transaction_missing_fields() {
    let _ = env_logger::try_init().ok();
    let mut processor = MockProcessor::new();
    processor.expect_monitor_transaction().never();
    let mut store = MockStore::new();
    store.expect_insert_order().never();
    let req = TestRequest::post().uri("/monitor_usdt_transaction").set_json(json!({ "txhash": "0xhash" }));
    let (status, body) = send(req, configure(store, processor)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Missing txhash or usdtAddress"}"#);
}

#[actix_web::test]
async fn monitor_usdt_transaction_upstream_rejection() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_insert_order().times(1).returning(|order| Ok((order.into_order(), true)));
    let mut processor = MockProcessor::new();
    processor.expect_monitor_transaction().returning(|_, _| Err(rejection()));
    let req = TestRequest::post()
        .uri("/monitor_usdt_transaction")
        .set_json(json!({ "txhash": "0xhash", "usdtAddress": "0xcafe" }));
    let (status, body) = send(req, configure(store, processor)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(&body)["error"], "Invalid API key");
}

#[actix_web::test]
async fn existing_usdt_order_is_not_an_error() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_insert_order().returning(|order| {
        let mut existing = order.into_order();
        existing.status = OrderStatusType::Paid;
        Ok((existing, false))
    });
    let mut processor = MockProcessor::new();
    processor.expect_monitor_transaction().times(1).returning(|_, _| Ok(()));
    let req = TestRequest::post()
        .uri("/monitor_usdt_transaction")
        .set_json(json!({ "txhash": "0xhash", "usdtAddress": "0xcafe" }));
    let (status, body) = send(req, configure(store, processor)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true}"#);
}
