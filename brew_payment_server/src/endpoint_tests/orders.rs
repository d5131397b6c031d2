use actix_web::{
    http::{header, StatusCode},
    test::TestRequest,
    web,
};
use brew_payment_engine::{db_types::OrderStatusType, traits::OrderStoreError};
use serde_json::json;

use super::{
    helpers::{json_body, order, order_api, response, send, TEST_ORIGIN},
    mocks::MockStore,
};
use crate::routes::{HealthRoute, OrderStatusRoute};

fn configure(store: MockStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(order_api(store)))
            .service(OrderStatusRoute::<MockStore>::new())
            .service(HealthRoute::<MockStore>::new());
    }
}

fn store_with_one_order() -> MockStore {
    let mut store = MockStore::new();
    store.expect_fetch_order().returning(|address| {
        if address == "bc1qknown" {
            let mut order = order(address, OrderStatusType::Paid, 0);
            order.txid = Some("deadbeef".into());
            Ok(Some(order))
        } else {
            Ok(None)
        }
    });
    store
}

#[actix_web::test]
async fn order_status_found() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/order_status/bc1qknown");
    let (status, body) = send(req, configure(store_with_one_order())).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["address"], "bc1qknown");
    assert_eq!(body["status"], "paid");
    assert_eq!(body["txid"], "deadbeef");
    assert_eq!(body["confirmations"], 0);
    assert_eq!(body["currency"], "BTC");
    assert!(body["createdAt"].is_string());
}

#[actix_web::test]
async fn order_status_not_found() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/order_status/bc1qunknown");
    let (status, body) = send(req, configure(store_with_one_order())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Order not found"}"#);
}

#[actix_web::test]
async fn health_reports_order_count() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_count_orders().times(1).returning(|| Ok(3));
    let (status, body) = send(TestRequest::get().uri("/health"), configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["orders"], 3);
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn health_with_broken_storage() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_count_orders().returning(|| Err(OrderStoreError::DatabaseError("disk I/O error".into())));
    let (status, body) = send(TestRequest::get().uri("/health"), configure(store)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(&body)["error"].as_str().unwrap().contains("disk I/O error"));
}

#[actix_web::test]
async fn preflight_requests() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::default().method(actix_web::http::Method::OPTIONS).uri("/order_status/bc1qknown");
    let res = response(req, configure(MockStore::new())).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let origin = res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).expect("No CORS header");
    assert_eq!(origin.to_str().unwrap(), TEST_ORIGIN);
}

#[actix_web::test]
async fn unknown_routes() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send(TestRequest::get().uri("/orders"), configure(MockStore::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), json!({ "error": "Not found" }));
}
