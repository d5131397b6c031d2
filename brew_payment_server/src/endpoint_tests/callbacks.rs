use actix_web::{http::StatusCode, test::TestRequest, web};
use brew_common::Secret;
use brew_payment_engine::db_types::OrderStatusType;

use super::{
    helpers::{json_body, order, order_api, send},
    mocks::MockStore,
};
use crate::{
    middleware::CallbackSecretMiddlewareFactory,
    routes::{CallbackGetRoute, CallbackPostRoute},
};

fn configure(store: MockStore, secret: Option<&str>) -> impl FnOnce(&mut web::ServiceConfig) {
    let secret = secret.map(|s| Secret::new(s.to_string()));
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(order_api(store))).service(
            web::scope("/callback")
                .wrap(CallbackSecretMiddlewareFactory::new(secret))
                .service(CallbackGetRoute::<MockStore>::new())
                .service(CallbackPostRoute::<MockStore>::new()),
        );
    }
}

/// A store holding one pending order for `bc1qpending`. `writes` is the number of updates the test expects.
fn store_with_pending_order(writes: usize) -> MockStore {
    let mut store = MockStore::new();
    store.expect_fetch_order().returning(|address| {
        if address == "bc1qpending" {
            Ok(Some(order(address, OrderStatusType::Pending, 0)))
        } else {
            Ok(None)
        }
    });
    store
        .expect_update_order()
        .times(writes)
        .withf(|order| order.status == OrderStatusType::Paid && order.txid.as_deref() == Some("deadbeef"))
        .returning(|order| Ok(order.clone()));
    store
}

#[actix_web::test]
async fn get_callback_marks_order_paid() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/callback?addr=bc1qpending&status=0&value=26000&txid=deadbeef");
    let (status, body) = send(req, configure(store_with_pending_order(1), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true}"#);
}

#[actix_web::test]
async fn post_callback_marks_order_paid() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/callback")
        .set_json(serde_json::json!({ "addr": "bc1qpending", "status": 0, "value": 26000, "txid": "deadbeef" }));
    let (status, body) = send(req, configure(store_with_pending_order(1), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true}"#);
}

#[actix_web::test]
async fn callback_for_unknown_address() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/callback?addr=bc1qstranger&status=2&txid=deadbeef");
    let (status, body) = send(req, configure(store_with_pending_order(0), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Order not found"}"#);
}

#[actix_web::test]
async fn callback_without_status() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/callback?addr=bc1qpending&txid=deadbeef");
    let (status, body) = send(req, configure(store_with_pending_order(0), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Missing addr or status"}"#);
}

#[actix_web::test]
async fn callback_with_garbled_status() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/callback?addr=bc1qpending&status=paid");
    let (status, body) = send(req, configure(store_with_pending_order(0), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_body(&body)["error"].as_str().unwrap().starts_with("Could not read request"));
}

#[actix_web::test]
async fn callback_secret_is_enforced() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/callback?addr=bc1qpending&status=0&txid=deadbeef");
    let (status, body) = send(req, configure(store_with_pending_order(0), Some("s3cret"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Invalid or missing callback secret"}"#);

    let req = TestRequest::get().uri("/callback?secret=guess&addr=bc1qpending&status=0&txid=deadbeef");
    let (status, _) = send(req, configure(store_with_pending_order(0), Some("s3cret"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = TestRequest::get().uri("/callback?secret=s3cret&addr=bc1qpending&status=0&txid=deadbeef");
    let (status, body) = send(req, configure(store_with_pending_order(1), Some("s3cret"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true}"#);
}
