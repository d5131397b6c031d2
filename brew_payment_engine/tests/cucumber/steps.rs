use std::time::Duration;

use brew_payment_engine::{
    db_types::{Currency, MinorUnits, Order, OrderStatusType, PaymentSignal, SignalSource},
    OrderFlowError,
};
use cucumber::{then, when};

use crate::cucumber::CafeWorld;

#[when(expr = "the processor issues {word} address {word}")]
async fn issue_address(world: &mut CafeWorld, currency: String, address: String) {
    let currency = currency.parse::<Currency>().expect("Not a supported currency");
    let result = world.api().issue_address(&address, currency).await;
    world.record(result);
}

#[when(expr = "a callback for {word} arrives with status {int}")]
async fn callback(world: &mut CafeWorld, address: String, status: i64) {
    let signal = PaymentSignal::new(address, status, SignalSource::Callback);
    let result = world.api().process_signal(signal).await;
    world.record(result);
}

#[when(expr = "a callback for {word} arrives with status {int}, value {int} and txid {word}")]
async fn full_callback(world: &mut CafeWorld, address: String, status: i64, value: i64, txid: String) {
    let signal =
        PaymentSignal::new(address, status, SignalSource::Callback).with_value(MinorUnits::from(value)).with_txid(txid);
    let result = world.api().process_signal(signal).await;
    world.record(result);
}

#[when(expr = "a push message for {word} arrives with status {int}")]
async fn push_message(world: &mut CafeWorld, address: String, status: i64) {
    let signal = PaymentSignal::new(address, status, SignalSource::Push);
    let result = world.api().process_signal(signal).await;
    world.record(result);
}

#[when(expr = "the shopper registers USDT transfer {word} to {word}")]
async fn register_transfer(world: &mut CafeWorld, txhash: String, address: String) {
    let result = world.api().register_monitored_transfer(&txhash, &address).await;
    world.record(result);
}

#[when(expr = "I pause for {int}ms")]
async fn pause(_world: &mut CafeWorld, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

async fn fetch_order(world: &CafeWorld, address: &str) -> Order {
    world.api().order_status(address).await.expect("Error fetching order")
}

#[then(expr = "order {word} has status {word}")]
async fn check_status(world: &mut CafeWorld, address: String, status: String) {
    let expected = status.parse::<OrderStatusType>().expect("Not a valid order status");
    assert_eq!(fetch_order(world, &address).await.status, expected);
}

#[then(expr = "order {word} has {int} confirmations")]
async fn check_confirmations(world: &mut CafeWorld, address: String, confirmations: i64) {
    assert_eq!(fetch_order(world, &address).await.confirmations, confirmations);
}

#[then(expr = "order {word} has txid {word}")]
async fn check_txid(world: &mut CafeWorld, address: String, txid: String) {
    assert_eq!(fetch_order(world, &address).await.txid, Some(txid));
}

#[then(expr = "order {word} has no txid")]
async fn check_no_txid(world: &mut CafeWorld, address: String) {
    assert_eq!(fetch_order(world, &address).await.txid, None);
}

#[then(expr = "order {word} has value {int}")]
async fn check_value(world: &mut CafeWorld, address: String, value: i64) {
    assert_eq!(fetch_order(world, &address).await.value, Some(MinorUnits::from(value)));
}

#[then(expr = "order {word} is paid in {word}")]
async fn check_currency(world: &mut CafeWorld, address: String, currency: String) {
    let expected = currency.parse::<Currency>().expect("Not a supported currency");
    assert_eq!(fetch_order(world, &address).await.currency, expected);
}

#[then(expr = "order {word} does not exist")]
async fn check_missing(world: &mut CafeWorld, address: String) {
    let result = world.api().order_status(&address).await;
    assert!(matches!(result, Err(OrderFlowError::OrderNotFound(a)) if a == address));
}

#[then(expr = "there {word} {int} order(s)")]
async fn check_count(world: &mut CafeWorld, _verb: String, count: i64) {
    assert_eq!(world.api().order_count().await.expect("Error counting orders"), count);
}

#[then("the last request failed because the order was not found")]
async fn check_not_found(world: &mut CafeWorld) {
    assert!(matches!(world.last_error, Some(OrderFlowError::OrderNotFound(_))), "{:?}", world.last_error);
}

#[then("the last request failed validation")]
async fn check_validation(world: &mut CafeWorld) {
    assert!(matches!(world.last_error, Some(OrderFlowError::ValidationError(_))), "{:?}", world.last_error);
}

#[then("the last request succeeded")]
async fn check_success(world: &mut CafeWorld) {
    assert!(world.last_error.is_none(), "{:?}", world.last_error);
}
