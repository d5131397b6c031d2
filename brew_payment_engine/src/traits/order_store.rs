use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, PaymentSignal},
    reducer::{reduce, ReconciliationPolicy},
};

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(String),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}

/// The before and after picture of an order that a payment signal was applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub old: Order,
    pub new: Order,
    /// Whether the new record was written. When false, `old` and `new` are identical.
    pub changed: bool,
}

/// Storage for order records, keyed by payment address.
///
/// Implementations do not need to guard against concurrent updates of the same address. The order flow API serializes
/// those with a per-address lock before calling into the store.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Stores a new order for `order.address`. This call is idempotent.
    /// Returns the stored record, and true if the order was inserted, or false if it already existed (in which case
    /// the existing record is returned untouched).
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderStoreError>;

    /// Fetches the order for the given payment address, if there is one.
    async fn fetch_order(&self, address: &str) -> Result<Option<Order>, OrderStoreError>;

    /// Overwrites the stored record for `order.address` and returns what was written.
    /// Fails with [`OrderStoreError::OrderNotFound`] if there is no such order.
    async fn update_order(&self, order: &Order) -> Result<Order, OrderStoreError>;

    /// The number of orders in the store.
    async fn count_orders(&self) -> Result<i64, OrderStoreError>;

    /// Applies a payment signal to the stored order: fetch, reduce and write back if anything changed.
    ///
    /// Returns `None` if there is no order for the signal's address. Signals never create orders.
    ///
    /// Backends that support transactions should override this so that the read and the write are atomic.
    async fn reconcile(
        &self,
        signal: &PaymentSignal,
        policy: ReconciliationPolicy,
    ) -> Result<Option<Reconciled>, OrderStoreError> {
        let Some(old) = self.fetch_order(&signal.address).await? else {
            return Ok(None);
        };
        let reduction = reduce(&old, signal, policy);
        let new = if reduction.changed { self.update_order(&reduction.order).await? } else { reduction.order };
        Ok(Some(Reconciled { old, new, changed: reduction.changed }))
    }
}
