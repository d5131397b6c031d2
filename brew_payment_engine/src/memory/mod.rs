//! In-memory order store.
//!
//! Everything lives in a concurrent hash map and disappears when the process exits. Useful for tests, and for running
//! the storefront demo without a database file (`BBC_STORE=memory`).
use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use log::*;

use crate::{
    db_types::{NewOrder, Order},
    traits::{OrderStore, OrderStoreError},
};

#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    orders: Arc<DashMap<String, Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for MemoryOrderStore {
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderStoreError> {
        match self.orders.entry(order.address.clone()) {
            Entry::Occupied(existing) => Ok((existing.get().clone(), false)),
            Entry::Vacant(slot) => {
                let order = order.into_order();
                slot.insert(order.clone());
                debug!("🗃️ Order [{}] stored in memory", order.address);
                Ok((order, true))
            },
        }
    }

    async fn fetch_order(&self, address: &str) -> Result<Option<Order>, OrderStoreError> {
        Ok(self.orders.get(address).map(|o| o.value().clone()))
    }

    async fn update_order(&self, order: &Order) -> Result<Order, OrderStoreError> {
        match self.orders.get_mut(&order.address) {
            Some(mut stored) => {
                *stored = order.clone();
                trace!("🗃️ Order [{}] updated in memory", order.address);
                Ok(order.clone())
            },
            None => Err(OrderStoreError::OrderNotFound(order.address.clone())),
        }
    }

    async fn count_orders(&self) -> Result<i64, OrderStoreError> {
        i64::try_from(self.orders.len()).map_err(|e| OrderStoreError::DatabaseError(e.to_string()))
    }
}
