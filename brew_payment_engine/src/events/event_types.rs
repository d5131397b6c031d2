use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderStatusType};

/// Emitted when a payment address is issued (or re-issued) and a fresh pending order is stored for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub order: Order,
}

impl OrderCreatedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Emitted when a payment signal moves an order to a different status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChangedEvent {
    pub old: Order,
    pub new: Order,
}

impl OrderStatusChangedEvent {
    pub fn new(old: Order, new: Order) -> Self {
        Self { old, new }
    }

    pub fn old_status(&self) -> OrderStatusType {
        self.old.status
    }

    pub fn new_status(&self) -> OrderStatusType {
        self.new.status
    }
}
