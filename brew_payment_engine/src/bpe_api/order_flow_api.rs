use std::fmt::Debug;

use log::*;

use crate::{
    bpe_api::errors::OrderFlowError,
    db_types::{Currency, NewOrder, Order, PaymentSignal},
    events::{EventProducers, OrderCreatedEvent, OrderStatusChangedEvent},
    helpers::AddressLocks,
    reducer::ReconciliationPolicy,
    traits::OrderStore,
};

/// `OrderFlowApi` is the primary API for storing orders and folding payment signals into them.
///
/// Every operation that modifies an order takes the per-address lock for that order first, so callbacks and push
/// messages for the same address are applied one after the other. The lock table lives inside the API and is shared
/// between clones, so create one instance at start-up and clone it into every worker.
pub struct OrderFlowApi<B> {
    db: B,
    locks: AddressLocks,
    policy: ReconciliationPolicy,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({} policy)", self.policy)
    }
}

impl<B: Clone> Clone for OrderFlowApi<B> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            locks: self.locks.clone(),
            policy: self.policy,
            producers: self.producers.clone(),
        }
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, policy: ReconciliationPolicy, producers: EventProducers) -> Self {
        Self { db, locks: AddressLocks::new(), policy, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn policy(&self) -> ReconciliationPolicy {
        self.policy
    }
}

impl<B> OrderFlowApi<B>
where B: OrderStore
{
    /// Stores a fresh pending order for an address that the payment processor just handed out.
    ///
    /// Processors can recycle addresses (Blockonomics does so in its test mode). When the address is already known,
    /// the existing record is reset to a brand-new pending order rather than carrying the old payment over.
    pub async fn issue_address(&self, address: &str, currency: Currency) -> Result<Order, OrderFlowError> {
        let _guard = self.locks.lock(address).await;
        let (order, inserted) = self.db.insert_order(NewOrder::new(address, currency)).await?;
        let order = if inserted {
            info!("🔄️📦️ New {currency} order created for [{address}]");
            order
        } else {
            warn!("🔄️📦️ Address [{address}] was issued before ({order}). Resetting it to a new pending order.");
            let mut fresh = order.reset();
            fresh.currency = currency;
            self.db.update_order(&fresh).await?
        };
        self.call_order_created_hook(&order).await;
        Ok(order)
    }

    /// Records a transfer that the shopper made from their own wallet, so that callbacks for it find an order.
    ///
    /// This is idempotent. Registering the same address again is not an error. The order is left as it is, apart from
    /// picking up `txhash` if it doesn't have a transaction id yet.
    pub async fn register_monitored_transfer(&self, txhash: &str, address: &str) -> Result<Order, OrderFlowError> {
        let txhash = txhash.trim();
        let address = address.trim();
        if txhash.is_empty() || address.is_empty() {
            return Err(OrderFlowError::ValidationError("Missing txhash or usdtAddress".into()));
        }
        let _guard = self.locks.lock(address).await;
        let new_order = NewOrder::new(address, Currency::Usdt).with_txid(txhash);
        let (order, inserted) = self.db.insert_order(new_order).await?;
        if inserted {
            info!("🔄️📦️ New USDT order for [{address}] created with txid {txhash}");
            self.call_order_created_hook(&order).await;
            return Ok(order);
        }
        match order.txid.as_deref() {
            None => {
                debug!("🔄️📦️ Order [{address}] already exists. Attaching txid {txhash}");
                let mut updated = order;
                updated.txid = Some(txhash.to_string());
                updated.updated_at = chrono::Utc::now();
                Ok(self.db.update_order(&updated).await?)
            },
            Some(existing) => {
                if existing != txhash {
                    warn!(
                        "🔄️📦️ Order [{address}] is already tracking txid {existing}. Ignoring the new txid {txhash}."
                    );
                } else {
                    debug!("🔄️📦️ Transfer {txhash} for [{address}] is already registered");
                }
                Ok(order)
            },
        }
    }

    /// Folds a payment signal into the order for `signal.address`.
    ///
    /// Returns the order as it is after the signal was applied. Fails with [`OrderFlowError::OrderNotFound`] if there
    /// is no order for the address.
    pub async fn process_signal(&self, signal: PaymentSignal) -> Result<Order, OrderFlowError> {
        trace!("🔄️💰️ Processing {signal}");
        let reconciled = {
            let _guard = self.locks.lock(&signal.address).await;
            self.db.reconcile(&signal, self.policy).await?
        };
        let reconciled = reconciled.ok_or_else(|| {
            debug!("🔄️💰️ Received a {} signal for unknown address [{}]", signal.source, signal.address);
            OrderFlowError::OrderNotFound(signal.address.clone())
        })?;
        if !reconciled.changed {
            debug!("🔄️💰️ {signal} changed nothing. Order remains {}", reconciled.new);
            return Ok(reconciled.new);
        }
        info!("🔄️💰️ Order updated by {}: {}", signal.source, reconciled.new);
        if reconciled.old.status != reconciled.new.status {
            self.call_status_changed_hook(&reconciled.old, &reconciled.new).await;
        }
        Ok(reconciled.new)
    }

    /// Returns the current record for `address`. Has no side effects.
    pub async fn order_status(&self, address: &str) -> Result<Order, OrderFlowError> {
        self.db.fetch_order(address).await?.ok_or_else(|| OrderFlowError::OrderNotFound(address.to_string()))
    }

    pub async fn order_count(&self) -> Result<i64, OrderFlowError> {
        Ok(self.db.count_orders().await?)
    }

    async fn call_order_created_hook(&self, order: &Order) {
        for emitter in &self.producers.order_created_producer {
            debug!("🔄️📦️ Notifying order created hook subscribers");
            emitter.publish_event(OrderCreatedEvent::new(order.clone())).await;
        }
    }

    async fn call_status_changed_hook(&self, old: &Order, new: &Order) {
        for emitter in &self.producers.status_changed_producer {
            debug!("🔄️💰️ Notifying status changed hook subscribers");
            emitter.publish_event(OrderStatusChangedEvent::new(old.clone(), new.clone())).await;
        }
    }
}
