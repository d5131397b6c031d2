use std::fmt::Debug;

use log::*;

use crate::{
    bpe_api::{errors::OrderFlowError, order_flow_api::OrderFlowApi},
    db_types::{Currency, Order},
    traits::{IssuedAddress, OrderStore, PaymentProcessor},
};

/// `CheckoutApi` drives the two ways a shopper starts paying: asking for a fresh Bitcoin address, or telling us about
/// a USDT transfer they made from their own wallet. Both need the payment processor as well as the order store.
pub struct CheckoutApi<B, P> {
    orders: OrderFlowApi<B>,
    processor: P,
}

impl<B, P> Debug for CheckoutApi<B, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<B: Clone, P: Clone> Clone for CheckoutApi<B, P> {
    fn clone(&self) -> Self {
        Self { orders: self.orders.clone(), processor: self.processor.clone() }
    }
}

impl<B, P> CheckoutApi<B, P> {
    pub fn new(orders: OrderFlowApi<B>, processor: P) -> Self {
        Self { orders, processor }
    }

    pub fn orders(&self) -> &OrderFlowApi<B> {
        &self.orders
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }
}

impl<B, P> CheckoutApi<B, P>
where
    B: OrderStore,
    P: PaymentProcessor,
{
    /// Asks the processor for a new Bitcoin address and stores a pending order for it.
    ///
    /// Nothing is stored if the processor fails. The processor's response is returned so that it can be passed on to
    /// the storefront unchanged.
    pub async fn issue_btc_address(&self) -> Result<IssuedAddress, OrderFlowError> {
        let issued = self.processor.new_address(Currency::Btc).await.map_err(|e| {
            warn!("🛒️ Could not get a new BTC address. {e}");
            e
        })?;
        let order = self.orders.issue_address(&issued.address, Currency::Btc).await?;
        debug!("🛒️ Issued {order}");
        Ok(issued)
    }

    /// Records a USDT transfer against its receiving address and asks the processor to watch it.
    ///
    /// The order is stored before the processor is called, so a failed upstream registration still leaves a record
    /// that a later retry (or a callback) can find.
    pub async fn monitor_usdt_transaction(&self, txhash: &str, address: &str) -> Result<Order, OrderFlowError> {
        let order = self.orders.register_monitored_transfer(txhash, address).await?;
        self.processor.monitor_transaction(txhash.trim(), Currency::Usdt).await.map_err(|e| {
            warn!("🛒️ Could not register USDT transfer {txhash} for monitoring. {e}");
            e
        })?;
        info!("🛒️ USDT transfer {txhash} to [{}] is being monitored", order.address);
        Ok(order)
    }
}
