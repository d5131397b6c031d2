use brew_payment_engine::{
    db_types::{Currency, NewOrder, Order},
    traits::{IssuedAddress, OrderStore, OrderStoreError, PaymentProcessor, ProcessorError},
};
use mockall::mock;

mock! {
    pub Store {}
    impl OrderStore for Store {
        async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderStoreError>;
        async fn fetch_order(&self, address: &str) -> Result<Option<Order>, OrderStoreError>;
        async fn update_order(&self, order: &Order) -> Result<Order, OrderStoreError>;
        async fn count_orders(&self) -> Result<i64, OrderStoreError>;
    }
}

mock! {
    pub Processor {}
    impl PaymentProcessor for Processor {
        async fn new_address(&self, currency: Currency) -> Result<IssuedAddress, ProcessorError>;
        async fn monitor_transaction(&self, txhash: &str, currency: Currency) -> Result<(), ProcessorError>;
    }
}
