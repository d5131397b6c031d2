use brew_payment_engine::{
    events::EventProducers,
    OrderFlowApi,
    OrderFlowError,
    ReconciliationPolicy,
    SqliteDatabase,
};
use cucumber::World;
use log::*;

use crate::support::prepare_env::random_db_path;

#[derive(Default, Debug, World)]
pub struct CafeWorld {
    pub system: Option<OrderSystem>,
    pub last_error: Option<OrderFlowError>,
}

#[derive(Debug)]
pub struct OrderSystem {
    pub db_path: String,
    pub api: OrderFlowApi<SqliteDatabase>,
}

impl CafeWorld {
    pub fn api(&self) -> &OrderFlowApi<SqliteDatabase> {
        &self.system.as_ref().expect("OrderFlowApi not initialised").api
    }

    /// Stores the error (if any) so that a later step can check it.
    pub fn record<T>(&mut self, result: Result<T, OrderFlowError>) {
        self.last_error = result.err();
    }
}

impl OrderSystem {
    pub async fn new(policy: ReconciliationPolicy) -> Self {
        let url = random_db_path();
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        let api = OrderFlowApi::new(db, policy, EventProducers::default());
        Self { db_path: url, api }
    }
}
