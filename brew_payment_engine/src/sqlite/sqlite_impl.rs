//! `SqliteDatabase` is the production order store.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`OrderStore`] trait. Signal reconciliation runs
//! inside a single transaction, so that the record that was read is the record that gets overwritten. Write
//! transactions take the write lock with their first statement, so concurrent writers on different addresses queue
//! behind each other instead of failing with `SQLITE_BUSY`.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{create_database_if_missing, new_pool, orders, run_migrations};
use crate::{
    db_types::{NewOrder, Order, PaymentSignal},
    reducer::{reduce, ReconciliationPolicy},
    traits::{OrderStore, OrderStoreError, Reconciled},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderStore for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        orders::lock_for_write(&order.address, &mut tx).await?;
        let result = orders::idempotent_insert(order, &mut tx).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn fetch_order(&self, address: &str) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_address(address, &mut conn).await?;
        Ok(order)
    }

    async fn update_order(&self, order: &Order) -> Result<Order, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order(order, &mut conn).await
    }

    async fn count_orders(&self) -> Result<i64, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let count = orders::count_orders(&mut conn).await?;
        Ok(count)
    }

    async fn reconcile(
        &self,
        signal: &PaymentSignal,
        policy: ReconciliationPolicy,
    ) -> Result<Option<Reconciled>, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        orders::lock_for_write(&signal.address, &mut tx).await?;
        let Some(old) = orders::fetch_order_by_address(&signal.address, &mut tx).await? else {
            trace!("🗃️ No order for [{}]. Nothing to reconcile.", signal.address);
            return Ok(None);
        };
        let reduction = reduce(&old, signal, policy);
        let new = if reduction.changed {
            let updated = orders::update_order(&reduction.order, &mut tx).await?;
            tx.commit().await?;
            debug!("🗃️ Order [{}] moved from {} to {}", old.address, old.status, updated.status);
            updated
        } else {
            // Nothing was written, so just let the transaction roll back on drop
            reduction.order
        };
        Ok(Some(Reconciled { old, new, changed: reduction.changed }))
    }
}

impl SqliteDatabase {
    /// Connects to the database at `url`, creating the file and the schema if necessary.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        create_database_if_missing(url).await?;
        let pool = new_pool(url, max_connections).await?;
        run_migrations(&pool).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), sqlx::Error> {
        self.pool.close().await;
        Ok(())
    }
}
