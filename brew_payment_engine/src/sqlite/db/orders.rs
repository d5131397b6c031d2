use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order},
    traits::OrderStoreError,
};

/// Inserts the order into the database, returning `false` in the second parameter if the order already exists.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<(Order, bool), OrderStoreError> {
    let inserted = match fetch_order_by_address(&order.address, conn).await? {
        Some(order) => (order, false),
        None => {
            let order = insert_order(order, conn).await?;
            debug!("📝️ Order [{}] inserted", order.address);
            (order, true)
        },
    };
    Ok(inserted)
}

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (address, txid, currency, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *;
        "#,
    )
    .bind(order.address)
    .bind(order.txid)
    .bind(order.currency)
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

/// Takes the database write lock for the current transaction by touching the row for `address` (if any).
///
/// SQLite only honours the busy timeout when a transaction's first statement is a write. A transaction that reads
/// first and then tries to write fails at once with `SQLITE_BUSY` if another connection is writing, so every
/// read-modify-write transaction must start with this call.
pub async fn lock_for_write(address: &str, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET updated_at = updated_at WHERE address = $1").bind(address).execute(conn).await?;
    Ok(())
}

/// Returns the order for the given payment address
pub async fn fetch_order_by_address(
    address: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE address = $1").bind(address).fetch_optional(conn).await?;
    Ok(order)
}

/// Writes every mutable column of `order` back to the database. `address` and `created_at` are never touched, apart
/// from an explicit reset, which rewrites `created_at` too.
pub async fn update_order(order: &Order, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let updated: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = $2,
                txid = $3,
                value = $4,
                confirmations = $5,
                currency = $6,
                created_at = $7,
                updated_at = $8
            WHERE address = $1
            RETURNING *;
        "#,
    )
    .bind(&order.address)
    .bind(order.status)
    .bind(&order.txid)
    .bind(order.value)
    .bind(order.confirmations)
    .bind(order.currency)
    .bind(order.created_at)
    .bind(order.updated_at)
    .fetch_optional(conn)
    .await?;
    match updated {
        Some(o) => {
            trace!("📝️ Order [{}] updated. Status is now {}", o.address, o.status);
            Ok(o)
        },
        None => Err(OrderStoreError::OrderNotFound(order.address.clone())),
    }
}

pub async fn count_orders(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders").fetch_one(conn).await?;
    Ok(count)
}
