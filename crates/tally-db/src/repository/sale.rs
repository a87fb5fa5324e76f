//! # Sale Repository
//!
//! SQLite implementation of the [`SaleStore`] port.
//!
//! ## Saving an Aggregate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       save(&sale)                                       │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── INSERT INTO sales ... ON CONFLICT(id) DO UPDATE   (header)       │
//! │   ├── DELETE FROM sale_items WHERE sale_id = ?          (old lines)    │
//! │   └── INSERT INTO sale_items ...  × n                   (new lines)    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure rolls the whole aggregate back: a sale is never stored    │
//! │  with half of its items.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are checked at runtime (`sqlx::query` / `query_as`), so the crate
//! builds without a live database.

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::{
    Sale, SaleFilter, SaleItemRecord, SaleRecord, SaleStore, StoreResult,
};

const SALE_COLUMNS: &str = "id, sale_number, sale_date, customer_id, customer_name, \
     branch_id, branch_name, total_amount_cents, status, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, sale_id, position, product_id, product_name, quantity, \
     unit_price_cents, discount_bps, total_amount_cents, is_cancelled";

/// SQLite-backed sale store.
#[derive(Debug, Clone)]
pub struct SqliteSaleStore {
    pool: SqlitePool,
}

impl SqliteSaleStore {
    /// Creates a store over an existing pool. Usually obtained through
    /// [`Database::sales`](crate::Database::sales).
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSaleStore { pool }
    }

    /// Number of stored sales matching `filter`.
    pub async fn count(&self, filter: &SaleFilter) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales \
             WHERE (?1 IS NULL OR customer_id = ?1) AND (?2 IS NULL OR branch_id = ?2)",
        )
        .bind(filter.customer_id.as_deref())
        .bind(filter.branch_id.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    async fn fetch_sale(&self, column: &str, value: &str) -> DbResult<Option<Sale>> {
        debug!(column, value, "Loading sale");

        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE {column} = ?1");
        let record: Option<SaleRecord> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        match record {
            Some(record) => {
                let items = self.fetch_items(&record.id).await?;
                Ok(Some(Sale::restore(record, items)))
            }
            None => Ok(None),
        }
    }

    async fn fetch_items(&self, sale_id: &str) -> DbResult<Vec<SaleItemRecord>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY position"
        );
        let items = sqlx::query_as(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn fetch_page(&self, page: u32, size: u32, filter: &SaleFilter) -> DbResult<Vec<Sale>> {
        let offset = i64::from(page.max(1) - 1) * i64::from(size);
        debug!(page, size, offset, ?filter, "Listing sales");

        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE (?1 IS NULL OR customer_id = ?1) AND (?2 IS NULL OR branch_id = ?2) \
             ORDER BY sale_date DESC, sale_number ASC \
             LIMIT ?3 OFFSET ?4"
        );
        let records: Vec<SaleRecord> = sqlx::query_as(&sql)
            .bind(filter.customer_id.as_deref())
            .bind(filter.branch_id.as_deref())
            .bind(i64::from(size))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut sales = Vec::with_capacity(records.len());
        for record in records {
            let items = self.fetch_items(&record.id).await?;
            sales.push(Sale::restore(record, items));
        }
        Ok(sales)
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    async fn write_sale(&self, sale: &Sale) -> DbResult<()> {
        let record = sale.to_record();
        let items = sale.item_records();
        debug!(
            id = %record.id,
            sale_number = %record.sale_number,
            items = items.len(),
            "Saving sale"
        );

        let mut tx = self.pool.begin().await?;

        upsert_header(&mut tx, &record).await.map_err(|e| {
            if e.is_duplicate_sale_number() {
                DbError::duplicate("sales.sale_number", record.sale_number.clone())
            } else {
                e
            }
        })?;

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(&record.id)
            .execute(&mut *tx)
            .await?;

        for item in &items {
            insert_item(&mut tx, item).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove_sale(&self, id: &str) -> DbResult<bool> {
        debug!(id, "Deleting sale");

        // sale_items rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn upsert_header(tx: &mut Transaction<'_, Sqlite>, record: &SaleRecord) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales (
            id, sale_number, sale_date,
            customer_id, customer_name, branch_id, branch_name,
            total_amount_cents, status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(id) DO UPDATE SET
            sale_number        = excluded.sale_number,
            sale_date          = excluded.sale_date,
            customer_id        = excluded.customer_id,
            customer_name      = excluded.customer_name,
            branch_id          = excluded.branch_id,
            branch_name        = excluded.branch_name,
            total_amount_cents = excluded.total_amount_cents,
            status             = excluded.status,
            updated_at         = excluded.updated_at
        "#,
    )
    .bind(&record.id)
    .bind(&record.sale_number)
    .bind(record.sale_date)
    .bind(&record.customer_id)
    .bind(&record.customer_name)
    .bind(&record.branch_id)
    .bind(&record.branch_name)
    .bind(record.total_amount_cents)
    .bind(record.status)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_item(tx: &mut Transaction<'_, Sqlite>, item: &SaleItemRecord) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sale_items (
            id, sale_id, position, product_id, product_name, quantity,
            unit_price_cents, discount_bps, total_amount_cents, is_cancelled
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&item.id)
    .bind(&item.sale_id)
    .bind(item.position)
    .bind(&item.product_id)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.discount_bps)
    .bind(item.total_amount_cents)
    .bind(item.is_cancelled)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl SaleStore for SqliteSaleStore {
    async fn load(&self, id: &str) -> StoreResult<Option<Sale>> {
        Ok(self.fetch_sale("id", id).await?)
    }

    async fn load_by_number(&self, sale_number: &str) -> StoreResult<Option<Sale>> {
        Ok(self.fetch_sale("sale_number", sale_number).await?)
    }

    async fn save(&self, sale: &Sale) -> StoreResult<Sale> {
        self.write_sale(sale).await?;
        Ok(Sale::restore(sale.to_record(), sale.item_records()))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        Ok(self.remove_sale(id).await?)
    }

    async fn list_page(&self, page: u32, size: u32, filter: &SaleFilter) -> StoreResult<Vec<Sale>> {
        Ok(self.fetch_page(page, size, filter).await?)
    }
}
