//! # In-Memory Sale Store
//!
//! A [`SaleStore`] over a `HashMap`, with the same contract as the SQLite
//! store: unique sale numbers, whole-aggregate saves, newest-first paging.
//!
//! Sales are kept as their flat records, so a loaded sale is a fresh copy and
//! never shares state with the instance that was saved.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use tally_core::{
    Sale, SaleFilter, SaleItemRecord, SaleRecord, SaleStore, StoreError, StoreResult,
};

type StoredSale = (SaleRecord, Vec<SaleItemRecord>);

#[derive(Debug, Default)]
pub struct InMemorySaleStore {
    sales: RwLock<HashMap<String, StoredSale>>,
}

impl InMemorySaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sales.
    pub async fn len(&self) -> usize {
        self.sales.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sales.read().await.is_empty()
    }
}

fn restore((record, items): &StoredSale) -> Sale {
    Sale::restore(record.clone(), items.clone())
}

#[async_trait]
impl SaleStore for InMemorySaleStore {
    async fn load(&self, id: &str) -> StoreResult<Option<Sale>> {
        Ok(self.sales.read().await.get(id).map(restore))
    }

    async fn load_by_number(&self, sale_number: &str) -> StoreResult<Option<Sale>> {
        let sales = self.sales.read().await;
        Ok(sales
            .values()
            .find(|(record, _)| record.sale_number == sale_number)
            .map(restore))
    }

    async fn save(&self, sale: &Sale) -> StoreResult<Sale> {
        let record = sale.to_record();
        let items = sale.item_records();
        debug!(id = %record.id, sale_number = %record.sale_number, "Saving sale in memory");

        let mut sales = self.sales.write().await;
        let taken = sales
            .values()
            .any(|(other, _)| other.sale_number == record.sale_number && other.id != record.id);
        if taken {
            return Err(StoreError::DuplicateSaleNumber(record.sale_number));
        }

        let stored = (record, items);
        let saved = restore(&stored);
        sales.insert(stored.0.id.clone(), stored);
        Ok(saved)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        Ok(self.sales.write().await.remove(id).is_some())
    }

    async fn list_page(&self, page: u32, size: u32, filter: &SaleFilter) -> StoreResult<Vec<Sale>> {
        let sales = self.sales.read().await;

        let mut matching: Vec<Sale> = sales
            .values()
            .map(restore)
            .filter(|sale| filter.matches(sale))
            .collect();
        matching.sort_by(|a, b| {
            b.sale_date()
                .cmp(&a.sale_date())
                .then_with(|| a.sale_number().cmp(b.sale_number()))
        });

        let offset = (page.max(1) as usize - 1) * size as usize;
        Ok(matching.into_iter().skip(offset).take(size as usize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tally_core::NewSale;

    fn sale(number: &str) -> Sale {
        Sale::new(NewSale {
            sale_number: number.to_string(),
            sale_date: Utc::now(),
            customer_id: "c-1".to_string(),
            customer_name: "Ada".to_string(),
            branch_id: "b-1".to_string(),
            branch_name: "Downtown".to_string(),
        })
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = InMemorySaleStore::new();
        let sale = sale("S-1");
        store.save(&sale).await.unwrap();

        assert_eq!(store.load(sale.id()).await.unwrap(), Some(sale.clone()));
        assert_eq!(store.load_by_number("S-1").await.unwrap(), Some(sale));
        assert!(store.load("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let store = InMemorySaleStore::new();
        store.save(&sale("S-1")).await.unwrap();
        let err = store.save(&sale("S-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSaleNumber(n) if n == "S-1"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_resave_same_sale_is_update() {
        let store = InMemorySaleStore::new();
        let mut sale = sale("S-1");
        store.save(&sale).await.unwrap();
        sale.cancel();
        store.save(&sale).await.unwrap();

        let loaded = store.load(sale.id()).await.unwrap().unwrap();
        assert!(loaded.is_cancelled());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemorySaleStore::new();
        let sale = sale("S-1");
        store.save(&sale).await.unwrap();
        assert!(store.delete(sale.id()).await.unwrap());
        assert!(!store.delete(sale.id()).await.unwrap());
        assert!(store.is_empty().await);
    }
}
