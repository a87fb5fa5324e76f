//! Workflow tests against `InMemorySaleStore`, plus one end-to-end run on
//! SQLite.

use chrono::{Duration, Utc};
use tally_core::{Money, NewSaleItem, SaleEvent, SaleStatus, SaleStore};
use tally_db::{Database, DbConfig, InMemorySaleStore};
use tally_sales_service::{
    CancelSale, CreateSale, ErrorCode, ErrorResponse, ListSales, SalesService, ServiceError,
    UpdateSale,
};

fn service() -> SalesService<InMemorySaleStore> {
    SalesService::new(InMemorySaleStore::new())
}

fn line(name: &str, quantity: i64, cents: i64) -> NewSaleItem {
    NewSaleItem {
        product_id: format!("product-{name}"),
        product_name: name.to_string(),
        quantity,
        unit_price: Money::from_cents(cents),
    }
}

fn create(items: Vec<NewSaleItem>) -> CreateSale {
    CreateSale {
        sale_number: None,
        sale_date: None,
        customer_id: "customer-1".to_string(),
        customer_name: "Ada Lovelace".to_string(),
        branch_id: "branch-1".to_string(),
        branch_name: "Downtown".to_string(),
        items,
    }
}

fn update(id: &str, items: Vec<NewSaleItem>) -> UpdateSale {
    UpdateSale {
        id: id.to_string(),
        customer_name: "Grace Hopper".to_string(),
        branch_name: "Harbourside".to_string(),
        items,
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_prices_basket() {
    let service = service();
    let outcome = service
        .create_sale(create(vec![
            line("a", 1, 10_000),
            line("b", 2, 10_000),
            line("c", 3, 10_000),
        ]))
        .await
        .unwrap();

    let sale = &outcome.sale;
    assert_eq!(sale.sale.total_amount_cents, 54_000);
    assert_eq!(sale.sale.status, SaleStatus::Active);
    assert!(sale.sale.sale_number.starts_with("S-"));
    assert!(sale.items.iter().all(|i| i.discount_bps == 1_000));

    assert_eq!(outcome.events.len(), 1);
    assert!(matches!(outcome.events[0], SaleEvent::SaleCreated { .. }));

    let stored = service.store().load(&sale.sale.id).await.unwrap().unwrap();
    assert_eq!(stored.total_amount(), Money::from_cents(54_000));
}

#[tokio::test]
async fn test_create_bulk_tier() {
    let outcome = service()
        .create_sale(create(vec![line("a", 15, 100)]))
        .await
        .unwrap();
    assert_eq!(outcome.sale.sale.total_amount_cents, 1_200);
}

#[tokio::test]
async fn test_create_keeps_supplied_number_and_date() {
    let date = Utc::now() - Duration::days(3);
    let mut cmd = create(vec![line("a", 1, 500)]);
    cmd.sale_number = Some("  INV-42 ".to_string());
    cmd.sale_date = Some(date);

    let outcome = service().create_sale(cmd).await.unwrap();
    assert_eq!(outcome.sale.sale.sale_number, "INV-42");
    assert_eq!(outcome.sale.sale.sale_date, date);
    assert_eq!(outcome.sale.sale.total_amount_cents, 500);
}

#[tokio::test]
async fn test_create_rejects_duplicate_number() {
    let service = service();
    let mut cmd = create(vec![line("a", 1, 500)]);
    cmd.sale_number = Some("INV-1".to_string());
    service.create_sale(cmd.clone()).await.unwrap();

    let err = service.create_sale(cmd).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(ref n) if n == "INV-1"));
    assert_eq!(service.store().len().await, 1);
}

#[tokio::test]
async fn test_create_collects_every_command_problem() {
    let mut cmd = create(vec![line("a", 0, 0)]);
    cmd.customer_name = "x".repeat(101);

    let err = service().create_sale(cmd).await.unwrap_err();
    let ServiceError::Validation(report) = err else {
        panic!("expected validation error");
    };
    assert!(report.has_error_for("customerName"));
    assert!(report.has_error_for("items[0].quantity"));
    assert!(report.has_error_for("items[0].unitPrice"));
}

#[tokio::test]
async fn test_create_rejects_line_over_twenty_units() {
    let service = service();
    let err = service
        .create_sale(create(vec![line("a", 21, 100)]))
        .await
        .unwrap_err();

    let ServiceError::Validation(report) = err else {
        panic!("expected validation error");
    };
    assert!(report.has_error_for("items[0].quantity"));
    assert!(service.store().is_empty().await);
}

#[tokio::test]
async fn test_create_with_huge_quantity_is_a_validation_error() {
    let service = service();
    let err = service
        .create_sale(create(vec![line("a", 1_000_000_000_000, 100_000_000)]))
        .await
        .unwrap_err();

    let ServiceError::Validation(report) = err else {
        panic!("expected validation error");
    };
    assert!(report
        .errors
        .iter()
        .any(|e| e.field == "items[0].quantity"
            && e.message == "Cannot sell more than 20 identical items"));
    assert!(service.store().is_empty().await);
}

#[tokio::test]
async fn test_update_with_huge_quantity_is_a_validation_error() {
    let service = service();
    let created = service
        .create_sale(create(vec![line("a", 1, 100)]))
        .await
        .unwrap();
    let id = created.sale.sale.id.clone();

    let err = service
        .update_sale(update(&id, vec![line("b", i64::MAX, 100_000_000), line("c", 5, 100)]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref r) if r.has_error_for("items[0].quantity")));

    let stored = service.get_sale(&id).await.unwrap();
    assert_eq!(stored.sale.total_amount_cents, 100);
}

// =============================================================================
// Get / Update
// =============================================================================

#[tokio::test]
async fn test_get_sale() {
    let service = service();
    let created = service
        .create_sale(create(vec![line("a", 2, 1_000)]))
        .await
        .unwrap();

    let details = service.get_sale(&created.sale.sale.id).await.unwrap();
    assert_eq!(details, created.sale);

    let err = service.get_sale("missing").await.unwrap_err();
    assert_eq!(err.to_string(), "Sale with ID missing not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn test_update_replaces_items_and_reprices() {
    let service = service();
    let created = service
        .create_sale(create(vec![line("a", 1, 10_000)]))
        .await
        .unwrap();
    let id = created.sale.sale.id.clone();
    assert_eq!(created.sale.sale.total_amount_cents, 10_000);

    let outcome = service
        .update_sale(update(&id, vec![line("b", 5, 10_000)]))
        .await
        .unwrap();

    assert_eq!(outcome.sale.sale.total_amount_cents, 45_000);
    assert_eq!(outcome.sale.sale.customer_name, "Grace Hopper");
    assert_eq!(outcome.sale.sale.branch_name, "Harbourside");
    assert_eq!(outcome.sale.items.len(), 1);
    assert_eq!(outcome.sale.items[0].product_name, "b");

    match &outcome.events[..] {
        [SaleEvent::SaleModified {
            previous_total_cents,
            new_total_cents,
            ..
        }] => {
            assert_eq!(*previous_total_cents, 10_000);
            assert_eq!(*new_total_cents, 45_000);
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_missing_sale() {
    let err = service()
        .update_sale(update("missing", vec![line("a", 1, 100)]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_update_cancelled_sale_is_refused() {
    let service = service();
    let created = service
        .create_sale(create(vec![line("a", 1, 100)]))
        .await
        .unwrap();
    let id = created.sale.sale.id.clone();
    service.cancel_sale(CancelSale::new(&id)).await.unwrap();

    let err = service
        .update_sale(update(&id, vec![line("b", 2, 100)]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::SaleCancelled));
    assert_eq!(ErrorResponse::from(&err).code, ErrorCode::BusinessRule);

    let stored = service.get_sale(&id).await.unwrap();
    assert_eq!(stored.items[0].product_name, "a");
}

// =============================================================================
// Cancel / Delete
// =============================================================================

#[tokio::test]
async fn test_cancel_sale_once() {
    let service = service();
    let created = service
        .create_sale(create(vec![line("a", 1, 100)]))
        .await
        .unwrap();
    let id = created.sale.sale.id.clone();

    let outcome = service
        .cancel_sale(CancelSale::new(&id).with_reason("customer changed their mind"))
        .await
        .unwrap();
    assert_eq!(outcome.sale.sale.status, SaleStatus::Cancelled);
    assert!(matches!(
        &outcome.events[..],
        [SaleEvent::SaleCancelled { reason: Some(_), .. }]
    ));

    let err = service.cancel_sale(CancelSale::new(&id)).await.unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyCancelled));
    assert_eq!(err.to_string(), "Sale is already cancelled");
}

#[tokio::test]
async fn test_cancel_item_keeps_total() {
    let service = service();
    let created = service
        .create_sale(create(vec![line("a", 2, 1_000), line("b", 2, 1_000)]))
        .await
        .unwrap();
    let id = created.sale.sale.id.clone();
    let item_id = created.sale.items[0].id.clone();

    let outcome = service
        .cancel_sale_item(&id, &item_id, None)
        .await
        .unwrap();
    assert!(outcome.sale.items[0].is_cancelled);
    assert_eq!(
        outcome.sale.sale.total_amount_cents,
        created.sale.sale.total_amount_cents
    );
    assert!(matches!(&outcome.events[..], [SaleEvent::ItemCancelled { .. }]));

    let err = service
        .cancel_sale_item(&id, "no-such-item", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn test_delete_sale() {
    let service = service();
    let created = service
        .create_sale(create(vec![line("a", 1, 100)]))
        .await
        .unwrap();
    let id = created.sale.sale.id.clone();

    service.delete_sale(&id).await.unwrap();
    assert!(matches!(
        service.delete_sale(&id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.get_sale(&id).await,
        Err(ServiceError::NotFound(_))
    ));
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_sales_pages_and_filters() {
    let service = service();
    for day in 0..5 {
        let mut cmd = create(vec![line("a", 1, 100)]);
        cmd.sale_number = Some(format!("S-{day}"));
        cmd.sale_date = Some(Utc::now() - Duration::days(day));
        if day == 4 {
            cmd.customer_id = "customer-2".to_string();
        }
        service.create_sale(cmd).await.unwrap();
    }

    let first = service.list_sales(ListSales::page(1, 2)).await.unwrap();
    let numbers: Vec<&str> = first.iter().map(|s| s.sale_number.as_str()).collect();
    assert_eq!(numbers, vec!["S-0", "S-1"]);
    assert!(first.iter().all(|s| s.item_count == 1));

    let mut query = ListSales::default();
    query.customer_id = Some("customer-2".to_string());
    let filtered = service.list_sales(query).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].sale_number, "S-4");

    let err = service.list_sales(ListSales::page(0, 500)).await.unwrap_err();
    let ServiceError::Validation(report) = err else {
        panic!("expected validation error");
    };
    assert!(report.has_error_for("page"));
    assert!(report.has_error_for("size"));
}

// =============================================================================
// SQLite
// =============================================================================

#[tokio::test]
async fn test_workflows_on_sqlite() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let service = SalesService::new(db.sales());

    let created = service
        .create_sale(create(vec![line("a", 4, 2_500), line("b", 6, 2_500)]))
        .await
        .unwrap();
    // 10 units in the basket: 20% on every line
    assert_eq!(created.sale.sale.total_amount_cents, 20_000);

    let id = created.sale.sale.id.clone();
    service
        .update_sale(update(&id, vec![line("c", 3, 1_000)]))
        .await
        .unwrap();
    service.cancel_sale(CancelSale::new(&id)).await.unwrap();

    let details = service.get_sale(&id).await.unwrap();
    assert_eq!(details.sale.status, SaleStatus::Cancelled);
    assert_eq!(details.sale.total_amount_cents, 3_000);
    assert_eq!(details.items.len(), 1);

    let listed = service.list_sales(ListSales::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
}
