//! # Seed Data Generator
//!
//! Populates the database with demo sales for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 sales (default) into the configured database
//! cargo run -p tally-sales-service --bin seed
//!
//! # Generate custom amount
//! cargo run -p tally-sales-service --bin seed -- --count 500
//!
//! # Specify database path or config file
//! cargo run -p tally-sales-service --bin seed -- --db ./data/tally.db
//! cargo run -p tally-sales-service --bin seed -- --config ./tally.toml
//! ```
//!
//! ## Generated Sales
//! Each sale goes through `SalesService::create_sale`, so it is validated and
//! priced exactly like a real one:
//! - 1 to 4 lines picked from a small catalog
//! - 1 to 6 units per line, spread over the last 30 days
//! - Customers and branches from fixed lists

use chrono::{Duration, Utc};
use std::env;
use std::path::PathBuf;
use tally_core::{Money, NewSaleItem};
use tally_db::Database;
use tally_sales_service::{init_tracing, AppConfig, CreateSale, SalesService};
use uuid::Uuid;

/// Catalog of (product name, unit price in cents)
const PRODUCTS: &[(&str, i64)] = &[
    ("Espresso Beans 1kg", 2_499),
    ("Ceramic Mug", 1_299),
    ("Pour-Over Kettle", 4_950),
    ("Paper Filters x100", 599),
    ("Hand Grinder", 6_900),
    ("Oat Milk 1L", 349),
    ("Travel Tumbler", 2_199),
    ("Milk Frother", 3_450),
];

const CUSTOMERS: &[&str] = &[
    "Ada Lovelace",
    "Grace Hopper",
    "Alan Turing",
    "Katherine Johnson",
    "Edsger Dijkstra",
];

const BRANCHES: &[&str] = &["Downtown", "Harbourside", "Airport"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>      Number of sales to generate (default: 50)");
                println!("  -d, --db <PATH>      Database file path (overrides config)");
                println!("      --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = AppConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.database.path = path;
    }
    init_tracing(&config.log);

    println!("Tally Seed Data Generator");
    println!("=========================");
    println!("Database: {}", config.database.path.display());
    println!("Sales:    {}", count);
    println!();

    let db = Database::new(config.database.db_config()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let service = SalesService::new(db.sales());
    let start = std::time::Instant::now();
    let mut revenue = Money::zero();

    for n in 0..count {
        let outcome = service.create_sale(demo_sale(n)).await?;
        let sale = &outcome.sale.sale;
        revenue += sale.total_amount();

        if (n + 1) % 10 == 0 || n + 1 == count {
            println!(
                "  {:>5} sales  last: {} {:>10}",
                n + 1,
                sale.sale_number,
                sale.total_amount().to_string()
            );
        }
    }

    println!();
    println!(
        "✓ Created {} sales worth {} in {:.2?}",
        count,
        revenue,
        start.elapsed()
    );

    db.close().await;
    Ok(())
}

/// Builds the `n`th demo sale. Deterministic apart from ids.
fn demo_sale(n: usize) -> CreateSale {
    let lines = 1 + n % 4;
    let items = (0..lines)
        .map(|line| {
            let (name, price) = PRODUCTS[(n + line * 3) % PRODUCTS.len()];
            NewSaleItem {
                product_id: Uuid::new_v4().to_string(),
                product_name: name.to_string(),
                quantity: 1 + ((n + line) % 6) as i64,
                unit_price: Money::from_cents(price),
            }
        })
        .collect();

    let customer = n % CUSTOMERS.len();
    let branch = n % BRANCHES.len();

    CreateSale {
        sale_number: None,
        sale_date: Some(Utc::now() - Duration::days((n % 30) as i64)),
        customer_id: format!("customer-{}", customer + 1),
        customer_name: CUSTOMERS[customer].to_string(),
        branch_id: format!("branch-{}", branch + 1),
        branch_name: BRANCHES[branch].to_string(),
        items,
    }
}
