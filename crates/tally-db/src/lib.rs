//! # tally-db: Database Layer for Tally
//!
//! Implementations of the [`SaleStore`](tally_core::SaleStore) port: SQLite
//! through sqlx for real use, and an in-memory map for tests and tooling.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Data Flow                                │
//! │                                                                         │
//! │  SalesService::create_sale(...)                                        │
//! │       │  store.save(&sale)                                              │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ SqliteSaleStore│    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│                │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────────────────────┐                              │   │
//! │  │   │ InMemorySaleStore (memory.rs)│  same contract, no SQLite    │   │
//! │  │   └──────────────────────────────┘                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   sales (1) ──< sale_items (n)   ON DELETE CASCADE              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQLite SaleStore
//! - [`memory`] - In-memory SaleStore
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::SaleStore;
//! use tally_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./tally.db")).await?;
//! let sale = db.sales().load_by_number("S-0001").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use memory::InMemorySaleStore;
pub use pool::{Database, DbConfig};
pub use repository::sale::SqliteSaleStore;
