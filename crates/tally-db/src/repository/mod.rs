//! # Repository Module
//!
//! SQLite-backed stores for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SalesService                                                          │
//! │       │  store.load(id) / store.save(&sale) / store.list_page(..)      │
//! │       ▼                                                                 │
//! │  SaleStore (trait, tally-core)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteSaleStore (this module)                                         │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`sale::SqliteSaleStore`] - Sale aggregate persistence

pub mod sale;
