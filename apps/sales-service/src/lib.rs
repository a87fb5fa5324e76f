//! # Tally Sales Service
//!
//! Sale workflows over any [`SaleStore`](tally_core::SaleStore), plus the
//! configuration and logging bootstrap shared by the binaries.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      tally-sales-service                                │
//! │                                                                         │
//! │  Caller (transport, CLI, tests)                                         │
//! │       │  CreateSale / UpdateSale / CancelSale / ListSales               │
//! │       ▼                                                                 │
//! │  ┌─────────────────────┐     ┌─────────────────────┐                    │
//! │  │  SalesService<S>    │────►│  tally-core         │  Sale aggregate,   │
//! │  │  (service.rs)       │     │                     │  discount, rules   │
//! │  └─────────┬───────────┘     └─────────────────────┘                    │
//! │            │ S: SaleStore                                               │
//! │            ▼                                                            │
//! │  ┌─────────────────────┐                                                │
//! │  │  tally-db           │  SqliteSaleStore / InMemorySaleStore           │
//! │  └─────────────────────┘                                                │
//! │                                                                         │
//! │  AppConfig (config.rs) ──► DbConfig, LogConfig ──► init_tracing         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

pub use commands::{CancelSale, CreateSale, ListSales, UpdateSale};
pub use config::{AppConfig, ConfigError, DatabaseSettings, LogConfig, LogFormat};
pub use error::{ErrorCode, ErrorResponse, ServiceError, ServiceResult};
pub use service::{SaleOutcome, SalesService};
pub use telemetry::init_tracing;
