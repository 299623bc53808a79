//! Plan snapshot store.
//!
//! This crate provides:
//! - The serialized plan dataset
//! - A read-only JSON snapshot implementing the settlement collaborator traits

pub mod dataset;
pub mod error;
pub mod snapshot;

pub use dataset::{BalanceRow, FiscalYearRow, PayProfitRow, PlanDataset};
pub use error::StoreError;
pub use snapshot::JsonSnapshotStore;
