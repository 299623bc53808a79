//! Reviewable transaction records for a settlement.
//!
//! This module turns the settled member list into the records the year-end update
//! would post:
//! - Transaction classification by zero-contribution reason and ETVA earnings
//! - The edit report with its grand totals

pub mod classifier;
pub mod service;
pub mod types;

#[cfg(test)]
mod classifier_props;

pub use classifier::TransactionClassifier;
pub use service::{EDIT_REPORT_NAME, ProfitShareEditService, edit_view};
pub use types::{ProfitShareEditResponse, TransactionRecord};
