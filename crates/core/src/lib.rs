//! Core business logic for the profit-sharing plan.
//!
//! This crate contains the year-end settlement engine with ZERO web or storage
//! dependencies. Plan data reaches it only through the collaborator traits in
//! [`settlement::ports`].
//!
//! # Modules
//!
//! - `plan` - Closed code tables shared by the plan's records
//! - `settlement` - Earnings, ledger totals and per-member financials for a plan year
//! - `edit` - Classification of settled members into reviewable transaction records

pub mod edit;
pub mod plan;
pub mod settlement;

#[cfg(test)]
mod testing;
