//! Year-end settlement of the plan.
//!
//! A settlement derives, for every plan member, the contributions, earnings and
//! forfeitures a plan year adds to the member's balance:
//! - Earn-point and earnings arithmetic
//! - Per-member sums of the year's ledger lines
//! - The employee phase, then the beneficiary phase against its result
//! - The orchestrating service and the update report
//!
//! Nothing here writes; posting the results is the caller's decision.

pub mod beneficiary;
pub mod earnings;
pub mod employee;
pub mod error;
pub mod ledger;
pub mod ports;
pub mod service;
pub mod types;


pub use beneficiary::{BeneficiaryFinancialsBuilder, BeneficiaryPhase, DualMembership};
pub use earnings::EarningsCalculator;
pub use employee::{CAF_VESTING_YEARS, EmployeeFinancialsBuilder, EmployeePhase};
pub use error::SettlementError;
pub use ledger::LedgerAggregator;
pub use ports::{CalendarService, PlanSnapshot};
pub use service::{SettlementService, UPDATE_REPORT_NAME, merge_phases, update_totals, update_view};
pub use types::*;
