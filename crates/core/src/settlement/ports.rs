//! Collaborator traits consumed by the settlement engine.
//!
//! These traits are implemented by the store crate. Every query runs against one
//! consistent, read-only point-in-time view of the plan; the engine never asks for
//! a write-capable handle.

use std::collections::HashMap;
use std::future::Future;

use chrono::NaiveDate;
use profitshare_shared::Ssn;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use super::error::SettlementError;
use super::types::{BeneficiaryRow, EmployeeRow, FiscalDates, LedgerLine};

/// Read-only snapshot of employee, beneficiary and ledger data.
pub trait PlanSnapshot: Send + Sync {
    /// Employees with a pay-profit row for the plan year, with balances as of a date.
    fn employees(
        &self,
        profit_year: i16,
        balance_as_of: NaiveDate,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<EmployeeRow>, SettlementError>> + Send;

    /// All beneficiaries, ordered by name and then PSN descending.
    fn beneficiaries(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<BeneficiaryRow>, SettlementError>> + Send;

    /// Ending totals of a plan year for the given SSNs. Absent SSNs had no balance.
    fn prior_year_balances(
        &self,
        profit_year: i16,
        ssns: &[Ssn],
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<HashMap<Ssn, Decimal>, SettlementError>> + Send;

    /// Ledger lines of a plan year for the given SSNs.
    fn ledger_lines(
        &self,
        profit_year: i16,
        ssns: &[Ssn],
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<LedgerLine>, SettlementError>> + Send;
}

/// Fiscal calendar lookups.
pub trait CalendarService: Send + Sync {
    /// First and last day of the fiscal year that settles a plan year.
    fn fiscal_year_boundaries(
        &self,
        profit_year: i16,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<FiscalDates, SettlementError>> + Send;
}

/// Runs a collaborator call, aborting as soon as the token is cancelled.
pub(crate) async fn cancellable<T, F>(cancel: &CancellationToken, call: F) -> Result<T, SettlementError>
where
    F: Future<Output = Result<T, SettlementError>>,
{
    if cancel.is_cancelled() {
        return Err(SettlementError::Cancelled);
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(SettlementError::Cancelled),
        result = call => result,
    }
}
