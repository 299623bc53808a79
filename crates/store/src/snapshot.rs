//! JSON-file plan snapshot.
//!
//! The dataset is read once and never changes afterwards, so every query of a
//! settlement run sees the same point in time.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::NaiveDate;
use profitshare_core::settlement::{
    BeneficiaryRow, CalendarService, EmployeeRow, FiscalDates, LedgerLine, PlanSnapshot,
    SettlementError,
};
use profitshare_shared::{Psn, Ssn};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::dataset::PlanDataset;
use crate::error::StoreError;

/// Read-only plan snapshot backed by a [`PlanDataset`].
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    dataset: PlanDataset,
    calendar: HashMap<i16, FiscalDates>,
}

impl JsonSnapshotStore {
    /// Loads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid dataset.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        let store = Self::from_dataset(PlanDataset::from_json(&text)?)?;
        info!(
            path = %path.display(),
            pay_profits = store.dataset.pay_profits.len(),
            beneficiaries = store.dataset.beneficiaries.len(),
            ledger_lines = store.dataset.ledger.len(),
            "Plan snapshot loaded"
        );
        Ok(store)
    }

    /// Wraps an in-memory dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset's fiscal calendar is inconsistent.
    pub fn from_dataset(dataset: PlanDataset) -> Result<Self, StoreError> {
        let calendar = dataset.calendar()?;
        Ok(Self { dataset, calendar })
    }

    fn fiscal(&self, profit_year: i16) -> Result<FiscalDates, SettlementError> {
        self.calendar
            .get(&profit_year)
            .copied()
            .ok_or(SettlementError::FiscalYearNotFound(profit_year))
    }
}

impl PlanSnapshot for JsonSnapshotStore {
    async fn employees(
        &self,
        profit_year: i16,
        balance_as_of: NaiveDate,
        _cancel: &CancellationToken,
    ) -> Result<Vec<EmployeeRow>, SettlementError> {
        let balances = self.dataset.balances_as_of(balance_as_of);
        let mut employees: Vec<EmployeeRow> = self
            .dataset
            .pay_profits
            .iter()
            .filter(|row| row.profit_year == profit_year)
            .map(|row| {
                let balance = balances.get(&row.ssn).copied().unwrap_or(Decimal::ZERO);
                row.to_employee(balance)
            })
            .collect();
        employees.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.badge_number.cmp(&b.badge_number))
        });

        debug!(profit_year, %balance_as_of, count = employees.len(), "Employees read");
        Ok(employees)
    }

    async fn beneficiaries(
        &self,
        _cancel: &CancellationToken,
    ) -> Result<Vec<BeneficiaryRow>, SettlementError> {
        let mut beneficiaries = self.dataset.beneficiaries.clone();
        beneficiaries.sort_by_key(|b| (b.name.clone(), Reverse(Psn::parse_lenient(&b.psn))));

        debug!(count = beneficiaries.len(), "Beneficiaries read");
        Ok(beneficiaries)
    }

    async fn prior_year_balances(
        &self,
        profit_year: i16,
        ssns: &[Ssn],
        _cancel: &CancellationToken,
    ) -> Result<HashMap<Ssn, Decimal>, SettlementError> {
        let fiscal = self.fiscal(profit_year)?;
        let wanted: HashSet<&Ssn> = ssns.iter().collect();
        let balances: HashMap<Ssn, Decimal> = self
            .dataset
            .balances_as_of(fiscal.fiscal_end_date)
            .into_iter()
            .filter(|(ssn, _)| wanted.contains(ssn))
            .collect();

        debug!(
            profit_year,
            requested = ssns.len(),
            found = balances.len(),
            "Prior year balances read"
        );
        Ok(balances)
    }

    async fn ledger_lines(
        &self,
        profit_year: i16,
        ssns: &[Ssn],
        _cancel: &CancellationToken,
    ) -> Result<Vec<LedgerLine>, SettlementError> {
        let wanted: HashSet<&Ssn> = ssns.iter().collect();
        let lines: Vec<LedgerLine> = self
            .dataset
            .ledger
            .iter()
            .filter(|line| line.profit_year == profit_year && wanted.contains(&line.ssn))
            .cloned()
            .collect();

        debug!(profit_year, count = lines.len(), "Ledger lines read");
        Ok(lines)
    }
}

impl CalendarService for JsonSnapshotStore {
    async fn fiscal_year_boundaries(
        &self,
        profit_year: i16,
        _cancel: &CancellationToken,
    ) -> Result<FiscalDates, SettlementError> {
        self.fiscal(profit_year)
    }
}
