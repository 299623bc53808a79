//! Serialized plan dataset.
//!
//! A dataset is the whole plan as of one point in time: the fiscal calendar, the
//! pay-profit rows of each plan year, dated member balances, beneficiaries and the
//! posted ledger.

use std::collections::HashMap;

use chrono::NaiveDate;
use profitshare_core::plan::{EmployeeType, Enrollment, ZeroContributionReason};
use profitshare_core::settlement::{BeneficiaryRow, EmployeeRow, FiscalDates, LedgerLine};
use profitshare_shared::{BadgeNumber, Ssn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Fiscal calendar entry of one plan year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYearRow {
    /// Plan year the fiscal year settles.
    pub profit_year: i16,
    /// First day of the fiscal year.
    pub fiscal_begin_date: NaiveDate,
    /// Last day of the fiscal year.
    pub fiscal_end_date: NaiveDate,
}

/// An employee's pay-profit row for one plan year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayProfitRow {
    /// Plan year of the row.
    pub profit_year: i16,
    /// Badge number.
    pub badge_number: BadgeNumber,
    /// SSN.
    pub ssn: Ssn,
    /// Full name.
    pub name: String,
    /// Enrollment status.
    #[serde(default)]
    pub enrollment: Enrollment,
    /// New-hire status.
    #[serde(default)]
    pub employee_type: EmployeeType,
    /// Contribution points earned during the year.
    #[serde(default)]
    pub points_earned: i32,
    /// Zero-contribution classification.
    #[serde(default)]
    pub zero_contribution_reason: ZeroContributionReason,
    /// 100%-vested balance component.
    #[serde(default)]
    pub etva: Decimal,
    /// Years of plan participation.
    #[serde(default)]
    pub years_in_plan: i16,
}

impl PayProfitRow {
    /// Joins the row with the member's balance.
    #[must_use]
    pub fn to_employee(&self, current_balance: Decimal) -> EmployeeRow {
        EmployeeRow {
            badge_number: self.badge_number,
            ssn: self.ssn,
            name: self.name.clone(),
            enrollment: self.enrollment,
            employee_type: self.employee_type,
            points_earned: self.points_earned,
            zero_contribution_reason: self.zero_contribution_reason,
            etva: self.etva,
            years_in_plan: self.years_in_plan,
            current_balance,
        }
    }
}

/// A member's total balance as of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRow {
    /// Member SSN.
    pub ssn: Ssn,
    /// Date the balance was struck.
    pub as_of: NaiveDate,
    /// Total balance.
    pub balance: Decimal,
}

/// The whole plan as stored in a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDataset {
    /// Fiscal calendar.
    #[serde(default)]
    pub fiscal_years: Vec<FiscalYearRow>,
    /// Pay-profit rows of every plan year.
    #[serde(default)]
    pub pay_profits: Vec<PayProfitRow>,
    /// Dated member balances.
    #[serde(default)]
    pub balances: Vec<BalanceRow>,
    /// Beneficiaries in stored order.
    #[serde(default)]
    pub beneficiaries: Vec<BeneficiaryRow>,
    /// Posted ledger lines.
    #[serde(default)]
    pub ledger: Vec<LedgerLine>,
}

impl PlanDataset {
    /// Parses a dataset from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid dataset.
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Indexes the fiscal calendar by plan year.
    ///
    /// # Errors
    ///
    /// Returns an error if a plan year appears twice or an entry is inverted.
    pub fn calendar(&self) -> Result<HashMap<i16, FiscalDates>, StoreError> {
        let mut calendar = HashMap::with_capacity(self.fiscal_years.len());
        for row in &self.fiscal_years {
            if row.fiscal_end_date < row.fiscal_begin_date {
                return Err(StoreError::InvertedFiscalYear(row.profit_year));
            }
            let dates = FiscalDates {
                fiscal_begin_date: row.fiscal_begin_date,
                fiscal_end_date: row.fiscal_end_date,
            };
            if calendar.insert(row.profit_year, dates).is_some() {
                return Err(StoreError::DuplicateFiscalYear(row.profit_year));
            }
        }
        Ok(calendar)
    }

    /// Latest balance of each member struck on or before `as_of`.
    #[must_use]
    pub fn balances_as_of(&self, as_of: NaiveDate) -> HashMap<Ssn, Decimal> {
        let mut latest: HashMap<Ssn, (NaiveDate, Decimal)> = HashMap::new();
        for row in self.balances.iter().filter(|row| row.as_of <= as_of) {
            latest
                .entry(row.ssn)
                .and_modify(|current| {
                    if row.as_of >= current.0 {
                        *current = (row.as_of, row.balance);
                    }
                })
                .or_insert((row.as_of, row.balance));
        }
        latest
            .into_iter()
            .map(|(ssn, (_, balance))| (ssn, balance))
            .collect()
    }
}
