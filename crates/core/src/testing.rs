//! Fixtures shared by the unit tests.

use std::collections::HashMap;

use chrono::NaiveDate;
use profitshare_shared::{BadgeNumber, Psn, Ssn};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use crate::plan::{Enrollment, ProfitCode};
use crate::settlement::error::SettlementError;
use crate::settlement::ports::{CalendarService, PlanSnapshot};
use crate::settlement::types::{
    BeneficiaryRow, EmployeeRow, FiscalDates, LedgerLine, MemberFinancials, MemberRoles,
};

/// SSN given to the employee with `badge`.
pub(crate) fn ssn_for_badge(badge: i32) -> Ssn {
    Ssn(100_000_000 + badge)
}

/// An enrolled employee with a beginning balance.
pub(crate) fn employee_row(badge: i32, balance: Decimal) -> EmployeeRow {
    EmployeeRow {
        badge_number: BadgeNumber(badge),
        ssn: ssn_for_badge(badge),
        name: format!("EMPLOYEE, {badge}"),
        enrollment: Enrollment::OldPlanHasContributions,
        employee_type: Default::default(),
        points_earned: 0,
        zero_contribution_reason: Default::default(),
        etva: Decimal::ZERO,
        years_in_plan: 3,
        current_balance: balance,
    }
}

/// A settled employee with no amounts.
pub(crate) fn employee_member(badge: i32, ssn: i32) -> MemberFinancials {
    MemberFinancials {
        roles: MemberRoles::Employee,
        badge_number: BadgeNumber(badge),
        psn: Psn::from(BadgeNumber(badge)),
        ssn: Ssn(ssn),
        name: format!("EMPLOYEE, {badge}"),
        ..MemberFinancials::default()
    }
}

/// A beneficiary row; the badge is taken from the PSN's leading digits.
pub(crate) fn beneficiary_row(psn: &str, ssn: i32, name: &str) -> BeneficiaryRow {
    BeneficiaryRow {
        psn: psn.to_string(),
        badge_number: BadgeNumber(psn.get(..6).and_then(|b| b.parse().ok()).unwrap_or_default()),
        ssn: Ssn(ssn),
        name: name.to_string(),
    }
}

/// An ordinary ledger line.
pub(crate) fn ledger_line(ssn: Ssn, profit_year: i16, code: ProfitCode) -> LedgerLine {
    LedgerLine {
        ssn,
        profit_year,
        year_iteration: 0,
        code,
        contribution: Decimal::ZERO,
        earnings: Decimal::ZERO,
        forfeiture: Decimal::ZERO,
        remark: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// In-memory plan implementing both collaborator traits.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakePlan {
    pub employees: Vec<EmployeeRow>,
    pub beneficiaries: Vec<BeneficiaryRow>,
    pub prior_balances: HashMap<Ssn, Decimal>,
    pub ledger: Vec<LedgerLine>,
    pub fiscal: HashMap<i16, FiscalDates>,
    /// Never answer, so only cancellation can end a call.
    pub stall: bool,
}

impl FakePlan {
    /// A plan with fiscal calendars for 2023 and 2024.
    pub(crate) fn new() -> Self {
        let fiscal = HashMap::from([
            (
                2023,
                FiscalDates {
                    fiscal_begin_date: date(2023, 1, 1),
                    fiscal_end_date: date(2023, 12, 30),
                },
            ),
            (
                2024,
                FiscalDates {
                    fiscal_begin_date: date(2023, 12, 31),
                    fiscal_end_date: date(2024, 12, 28),
                },
            ),
        ]);
        Self {
            fiscal,
            ..Self::default()
        }
    }

    async fn answer<T>(&self, value: T) -> Result<T, SettlementError> {
        if self.stall {
            std::future::pending::<()>().await;
        }
        Ok(value)
    }
}

impl PlanSnapshot for FakePlan {
    async fn employees(
        &self,
        _profit_year: i16,
        _balance_as_of: NaiveDate,
        _cancel: &CancellationToken,
    ) -> Result<Vec<EmployeeRow>, SettlementError> {
        self.answer(self.employees.clone()).await
    }

    async fn beneficiaries(
        &self,
        _cancel: &CancellationToken,
    ) -> Result<Vec<BeneficiaryRow>, SettlementError> {
        self.answer(self.beneficiaries.clone()).await
    }

    async fn prior_year_balances(
        &self,
        _profit_year: i16,
        ssns: &[Ssn],
        _cancel: &CancellationToken,
    ) -> Result<HashMap<Ssn, Decimal>, SettlementError> {
        let balances = ssns
            .iter()
            .filter_map(|ssn| self.prior_balances.get(ssn).map(|b| (*ssn, *b)))
            .collect();
        self.answer(balances).await
    }

    async fn ledger_lines(
        &self,
        profit_year: i16,
        ssns: &[Ssn],
        _cancel: &CancellationToken,
    ) -> Result<Vec<LedgerLine>, SettlementError> {
        let lines = self
            .ledger
            .iter()
            .filter(|line| line.profit_year == profit_year && ssns.contains(&line.ssn))
            .cloned()
            .collect();
        self.answer(lines).await
    }
}

impl CalendarService for FakePlan {
    async fn fiscal_year_boundaries(
        &self,
        profit_year: i16,
        _cancel: &CancellationToken,
    ) -> Result<FiscalDates, SettlementError> {
        let dates = self
            .fiscal
            .get(&profit_year)
            .copied()
            .ok_or(SettlementError::FiscalYearNotFound(profit_year))?;
        self.answer(dates).await
    }
}
