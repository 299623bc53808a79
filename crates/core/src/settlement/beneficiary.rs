//! Beneficiary side of a settlement run.

use std::collections::{HashMap, HashSet};

use profitshare_shared::{Psn, Ssn};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::earnings::EarningsCalculator;
use super::error::SettlementError;
use super::ledger::LedgerAggregator;
use super::ports::{PlanSnapshot, cancellable};
use super::types::{
    BeneficiaryFinancials, BeneficiaryRow, MemberFinancials, MemberRoles, ProfitDetailTotals,
    ProfitShareUpdateRequest,
};
use crate::plan::EmployeeType;

/// An employee who is also named as a beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualMembership {
    /// SSN shared by both records.
    pub ssn: Ssn,
    /// Whether the employee is economically a beneficiary.
    pub treat_as_beneficiary: bool,
}

/// Output of the beneficiary phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeneficiaryPhase {
    /// New beneficiary-only members, in snapshot order.
    pub beneficiaries: Vec<MemberFinancials>,
    /// Employees found among the beneficiaries.
    pub dual_members: Vec<DualMembership>,
}

/// Builds the beneficiary portion of the member list.
pub struct BeneficiaryFinancialsBuilder;

impl BeneficiaryFinancialsBuilder {
    /// Loads all beneficiaries and settles those that are not already employees.
    pub async fn build<S: PlanSnapshot>(
        snapshot: &S,
        employees: &[MemberFinancials],
        request: &ProfitShareUpdateRequest,
        cancel: &CancellationToken,
    ) -> Result<BeneficiaryPhase, SettlementError> {
        let rows = cancellable(cancel, snapshot.beneficiaries(cancel)).await?;

        let mut seen = HashSet::new();
        let ssns: Vec<Ssn> = rows
            .iter()
            .map(|row| row.ssn)
            .filter(|ssn| seen.insert(*ssn))
            .collect();

        let balances = cancellable(
            cancel,
            snapshot.prior_year_balances(request.prior_year(), &ssns, cancel),
        )
        .await?;
        let ledger =
            LedgerAggregator::ledger_totals(snapshot, request.profit_year, &ssns, cancel).await?;

        let phase = Self::from_rows(&rows, &balances, &ledger, employees, request)?;
        info!(
            profit_year = request.profit_year,
            rows = rows.len(),
            beneficiaries = phase.beneficiaries.len(),
            dual_members = phase.dual_members.len(),
            "Beneficiary phase complete"
        );
        Ok(phase)
    }

    /// Settles already-loaded beneficiary rows against the employee list.
    ///
    /// # Errors
    ///
    /// Returns an error if a rate or balance overflows the earnings arithmetic.
    pub fn from_rows(
        rows: &[BeneficiaryRow],
        balances: &HashMap<Ssn, Decimal>,
        ledger: &HashMap<Ssn, ProfitDetailTotals>,
        employees: &[MemberFinancials],
        request: &ProfitShareUpdateRequest,
    ) -> Result<BeneficiaryPhase, SettlementError> {
        let employees_by_ssn: HashMap<Ssn, &MemberFinancials> =
            employees.iter().map(|member| (member.ssn, member)).collect();
        let mut seen = HashSet::new();
        let mut phase = BeneficiaryPhase::default();

        for row in rows {
            let first_seen = seen.insert(row.ssn);

            if let Some(employee) = employees_by_ssn.get(&row.ssn) {
                if first_seen {
                    let treat_as_beneficiary = Self::is_economically_beneficiary(employee);
                    debug!(
                        badge = %employee.badge_number,
                        treat_as_beneficiary,
                        "Beneficiary is already settled as an employee"
                    );
                    phase.dual_members.push(DualMembership {
                        ssn: row.ssn,
                        treat_as_beneficiary,
                    });
                }
                continue;
            }

            if !first_seen {
                debug!(psn = %row.psn, "Beneficiary already settled under another PSN");
                continue;
            }

            let totals = LedgerAggregator::totals_for(ledger, row.ssn);
            let beginning_balance = balances.get(&row.ssn).copied().unwrap_or_default();
            let financials = Self::financials(row, beginning_balance, &totals, request)?;
            let member = Self::into_member(financials, &totals)?;

            if member.is_all_zeros() {
                debug!(psn = %member.psn, "Beneficiary has nothing to post, discarded");
                continue;
            }
            phase.beneficiaries.push(member);
        }

        Ok(phase)
    }

    /// An employee record that should settle like a beneficiary: fully vested money
    /// only, an existing hire, and no balance of its own.
    #[must_use]
    pub fn is_economically_beneficiary(employee: &MemberFinancials) -> bool {
        employee.etva > Decimal::ZERO
            && employee.employee_type == EmployeeType::NotNewLastYear
            && employee.current_amount.is_zero()
    }

    /// Computes a beneficiary's earning balance and earnings.
    ///
    /// # Errors
    ///
    /// Returns an error if an earnings rate overflows on the balance.
    pub fn financials(
        row: &BeneficiaryRow,
        beginning_balance: Decimal,
        totals: &ProfitDetailTotals,
        request: &ProfitShareUpdateRequest,
    ) -> Result<BeneficiaryFinancials, SettlementError> {
        let earned = EarningsCalculator::compute(
            EarningsCalculator::new_current_amount(beginning_balance, totals),
            request.earnings_percent,
            request.secondary_earnings_percent,
        )?;

        Ok(BeneficiaryFinancials {
            psn: Psn::parse_lenient(&row.psn),
            badge_number: row.badge_number,
            ssn: row.ssn,
            name: row.name.clone(),
            beginning_balance,
            current_amount: earned.new_current_amount,
            earnings: earned.earnings_amount,
            secondary_earnings: earned.secondary_earnings_amount,
        })
    }

    fn into_member(
        bene: BeneficiaryFinancials,
        totals: &ProfitDetailTotals,
    ) -> Result<MemberFinancials, SettlementError> {
        let (_, earn_points) = EarningsCalculator::earn_points(bene.current_amount)?;
        Ok(MemberFinancials {
            roles: MemberRoles::Beneficiary,
            badge_number: bene.badge_number,
            psn: bene.psn,
            ssn: bene.ssn,
            name: bene.name,
            current_amount: bene.beginning_balance,
            distributions: totals.distributions_total,
            allocations: totals.allocations_total,
            paid_allocations: totals.paid_allocations_total,
            forfeits: totals.forfeits_total,
            class_action_fund: totals.class_action_fund_total.max(Decimal::ZERO),
            earn_points,
            all_earnings: bene.earnings,
            all_secondary_earnings: bene.secondary_earnings,
            ..MemberFinancials::default()
        }
        .with_ending_balance())
    }
}
