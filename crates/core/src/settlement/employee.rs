//! Employee side of a settlement run.

use std::collections::HashMap;

use profitshare_shared::{Psn, Ssn};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::earnings::EarningsCalculator;
use super::error::SettlementError;
use super::ledger::LedgerAggregator;
use super::ports::{CalendarService, PlanSnapshot, cancellable};
use super::types::{
    AdjustmentsSummary, EmployeeRow, MemberFinancials, MemberRoles, MemberTotals,
    ProfitDetailTotals, ProfitShareUpdateRequest,
};
use crate::plan::{EmployeeType, Enrollment, ZeroContributionReason};

/// Members with fewer years in the plan do not earn on class action fund money held
/// in their ETVA.
pub const CAF_VESTING_YEARS: i16 = 6;

/// Output of the employee phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePhase {
    /// Settled employees, in snapshot order.
    pub members: Vec<MemberFinancials>,
    /// Whether any employee went over the statutory maximum.
    pub has_exceeded_maximum_contributions: bool,
    /// Adjustments applied to the requested badges.
    pub adjustments: AdjustmentsSummary,
}

/// Builds the employee portion of the member list.
pub struct EmployeeFinancialsBuilder;

impl EmployeeFinancialsBuilder {
    /// Loads the plan year's employees and settles every participating one.
    ///
    /// Balances are taken as of the end of the prior fiscal year.
    pub async fn build<S, C>(
        snapshot: &S,
        calendar: &C,
        request: &ProfitShareUpdateRequest,
        cancel: &CancellationToken,
    ) -> Result<EmployeePhase, SettlementError>
    where
        S: PlanSnapshot,
        C: CalendarService,
    {
        let fiscal = cancellable(
            cancel,
            calendar.fiscal_year_boundaries(request.prior_year(), cancel),
        )
        .await?;

        let rows = cancellable(
            cancel,
            snapshot.employees(request.profit_year, fiscal.fiscal_end_date, cancel),
        )
        .await?;

        let ssns: Vec<Ssn> = rows.iter().map(|row| row.ssn).collect();
        let ledger =
            LedgerAggregator::ledger_totals(snapshot, request.profit_year, &ssns, cancel).await?;

        let phase = Self::from_rows(&rows, &ledger, request)?;
        info!(
            profit_year = request.profit_year,
            rows = rows.len(),
            employees = phase.members.len(),
            exceeded_max = phase.has_exceeded_maximum_contributions,
            "Employee phase complete"
        );
        Ok(phase)
    }

    /// Settles already-loaded employee rows.
    ///
    /// # Errors
    ///
    /// Returns an error if a rate or balance overflows the earnings arithmetic.
    pub fn from_rows(
        rows: &[EmployeeRow],
        ledger: &HashMap<Ssn, ProfitDetailTotals>,
        request: &ProfitShareUpdateRequest,
    ) -> Result<EmployeePhase, SettlementError> {
        let mut phase = EmployeePhase {
            adjustments: AdjustmentsSummary {
                badge_adjusted: request.badge_to_adjust,
                badge_adjusted2: request.badge_to_adjust2,
                ..AdjustmentsSummary::default()
            },
            ..EmployeePhase::default()
        };

        for row in rows {
            let totals = LedgerAggregator::totals_for(ledger, row.ssn);
            if !Self::participates(row, &totals) {
                debug!(badge = %row.badge_number, "Employee not participating, skipped");
                continue;
            }

            let (member, exceeded) =
                Self::settle_employee(row, &totals, request, &mut phase.adjustments)?;
            phase.has_exceeded_maximum_contributions |= exceeded;
            phase.members.push(member);
        }

        Ok(phase)
    }

    /// Whether an employee row takes part in the settlement.
    #[must_use]
    pub fn participates(row: &EmployeeRow, totals: &ProfitDetailTotals) -> bool {
        row.enrollment != Enrollment::NotEnrolled
            || row.years_in_plan != 0
            || row.employee_type == EmployeeType::NewLastYear
            || totals.has_amounts()
            || row.zero_contribution_reason != ZeroContributionReason::Normal
            || !row.current_balance.is_zero()
    }

    /// ETVA that earns this year.
    ///
    /// Class action fund money was added to the ETVA of members below
    /// [`CAF_VESTING_YEARS`] and does not earn.
    #[must_use]
    pub fn working_etva(etva: Decimal, years_in_plan: i16, class_action_fund: Decimal) -> Decimal {
        if etva <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        if years_in_plan < CAF_VESTING_YEARS {
            etva - class_action_fund
        } else {
            etva
        }
    }

    fn settle_employee(
        row: &EmployeeRow,
        totals: &ProfitDetailTotals,
        request: &ProfitShareUpdateRequest,
        adjustments: &mut AdjustmentsSummary,
    ) -> Result<(MemberFinancials, bool), SettlementError> {
        let adjust_primary = request.adjusts_primary(row.badge_number);

        let mut contribution =
            EarningsCalculator::amount_for_points(request.contribution_percent, row.points_earned)?;
        let mut forfeiture =
            EarningsCalculator::amount_for_points(request.incoming_forfeit_percent, row.points_earned)?;
        if adjust_primary {
            adjustments.contribution_amount_unadjusted = contribution;
            contribution += request.adjust_contribution_amount;
            adjustments.contribution_amount_adjusted = contribution;

            adjustments.incoming_forfeiture_amount_unadjusted = forfeiture;
            forfeiture += request.adjust_incoming_forfeit_amount;
            adjustments.incoming_forfeiture_amount_adjusted = forfeiture;
        }

        let new_current_amount = EarningsCalculator::new_current_amount(row.current_balance, totals);
        let mut earned = EarningsCalculator::compute(
            new_current_amount,
            request.earnings_percent,
            request.secondary_earnings_percent,
        )?;
        if adjust_primary {
            adjustments.earnings_amount_unadjusted = earned.earnings_amount;
            earned.earnings_amount += request.adjust_earnings_amount;
            adjustments.earnings_amount_adjusted = earned.earnings_amount;
        }
        if request.adjusts_secondary(row.badge_number) {
            adjustments.secondary_earnings_amount_unadjusted = earned.secondary_earnings_amount;
            earned.secondary_earnings_amount += request.adjust_earnings_secondary_amount;
            adjustments.secondary_earnings_amount_adjusted = earned.secondary_earnings_amount;
        }

        let (etva_earnings, secondary_etva_earnings) = Self::etva_split(row, totals, &earned)?;

        let mut member = MemberFinancials {
            roles: MemberRoles::Employee,
            badge_number: row.badge_number,
            psn: Psn::from(row.badge_number),
            ssn: row.ssn,
            name: row.name.clone(),
            current_amount: row.current_balance,
            distributions: totals.distributions_total,
            military: totals.military_total,
            allocations: totals.allocations_total,
            paid_allocations: totals.paid_allocations_total,
            forfeits: totals.forfeits_total,
            class_action_fund: totals.class_action_fund_total,
            employee_type: row.employee_type,
            zero_contribution_reason: row.zero_contribution_reason,
            contribution_points: row.points_earned,
            earn_points: earned.earn_points,
            contributions: contribution,
            incoming_forfeitures: forfeiture,
            all_earnings: earned.earnings_amount,
            etva: row.etva,
            etva_earnings,
            all_secondary_earnings: earned.secondary_earnings_amount,
            secondary_etva_earnings,
            ..MemberFinancials::default()
        };

        let exceeded = Self::apply_max_contribution(
            &mut member,
            request.max_allowed_contributions,
            totals.military_total,
            forfeiture,
        );

        Ok((member.with_ending_balance(), exceeded))
    }

    /// Portions of both earnings amounts earned on the ETVA.
    ///
    /// With no earning balance there is nothing to split: the ETVA portions are zero
    /// and the earnings, including any badge adjustment, stay on the normal record.
    fn etva_split(
        row: &EmployeeRow,
        totals: &ProfitDetailTotals,
        earned: &MemberTotals,
    ) -> Result<(Decimal, Decimal), SettlementError> {
        let working = Self::working_etva(row.etva, row.years_in_plan, totals.class_action_fund_total);
        match EarningsCalculator::etva_ratio(working, earned.points_dollars)? {
            Some(ratio) => Ok((
                EarningsCalculator::etva_portion(earned.earnings_amount, ratio)?,
                EarningsCalculator::etva_portion(earned.secondary_earnings_amount, ratio)?,
            )),
            None => Ok((Decimal::ZERO, Decimal::ZERO)),
        }
    }

    /// Caps contributions, military and forfeitures at the statutory maximum.
    ///
    /// Only the incoming forfeiture is reduced. Returns true if the member was over.
    fn apply_max_contribution(
        member: &mut MemberFinancials,
        max_allowed: Decimal,
        military: Decimal,
        forfeiture: Decimal,
    ) -> bool {
        let total = member.contributions + military + member.incoming_forfeitures;
        if total <= max_allowed {
            return false;
        }

        let over = total - max_allowed;
        if over < forfeiture {
            member.incoming_forfeitures -= over;
        } else {
            warn!(
                badge = %member.badge_number,
                over = %over,
                forfeiture = %forfeiture,
                "Forfeitures not enough for amount over maximum contribution"
            );
            member.incoming_forfeitures = Decimal::ZERO;
        }

        member.max_over = over;
        member.max_points = member.contribution_points;
        true
    }
}
