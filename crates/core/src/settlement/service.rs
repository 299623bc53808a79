//! Settlement orchestration.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use profitshare_shared::Ssn;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::beneficiary::{BeneficiaryFinancialsBuilder, BeneficiaryPhase};
use super::employee::{EmployeeFinancialsBuilder, EmployeePhase};
use super::error::SettlementError;
use super::ports::{CalendarService, PlanSnapshot};
use super::types::{
    MemberFinancials, MemberRoles, ProfitShareUpdateRequest, ProfitShareUpdateResponse,
    SettlementOutcome, UpdateTotals,
};

/// Report name of the update view.
pub const UPDATE_REPORT_NAME: &str = "Profit Sharing Update";

/// Runs settlements against a plan snapshot.
///
/// The service holds no mutable state, so independent runs may share it.
pub struct SettlementService<S: PlanSnapshot, C: CalendarService> {
    snapshot: Arc<S>,
    calendar: Arc<C>,
}

impl<S: PlanSnapshot, C: CalendarService> SettlementService<S, C> {
    /// Create a new settlement service.
    #[must_use]
    pub fn new(snapshot: Arc<S>, calendar: Arc<C>) -> Self {
        Self { snapshot, calendar }
    }

    /// The calendar the service reads fiscal boundaries from.
    #[must_use]
    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Settles every employee and then every beneficiary for the request's plan year.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request is invalid
    /// - The prior fiscal year has no calendar
    /// - The snapshot cannot be read
    /// - `cancel` fires before the run completes
    pub async fn settle(
        &self,
        request: &ProfitShareUpdateRequest,
        cancel: &CancellationToken,
    ) -> Result<SettlementOutcome, SettlementError> {
        request.validate()?;
        info!(
            profit_year = request.profit_year,
            earnings_percent = %request.earnings_percent,
            secondary_earnings_percent = %request.secondary_earnings_percent,
            "Starting settlement"
        );

        let employees =
            EmployeeFinancialsBuilder::build(&*self.snapshot, &*self.calendar, request, cancel)
                .await?;
        let beneficiaries =
            BeneficiaryFinancialsBuilder::build(&*self.snapshot, &employees.members, request, cancel)
                .await?;

        let outcome = merge_phases(employees, beneficiaries);
        info!(
            profit_year = request.profit_year,
            members = outcome.members.len(),
            exceeded_max = outcome.has_exceeded_maximum_contributions,
            "Settlement complete"
        );
        Ok(outcome)
    }

    /// Settles the plan year and summarizes it as the update report.
    pub async fn update_report(
        &self,
        request: &ProfitShareUpdateRequest,
        cancel: &CancellationToken,
    ) -> Result<ProfitShareUpdateResponse, SettlementError> {
        let outcome = self.settle(request, cancel).await?;
        Ok(update_view(outcome, Utc::now()))
    }
}

/// Combines both phases into one member list, employees first.
///
/// Employees found among the beneficiaries take the dual role; beneficiaries never
/// get a second entry.
#[must_use]
pub fn merge_phases(employees: EmployeePhase, beneficiaries: BeneficiaryPhase) -> SettlementOutcome {
    let dual: HashMap<Ssn, bool> = beneficiaries
        .dual_members
        .iter()
        .map(|dual| (dual.ssn, dual.treat_as_beneficiary))
        .collect();

    let mut members: Vec<MemberFinancials> = employees
        .members
        .into_iter()
        .map(|mut member| {
            if let Some(&treat_as_beneficiary) = dual.get(&member.ssn) {
                member.roles = MemberRoles::EmployeeAndBeneficiary;
                member.treat_as_beneficiary = treat_as_beneficiary;
            }
            member
        })
        .collect();
    members.extend(beneficiaries.beneficiaries);

    SettlementOutcome {
        members,
        has_exceeded_maximum_contributions: employees.has_exceeded_maximum_contributions,
        adjustments: employees.adjustments,
    }
}

/// Builds the update report from a settlement outcome.
#[must_use]
pub fn update_view(outcome: SettlementOutcome, report_date: DateTime<Utc>) -> ProfitShareUpdateResponse {
    ProfitShareUpdateResponse {
        report_name: UPDATE_REPORT_NAME.to_string(),
        report_date,
        has_exceeded_maximum_contributions: outcome.has_exceeded_maximum_contributions,
        adjustments_summary: outcome.adjustments,
        totals: update_totals(&outcome.members),
        members: outcome.members,
    }
}

/// Sums the update report's columns.
#[must_use]
pub fn update_totals(members: &[MemberFinancials]) -> UpdateTotals {
    members.iter().fold(UpdateTotals::default(), |mut totals, member| {
        totals.beginning_balance += member.current_amount;
        totals.contributions += member.contributions;
        totals.incoming_forfeitures += member.incoming_forfeitures;
        totals.earnings += member.all_earnings;
        totals.secondary_earnings += member.all_secondary_earnings;
        totals.ending_balance += member.ending_balance;
        totals.max_over += member.max_over;
        if member.is_employee() {
            totals.employee_count += 1;
        } else {
            totals.beneficiary_count += 1;
        }
        totals
    })
}
