//! Settlement domain types.

use chrono::{DateTime, NaiveDate, Utc};
use profitshare_shared::config::SettlementDefaults;
use profitshare_shared::{BadgeNumber, Psn, Ssn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::SettlementError;
use crate::plan::{EmployeeType, Enrollment, ProfitCode, ZeroContributionReason};

/// Lowest plan year a request may name.
pub const MIN_PROFIT_YEAR: i16 = 1900;

/// Highest plan year a request may name.
pub const MAX_PROFIT_YEAR: i16 = 2999;

/// Highest rate, in percent, a request may name.
pub const MAX_RATE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Largest magnitude of a single badge adjustment.
pub const MAX_ADJUSTMENT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Statutory maximum contribution used when the request does not name one.
pub const DEFAULT_MAX_ALLOWED_CONTRIBUTIONS: Decimal = Decimal::from_parts(69_000, 0, 0, false, 0);

fn default_max_allowed_contributions() -> Decimal {
    DEFAULT_MAX_ALLOWED_CONTRIBUTIONS
}

// ============================================================================
// Request
// ============================================================================

/// Parameters of one settlement run.
///
/// Rates apply per point: contributions per contribution point earned during the
/// year, earnings per earn point (one point per $100 of balance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitShareUpdateRequest {
    /// Plan year being settled.
    pub profit_year: i16,
    /// Earnings rate.
    pub earnings_percent: Decimal,
    /// Secondary earnings rate.
    #[serde(default)]
    pub secondary_earnings_percent: Decimal,
    /// Contribution rate.
    #[serde(default)]
    pub contribution_percent: Decimal,
    /// Incoming forfeiture rate.
    #[serde(default)]
    pub incoming_forfeit_percent: Decimal,
    /// Statutory maximum of contributions, military and forfeitures per member.
    #[serde(default = "default_max_allowed_contributions")]
    pub max_allowed_contributions: Decimal,
    /// Employee whose contribution, forfeiture and earnings get adjusted.
    #[serde(default)]
    pub badge_to_adjust: Option<BadgeNumber>,
    /// Amount added to the adjusted employee's contribution.
    #[serde(default)]
    pub adjust_contribution_amount: Decimal,
    /// Amount added to the adjusted employee's incoming forfeiture.
    #[serde(default)]
    pub adjust_incoming_forfeit_amount: Decimal,
    /// Amount added to the adjusted employee's earnings.
    #[serde(default)]
    pub adjust_earnings_amount: Decimal,
    /// Employee whose secondary earnings get adjusted.
    #[serde(default)]
    pub badge_to_adjust2: Option<BadgeNumber>,
    /// Amount added to that employee's secondary earnings.
    #[serde(default)]
    pub adjust_earnings_secondary_amount: Decimal,
}

impl ProfitShareUpdateRequest {
    /// Creates a request with no contributions, forfeitures or adjustments.
    #[must_use]
    pub fn new(
        profit_year: i16,
        earnings_percent: Decimal,
        secondary_earnings_percent: Decimal,
    ) -> Self {
        Self {
            profit_year,
            earnings_percent,
            secondary_earnings_percent,
            contribution_percent: Decimal::ZERO,
            incoming_forfeit_percent: Decimal::ZERO,
            max_allowed_contributions: DEFAULT_MAX_ALLOWED_CONTRIBUTIONS,
            badge_to_adjust: None,
            adjust_contribution_amount: Decimal::ZERO,
            adjust_incoming_forfeit_amount: Decimal::ZERO,
            adjust_earnings_amount: Decimal::ZERO,
            badge_to_adjust2: None,
            adjust_earnings_secondary_amount: Decimal::ZERO,
        }
    }

    /// Validates rates, adjustments, the maximum and the plan year.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::InvalidRequest`] naming the first field out of range.
    pub fn validate(&self) -> Result<(), SettlementError> {
        if !(MIN_PROFIT_YEAR..=MAX_PROFIT_YEAR).contains(&self.profit_year) {
            return Err(SettlementError::invalid_request(format!(
                "profit year {} is outside {MIN_PROFIT_YEAR}..={MAX_PROFIT_YEAR}",
                self.profit_year
            )));
        }

        let rates = [
            ("earnings_percent", self.earnings_percent),
            ("secondary_earnings_percent", self.secondary_earnings_percent),
            ("contribution_percent", self.contribution_percent),
            ("incoming_forfeit_percent", self.incoming_forfeit_percent),
        ];
        if let Some((field, _)) = rates.iter().find(|(_, rate)| *rate < Decimal::ZERO) {
            return Err(SettlementError::invalid_request(format!("{field} must not be negative")));
        }
        if let Some((field, _)) = rates.iter().find(|(_, rate)| *rate > MAX_RATE) {
            return Err(SettlementError::invalid_request(format!(
                "{field} must not exceed {MAX_RATE}"
            )));
        }

        let adjustments = [
            ("adjust_contribution_amount", self.adjust_contribution_amount),
            ("adjust_incoming_forfeit_amount", self.adjust_incoming_forfeit_amount),
            ("adjust_earnings_amount", self.adjust_earnings_amount),
            ("adjust_earnings_secondary_amount", self.adjust_earnings_secondary_amount),
        ];
        if let Some((field, _)) = adjustments
            .iter()
            .find(|(_, amount)| amount.abs() > MAX_ADJUSTMENT)
        {
            return Err(SettlementError::invalid_request(format!(
                "{field} must be within {MAX_ADJUSTMENT} either way"
            )));
        }

        if self.max_allowed_contributions < Decimal::ZERO {
            return Err(SettlementError::invalid_request(
                "max_allowed_contributions must not be negative",
            ));
        }

        Ok(())
    }

    /// The plan year before the one being settled.
    #[must_use]
    pub const fn prior_year(&self) -> i16 {
        self.profit_year - 1
    }

    /// Whether the primary adjustments apply to this badge.
    #[must_use]
    pub fn adjusts_primary(&self, badge: BadgeNumber) -> bool {
        self.badge_to_adjust
            .is_some_and(|b| b.into_inner() > 0 && b == badge)
    }

    /// Whether the secondary earnings adjustment applies to this badge.
    #[must_use]
    pub fn adjusts_secondary(&self, badge: BadgeNumber) -> bool {
        self.badge_to_adjust2
            .is_some_and(|b| b.into_inner() > 0 && b == badge)
    }
}

impl From<&SettlementDefaults> for ProfitShareUpdateRequest {
    fn from(defaults: &SettlementDefaults) -> Self {
        Self {
            contribution_percent: defaults.contribution_percent,
            incoming_forfeit_percent: defaults.incoming_forfeit_percent,
            max_allowed_contributions: defaults.max_allowed_contributions,
            ..Self::new(
                defaults.profit_year,
                defaults.earnings_percent,
                defaults.secondary_earnings_percent,
            )
        }
    }
}

// ============================================================================
// Snapshot rows
// ============================================================================

/// Fiscal year boundaries from the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalDates {
    /// First day of the fiscal year.
    pub fiscal_begin_date: NaiveDate,
    /// Last day of the fiscal year.
    pub fiscal_end_date: NaiveDate,
}

/// An employee's pay-profit row for the plan year joined with vesting facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRow {
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
    /// Balance as of the prior fiscal year end.
    #[serde(default)]
    pub current_balance: Decimal,
}

/// A beneficiary as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryRow {
    /// Stored PSN text.
    pub psn: String,
    /// Badge number of the employee the beneficiary belongs to.
    pub badge_number: BadgeNumber,
    /// Beneficiary SSN.
    pub ssn: Ssn,
    /// Full name.
    pub name: String,
}

/// One posted ledger line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Member SSN.
    pub ssn: Ssn,
    /// Plan year the line belongs to.
    pub profit_year: i16,
    /// 0 for ordinary lines, 1 for military, 2 for class action fund.
    #[serde(default)]
    pub year_iteration: u8,
    /// Transaction type.
    pub code: ProfitCode,
    /// Contribution amount.
    #[serde(default)]
    pub contribution: Decimal,
    /// Earnings amount.
    #[serde(default)]
    pub earnings: Decimal,
    /// Forfeiture (or payment) amount.
    #[serde(default)]
    pub forfeiture: Decimal,
    /// Free-form remark.
    #[serde(default)]
    pub remark: Option<String>,
}

// ============================================================================
// Working records
// ============================================================================

/// Per-SSN sums of one plan year's ledger lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitDetailTotals {
    /// Partial withdrawals and direct payments.
    pub distributions_total: Decimal,
    /// Outgoing forfeitures.
    pub forfeits_total: Decimal,
    /// Incoming QDRO allocations.
    pub allocations_total: Decimal,
    /// Transfers out to beneficiaries.
    pub paid_allocations_total: Decimal,
    /// Military contributions.
    pub military_total: Decimal,
    /// Class action fund earnings.
    pub class_action_fund_total: Decimal,
}

impl ProfitDetailTotals {
    /// Totals of a member with no activity.
    pub const ZERO: Self = Self {
        distributions_total: Decimal::ZERO,
        forfeits_total: Decimal::ZERO,
        allocations_total: Decimal::ZERO,
        paid_allocations_total: Decimal::ZERO,
        military_total: Decimal::ZERO,
        class_action_fund_total: Decimal::ZERO,
    };

    /// Returns true if any total is non-zero.
    #[must_use]
    pub fn has_amounts(&self) -> bool {
        *self != Self::ZERO
    }
}

/// Amounts computed for one member during the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberTotals {
    /// Balance that earns this year.
    pub new_current_amount: Decimal,
    /// Earning balance rounded to cents, zero when not positive.
    pub points_dollars: Decimal,
    /// One point per $100 of `points_dollars`.
    pub earn_points: i32,
    /// Earnings at the primary rate.
    pub earnings_amount: Decimal,
    /// Earnings at the secondary rate.
    pub secondary_earnings_amount: Decimal,
}

/// The roles a settled member holds in the plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRoles {
    /// Employee only.
    #[default]
    Employee,
    /// Beneficiary only.
    Beneficiary,
    /// Employee who is also a beneficiary, settled once on the employee side.
    EmployeeAndBeneficiary,
}

impl MemberRoles {
    /// Returns true if the member holds an employee record.
    #[must_use]
    pub const fn is_employee(self) -> bool {
        matches!(self, Self::Employee | Self::EmployeeAndBeneficiary)
    }

    /// Returns true if the member is named as a beneficiary.
    #[must_use]
    pub const fn is_beneficiary(self) -> bool {
        matches!(self, Self::Beneficiary | Self::EmployeeAndBeneficiary)
    }
}

/// A beneficiary's balances before settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryFinancials {
    /// PSN.
    pub psn: Psn,
    /// Badge number of the employee the beneficiary belongs to.
    pub badge_number: BadgeNumber,
    /// SSN.
    pub ssn: Ssn,
    /// Full name.
    pub name: String,
    /// Prior-year ending total.
    pub beginning_balance: Decimal,
    /// Balance that earns this year.
    pub current_amount: Decimal,
    /// Earnings at the primary rate.
    pub earnings: Decimal,
    /// Earnings at the secondary rate.
    pub secondary_earnings: Decimal,
}

/// One settled plan member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFinancials {
    /// Roles held in the plan.
    pub roles: MemberRoles,
    /// Set on an employee who is economically a beneficiary.
    pub treat_as_beneficiary: bool,
    /// Badge number.
    pub badge_number: BadgeNumber,
    /// PSN.
    pub psn: Psn,
    /// SSN.
    pub ssn: Ssn,
    /// Full name.
    pub name: String,
    /// Beginning balance.
    pub current_amount: Decimal,
    /// Distributions posted this year.
    pub distributions: Decimal,
    /// Military contributions posted this year.
    pub military: Decimal,
    /// Incoming allocations posted this year.
    pub allocations: Decimal,
    /// Paid allocations posted this year.
    pub paid_allocations: Decimal,
    /// Outgoing forfeitures posted this year.
    pub forfeits: Decimal,
    /// Class action fund posted this year.
    pub class_action_fund: Decimal,
    /// New-hire status.
    pub employee_type: EmployeeType,
    /// Zero-contribution classification.
    pub zero_contribution_reason: ZeroContributionReason,
    /// Contribution points earned during the year.
    pub contribution_points: i32,
    /// Earn points of the balance.
    pub earn_points: i32,
    /// New contribution.
    pub contributions: Decimal,
    /// New incoming forfeitures.
    pub incoming_forfeitures: Decimal,
    /// New earnings, ETVA portion included.
    pub all_earnings: Decimal,
    /// 100%-vested balance component.
    pub etva: Decimal,
    /// Portion of `all_earnings` earned on the ETVA.
    pub etva_earnings: Decimal,
    /// New secondary earnings, ETVA portion included.
    pub all_secondary_earnings: Decimal,
    /// Portion of `all_secondary_earnings` earned on the ETVA.
    pub secondary_etva_earnings: Decimal,
    /// Balance after the settlement is posted.
    pub ending_balance: Decimal,
    /// Amount the member went over the statutory maximum.
    pub max_over: Decimal,
    /// Contribution points of a member over the maximum.
    pub max_points: i32,
}

impl MemberFinancials {
    /// Returns true if the member is settled on the employee side.
    #[must_use]
    pub const fn is_employee(&self) -> bool {
        self.roles.is_employee()
    }

    /// Returns true if nothing new is posted to the member.
    #[must_use]
    pub fn is_all_zeros(&self) -> bool {
        self.contributions.is_zero()
            && self.incoming_forfeitures.is_zero()
            && self.all_earnings.is_zero()
            && self.all_secondary_earnings.is_zero()
    }

    /// Balance after posting this year's activity and the new amounts.
    #[must_use]
    pub fn compute_ending_balance(&self) -> Decimal {
        self.current_amount
            + self.contributions
            + self.incoming_forfeitures
            + self.all_earnings
            + self.all_secondary_earnings
            + self.allocations
            + self.military
            + self.class_action_fund
            - self.distributions
            - self.paid_allocations
            - self.forfeits
    }

    /// Sets `ending_balance` from the other fields.
    #[must_use]
    pub fn with_ending_balance(mut self) -> Self {
        self.ending_balance = self.compute_ending_balance();
        self
    }
}

/// Amounts before and after the requested badge adjustments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentsSummary {
    /// Badge that received the primary adjustments.
    pub badge_adjusted: Option<BadgeNumber>,
    /// Badge that received the secondary earnings adjustment.
    pub badge_adjusted2: Option<BadgeNumber>,
    /// Contribution before adjustment.
    pub contribution_amount_unadjusted: Decimal,
    /// Contribution after adjustment.
    pub contribution_amount_adjusted: Decimal,
    /// Incoming forfeiture before adjustment.
    pub incoming_forfeiture_amount_unadjusted: Decimal,
    /// Incoming forfeiture after adjustment.
    pub incoming_forfeiture_amount_adjusted: Decimal,
    /// Earnings before adjustment.
    pub earnings_amount_unadjusted: Decimal,
    /// Earnings after adjustment.
    pub earnings_amount_adjusted: Decimal,
    /// Secondary earnings before adjustment.
    pub secondary_earnings_amount_unadjusted: Decimal,
    /// Secondary earnings after adjustment.
    pub secondary_earnings_amount_adjusted: Decimal,
}

/// Result of one settlement run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// Employees first, then beneficiaries.
    pub members: Vec<MemberFinancials>,
    /// Whether any employee went over the statutory maximum.
    pub has_exceeded_maximum_contributions: bool,
    /// Adjustments applied during the run.
    pub adjustments: AdjustmentsSummary,
}

// ============================================================================
// Update view
// ============================================================================

/// Sums over all settled members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTotals {
    /// Beginning balances.
    pub beginning_balance: Decimal,
    /// New contributions.
    pub contributions: Decimal,
    /// New incoming forfeitures.
    pub incoming_forfeitures: Decimal,
    /// New earnings.
    pub earnings: Decimal,
    /// New secondary earnings.
    pub secondary_earnings: Decimal,
    /// Ending balances.
    pub ending_balance: Decimal,
    /// Amount over the statutory maximum.
    pub max_over: Decimal,
    /// Members settled on the employee side.
    pub employee_count: usize,
    /// Members settled on the beneficiary side.
    pub beneficiary_count: usize,
}

/// The "Profit Sharing Update" report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitShareUpdateResponse {
    /// Report name.
    pub report_name: String,
    /// When the report was generated.
    pub report_date: DateTime<Utc>,
    /// Whether any employee went over the statutory maximum.
    pub has_exceeded_maximum_contributions: bool,
    /// Adjustments applied during the run.
    pub adjustments_summary: AdjustmentsSummary,
    /// Sums over all members.
    pub totals: UpdateTotals,
    /// Settled members.
    pub members: Vec<MemberFinancials>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_request_validation() {
        let request = ProfitShareUpdateRequest::new(2024, dec!(5), dec!(0));
        assert!(request.validate().is_ok());

        let mut negative = request.clone();
        negative.secondary_earnings_percent = dec!(-0.5);
        assert_eq!(
            negative.validate(),
            Err(SettlementError::InvalidRequest(
                "secondary_earnings_percent must not be negative".to_string()
            ))
        );

        let mut max = request.clone();
        max.max_allowed_contributions = dec!(-1);
        assert!(max.validate().is_err());

        let mut full = request.clone();
        full.contribution_percent = MAX_RATE;
        assert!(full.validate().is_ok());

        let mut too_high = request.clone();
        too_high.earnings_percent = dec!(100.01);
        assert_eq!(
            too_high.validate(),
            Err(SettlementError::InvalidRequest(
                "earnings_percent must not exceed 100".to_string()
            ))
        );

        let mut huge = request.clone();
        huge.adjust_earnings_amount = -Decimal::MAX;
        assert!(huge.validate().is_err());

        let out_of_range = ProfitShareUpdateRequest::new(1899, dec!(5), dec!(0));
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: ProfitShareUpdateRequest =
            serde_json::from_str(r#"{"profit_year": 2024, "earnings_percent": "5"}"#).unwrap();
        assert_eq!(request, ProfitShareUpdateRequest::new(2024, dec!(5), Decimal::ZERO));
        assert_eq!(request.max_allowed_contributions, dec!(69000));
        assert_eq!(request.prior_year(), 2023);
    }

    #[test]
    fn test_adjustment_badges() {
        let mut request = ProfitShareUpdateRequest::new(2024, dec!(5), dec!(0));
        assert!(!request.adjusts_primary(BadgeNumber(0)));

        request.badge_to_adjust = Some(BadgeNumber(700_123));
        request.badge_to_adjust2 = Some(BadgeNumber(0));
        assert!(request.adjusts_primary(BadgeNumber(700_123)));
        assert!(!request.adjusts_primary(BadgeNumber(700_124)));
        assert!(!request.adjusts_secondary(BadgeNumber(0)));
    }

    #[test]
    fn test_zero_totals_have_no_amounts() {
        assert!(!ProfitDetailTotals::ZERO.has_amounts());
        let totals = ProfitDetailTotals {
            military_total: dec!(10),
            ..ProfitDetailTotals::ZERO
        };
        assert!(totals.has_amounts());
    }

    #[test]
    fn test_ending_balance() {
        let member = MemberFinancials {
            current_amount: dec!(1000),
            contributions: dec!(100),
            incoming_forfeitures: dec!(10),
            all_earnings: dec!(50),
            all_secondary_earnings: dec!(5),
            allocations: dec!(500),
            military: dec!(20),
            class_action_fund: dec!(30),
            distributions: dec!(20),
            paid_allocations: dec!(50),
            forfeits: dec!(100),
            ..MemberFinancials::default()
        }
        .with_ending_balance();
        assert_eq!(member.ending_balance, dec!(1545));
    }

    #[test]
    fn test_roles() {
        assert!(MemberRoles::EmployeeAndBeneficiary.is_employee());
        assert!(MemberRoles::EmployeeAndBeneficiary.is_beneficiary());
        assert!(!MemberRoles::Beneficiary.is_employee());
        assert!(!MemberRoles::Employee.is_beneficiary());
    }
}
