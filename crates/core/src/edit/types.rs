//! Edit report types.

use chrono::{DateTime, NaiveDate, Utc};
use profitshare_shared::{BadgeNumber, Psn};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::plan::{CommentType, ProfitCode, ZeroContributionReason};
use crate::settlement::MemberFinancials;

/// Year extension of a member's primary-year record.
pub const PRIMARY_YEAR_EXTENSION: u8 = 0;

/// Year extension of a secondary-earnings record.
pub const SECONDARY_YEAR_EXTENSION: u8 = 2;

/// A ledger-ready transaction for a human reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// Whether the record belongs to an employee.
    pub is_employee: bool,
    /// Badge number.
    pub badge_number: BadgeNumber,
    /// PSN.
    pub psn: Psn,
    /// Full name.
    pub name: String,
    /// Transaction type.
    pub code: ProfitCode,
    /// Contribution amount.
    pub contribution_amount: Decimal,
    /// Earnings amount.
    pub earning_amount: Decimal,
    /// Forfeiture amount.
    pub forfeiture_amount: Decimal,
    /// Remark posted with the transaction.
    pub remark: Option<&'static str>,
    /// Comment type behind the remark.
    pub comment_type: Option<CommentType>,
    /// Short explanation shown to the reviewer.
    pub record_change_summary: Option<&'static str>,
    /// Zero-contribution status posted with the transaction.
    pub zero_cont_status: Option<ZeroContributionReason>,
    /// Zero-contribution status shown to the reviewer.
    pub displayed_zero_cont_status: u8,
    /// [`PRIMARY_YEAR_EXTENSION`] or [`SECONDARY_YEAR_EXTENSION`].
    pub year_extension: u8,
}

impl TransactionRecord {
    /// Creates an empty record of `code` for a member.
    #[must_use]
    pub fn for_member(member: &MemberFinancials, code: ProfitCode) -> Self {
        Self {
            is_employee: member.is_employee(),
            badge_number: member.badge_number,
            psn: member.psn,
            name: member.name.clone(),
            code,
            contribution_amount: Decimal::ZERO,
            earning_amount: Decimal::ZERO,
            forfeiture_amount: Decimal::ZERO,
            remark: None,
            comment_type: None,
            record_change_summary: None,
            zero_cont_status: None,
            displayed_zero_cont_status: 0,
            year_extension: PRIMARY_YEAR_EXTENSION,
        }
    }

    /// Sets the remark from a comment type.
    #[must_use]
    pub fn with_comment(mut self, comment: CommentType) -> Self {
        self.remark = Some(comment.name());
        self.comment_type = Some(comment);
        self
    }

    /// Marks the record as a secondary-earnings record.
    #[must_use]
    pub fn secondary(mut self) -> Self {
        self.year_extension = SECONDARY_YEAR_EXTENSION;
        self
    }

    /// Returns true if the record posts nothing and explains nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contribution_amount.is_zero()
            && self.earning_amount.is_zero()
            && self.forfeiture_amount.is_zero()
            && self.remark.is_none()
    }
}

/// The "Profit Sharing Edit" report.
#[derive(Debug, Clone, Serialize)]
pub struct ProfitShareEditResponse {
    /// Report name.
    pub report_name: String,
    /// When the report was generated.
    pub report_date: DateTime<Utc>,
    /// First day of the plan year's fiscal year.
    pub start_date: NaiveDate,
    /// Last day of the plan year's fiscal year.
    pub end_date: NaiveDate,
    /// Sum of the members' beginning balances.
    pub beginning_balance_total: Decimal,
    /// Sum of new contributions.
    pub contribution_grand_total: Decimal,
    /// Sum of new incoming forfeitures.
    pub incoming_forfeiture_grand_total: Decimal,
    /// Sum of new earnings.
    pub earnings_grand_total: Decimal,
    /// Number of records.
    pub total: usize,
    /// Records in member order.
    pub records: Vec<TransactionRecord>,
}
