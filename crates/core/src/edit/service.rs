//! Edit report service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::classifier::TransactionClassifier;
use super::types::ProfitShareEditResponse;
use crate::settlement::ports::{CalendarService, PlanSnapshot, cancellable};
use crate::settlement::{
    FiscalDates, MemberFinancials, ProfitShareUpdateRequest, SettlementError, SettlementService,
};

/// Report name of the edit view.
pub const EDIT_REPORT_NAME: &str = "Profit Sharing Edit";

/// Produces the records a settlement would post, for review before posting.
pub struct ProfitShareEditService<S: PlanSnapshot, C: CalendarService> {
    settlement: Arc<SettlementService<S, C>>,
}

impl<S: PlanSnapshot, C: CalendarService> ProfitShareEditService<S, C> {
    /// Create a new edit service on top of a settlement service.
    #[must_use]
    pub fn new(settlement: Arc<SettlementService<S, C>>) -> Self {
        Self { settlement }
    }

    /// Settles the plan year and classifies every member into transaction records.
    ///
    /// # Errors
    ///
    /// Returns an error if the settlement fails or the plan year has no calendar.
    pub async fn edit_report(
        &self,
        request: &ProfitShareUpdateRequest,
        cancel: &CancellationToken,
    ) -> Result<ProfitShareEditResponse, SettlementError> {
        let outcome = self.settlement.settle(request, cancel).await?;
        let fiscal = cancellable(
            cancel,
            self.settlement
                .calendar()
                .fiscal_year_boundaries(request.profit_year, cancel),
        )
        .await?;

        let report = edit_view(&outcome.members, fiscal, Utc::now());
        info!(
            profit_year = request.profit_year,
            records = report.total,
            "Edit report built"
        );
        Ok(report)
    }
}

/// Builds the edit report from settled members.
#[must_use]
pub fn edit_view(
    members: &[MemberFinancials],
    fiscal: FiscalDates,
    report_date: DateTime<Utc>,
) -> ProfitShareEditResponse {
    let records = TransactionClassifier::classify(members);

    ProfitShareEditResponse {
        report_name: EDIT_REPORT_NAME.to_string(),
        report_date,
        start_date: fiscal.fiscal_begin_date,
        end_date: fiscal.fiscal_end_date,
        beginning_balance_total: members.iter().map(|m| m.current_amount).sum(),
        contribution_grand_total: members.iter().map(|m| m.contributions).sum(),
        incoming_forfeiture_grand_total: members.iter().map(|m| m.incoming_forfeitures).sum(),
        earnings_grand_total: members.iter().map(|m| m.all_earnings).sum(),
        total: records.len(),
        records,
    }
}
