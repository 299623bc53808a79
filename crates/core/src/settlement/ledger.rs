//! Per-member sums of a plan year's ledger lines.

use std::collections::HashMap;

use profitshare_shared::Ssn;
use tokio_util::sync::CancellationToken;

use super::error::SettlementError;
use super::ports::{PlanSnapshot, cancellable};
use super::types::{LedgerLine, ProfitDetailTotals};
use crate::plan::ProfitCode;

/// Remark prefixes marking a 100%-vested payment as a transfer rather than a distribution.
const TRANSFER_REMARK_PREFIXES: [&str; 4] = ["XFER >", "QDRO >", "XFER>", "QDRO>"];

/// Year iteration of military contributions.
const MILITARY_ITERATION: u8 = 1;

/// Year iteration of class action fund earnings.
const CLASS_ACTION_FUND_ITERATION: u8 = 2;

/// Sums ledger lines into [`ProfitDetailTotals`].
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// Adds one line to a member's totals.
    pub fn accumulate(totals: &mut ProfitDetailTotals, line: &LedgerLine) {
        match line.code {
            ProfitCode::OutgoingPartialWithdrawal | ProfitCode::OutgoingDirectPayments => {
                totals.distributions_total += line.forfeiture;
            }
            ProfitCode::Outgoing100PercentVestedPayment => {
                if Self::is_transfer_remark(line.remark.as_deref()) {
                    totals.paid_allocations_total += line.forfeiture;
                } else {
                    totals.distributions_total += line.forfeiture;
                }
            }
            ProfitCode::OutgoingForfeitures => totals.forfeits_total += line.forfeiture,
            ProfitCode::OutgoingTransferToBeneficiary => {
                totals.paid_allocations_total += line.forfeiture;
            }
            ProfitCode::IncomingQdroBeneficiary => totals.allocations_total += line.contribution,
            ProfitCode::IncomingContributions | ProfitCode::Incoming100PercentVestedEarnings => {}
        }

        match line.year_iteration {
            MILITARY_ITERATION => totals.military_total += line.contribution,
            CLASS_ACTION_FUND_ITERATION => totals.class_action_fund_total += line.earnings,
            _ => {}
        }
    }

    /// Sums lines per SSN.
    pub fn aggregate<'a>(
        lines: impl IntoIterator<Item = &'a LedgerLine>,
    ) -> HashMap<Ssn, ProfitDetailTotals> {
        let mut totals: HashMap<Ssn, ProfitDetailTotals> = HashMap::new();
        for line in lines {
            Self::accumulate(totals.entry(line.ssn).or_default(), line);
        }
        totals
    }

    /// Fetches a plan year's ledger lines for the SSNs and sums them per SSN.
    ///
    /// SSNs without lines are absent from the map; use [`Self::totals_for`] to read it.
    pub async fn ledger_totals<S: PlanSnapshot>(
        snapshot: &S,
        profit_year: i16,
        ssns: &[Ssn],
        cancel: &CancellationToken,
    ) -> Result<HashMap<Ssn, ProfitDetailTotals>, SettlementError> {
        if ssns.is_empty() {
            return Ok(HashMap::new());
        }

        let lines = cancellable(cancel, snapshot.ledger_lines(profit_year, ssns, cancel)).await?;
        Ok(Self::aggregate(
            lines.iter().filter(|line| line.profit_year == profit_year),
        ))
    }

    /// A member's totals, or [`ProfitDetailTotals::ZERO`] when it had no activity.
    #[must_use]
    pub fn totals_for(totals: &HashMap<Ssn, ProfitDetailTotals>, ssn: Ssn) -> ProfitDetailTotals {
        totals.get(&ssn).copied().unwrap_or(ProfitDetailTotals::ZERO)
    }

    fn is_transfer_remark(remark: Option<&str>) -> bool {
        remark.is_some_and(|r| TRANSFER_REMARK_PREFIXES.iter().any(|p| r.starts_with(p)))
    }
}
