//! Earn-point and earnings arithmetic.
//!
//! All rounding is half away from zero; the plan's historical batch figures must be
//! reproduced to the cent. Products and ratios use checked arithmetic so an amount
//! outside the decimal range fails the run instead of panicking.

use profitshare_shared::types::money::{round_money, round_points, truncate_ratio};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use super::error::SettlementError;
use super::types::{MemberTotals, ProfitDetailTotals};

/// Pure earnings calculations.
pub struct EarningsCalculator;

impl EarningsCalculator {
    /// Balance that earns this year.
    ///
    /// The class action fund total is left out: it is added to and then removed from
    /// the plan's historical formula.
    #[must_use]
    pub fn new_current_amount(beginning_balance: Decimal, totals: &ProfitDetailTotals) -> Decimal {
        totals.allocations_total + beginning_balance
            - totals.forfeits_total
            - totals.paid_allocations_total
            - totals.distributions_total
    }

    /// Returns `(points_dollars, earn_points)` for an earning balance.
    ///
    /// A balance that is not positive earns nothing. A balance whose points do not
    /// fit an `i32` is rejected.
    pub fn earn_points(new_current_amount: Decimal) -> Result<(Decimal, i32), SettlementError> {
        if new_current_amount <= Decimal::ZERO {
            return Ok((Decimal::ZERO, 0));
        }

        let points_dollars = round_money(new_current_amount);
        let points = round_points(points_dollars / Decimal::ONE_HUNDRED);
        let Some(earn_points) = points.to_i32() else {
            warn!(points_dollars = %points_dollars, "Earning balance exceeds the earn point range");
            return Err(SettlementError::snapshot(format!(
                "earning balance {points_dollars} exceeds the earn point range"
            )));
        };
        Ok((points_dollars, earn_points))
    }

    /// Amount paid at `percent` per point, rounded to cents.
    pub fn amount_for_points(percent: Decimal, points: i32) -> Result<Decimal, SettlementError> {
        percent
            .checked_mul(Decimal::from(points))
            .map(round_money)
            .ok_or_else(|| {
                SettlementError::invalid_request(format!(
                    "rate {percent} on {points} points overflows"
                ))
            })
    }

    /// Computes earn points and both earnings amounts for an earning balance.
    pub fn compute(
        new_current_amount: Decimal,
        earnings_percent: Decimal,
        secondary_earnings_percent: Decimal,
    ) -> Result<MemberTotals, SettlementError> {
        let (points_dollars, earn_points) = Self::earn_points(new_current_amount)?;
        Ok(MemberTotals {
            new_current_amount,
            points_dollars,
            earn_points,
            earnings_amount: Self::amount_for_points(earnings_percent, earn_points)?,
            secondary_earnings_amount: Self::amount_for_points(secondary_earnings_percent, earn_points)?,
        })
    }

    /// Share of the earning balance held in the ETVA, truncated to six places.
    ///
    /// Returns `None` when there is no ETVA or no earning balance to split.
    pub fn etva_ratio(
        working_etva: Decimal,
        points_dollars: Decimal,
    ) -> Result<Option<Decimal>, SettlementError> {
        if working_etva <= Decimal::ZERO || points_dollars <= Decimal::ZERO {
            return Ok(None);
        }
        working_etva
            .checked_div(points_dollars)
            .map(|ratio| Some(truncate_ratio(ratio)))
            .ok_or_else(|| {
                SettlementError::snapshot(format!(
                    "ETVA {working_etva} on earning balance {points_dollars} overflows"
                ))
            })
    }

    /// The ETVA portion of an earnings amount.
    pub fn etva_portion(earnings: Decimal, ratio: Decimal) -> Result<Decimal, SettlementError> {
        earnings
            .checked_mul(ratio)
            .map(round_money)
            .ok_or_else(|| {
                SettlementError::invalid_request(format!(
                    "ETVA share {ratio} of earnings {earnings} overflows"
                ))
            })
    }
}
