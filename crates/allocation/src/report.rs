use core_types::StockKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate statistics for the whole pool, plus every investor's share.
///
/// This struct is the final output of `AllocationEngine::compute_stats` and
/// serves as the data transfer object for the overview page of the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    // I. Raw pool totals
    pub total_profit: Decimal,
    pub total_loss: Decimal,
    pub total_not_won_cost: Decimal,
    /// `total_loss + total_not_won_cost`.
    pub total_cost: Decimal,
    /// `total_profit - total_cost`; may be negative.
    pub net_profit: Decimal,

    // II. The agreed split of the net result
    pub operator_profit: Decimal,
    pub investor_total_profit: Decimal,

    // III. Instrument counts
    pub profit_stock_count: usize,
    pub loss_stock_count: usize,
    pub not_won_stock_count: usize,

    // IV. Per-investor distribution, in Normal-set order
    pub investor_shares: Vec<InvestorShare>,
}

impl PoolStats {
    /// Creates a new, zeroed-out PoolStats.
    /// This is the starting point before any calculation runs.
    pub fn new() -> Self {
        Self {
            total_profit: Decimal::ZERO,
            total_loss: Decimal::ZERO,
            total_not_won_cost: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            operator_profit: Decimal::ZERO,
            investor_total_profit: Decimal::ZERO,
            profit_stock_count: 0,
            loss_stock_count: 0,
            not_won_stock_count: 0,
            investor_shares: Vec::new(),
        }
    }
}

impl Default for PoolStats {
    fn default() -> Self {
        Self::new()
    }
}

/// One Normal-set investor's final position in the distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorShare {
    pub name: String,
    /// The investor's Normal-set investment, carried for display.
    pub investment: Decimal,
    /// Gross profit contributions minus apportioned costs; may be negative.
    pub profit: Decimal,
}

/// A per-instrument detail view for one stakeholder (operator or investor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// One line per instrument touched, in snapshot list order.
    pub lines: Vec<LineItem>,
    /// Running total of `share` over all lines.
    pub total: Decimal,
}

/// One instrument's contribution to a stakeholder's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub stock: String,
    pub kind: StockKind,
    /// The instrument's raw outcome, signed: revenue positive, loss and
    /// unfilled cost negative.
    pub outcome: Decimal,
    /// The stakeholder's allocated amount, carrying the same sign as
    /// `outcome`.
    pub share: Decimal,
    /// True only on investor-breakdown profit lines apportioned on the
    /// Special basis; the presentation layer renders its post-cutoff badge
    /// from this.
    pub special_basis: bool,
}
