use crate::error::AllocationError;
use crate::report::{Breakdown, InvestorShare, LineItem, PoolStats};
use core_types::{ApportionBasis, Investor, Snapshot, StockKind};
use rust_decimal::Decimal;

/// Absolute tolerance on `operator_share + investor_share == 1`. The shares
/// are exact decimals from the snapshot file, so this only has to absorb
/// representation noise, not accumulated arithmetic error.
const SHARE_SPLIT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// Pre-validated apportionment denominators for one snapshot.
#[derive(Debug, Clone, Copy)]
struct BasisTotals {
    normal: Decimal,
    special: Decimal,
}

/// A stateless calculator for distributing the pool's net result among the
/// operator and the investors.
///
/// Every method is a pure function of the snapshot it is handed; the engine
/// holds no state and may be shared freely between callers.
#[derive(Debug, Default)]
pub struct AllocationEngine {}

impl AllocationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point: aggregate pool statistics plus one
    /// `InvestorShare` per Normal-set investor, in Normal-set order.
    ///
    /// # Errors
    ///
    /// - `InconsistentShareSplit` if the snapshot's two split fractions do
    ///   not sum to 1.
    /// - `MissingDenominator` if an instrument requires a basis whose total
    ///   investment is zero.
    pub fn compute_stats(&self, snapshot: &Snapshot) -> Result<PoolStats, AllocationError> {
        self.validate_share_split(snapshot)?;
        let totals = self.basis_totals(snapshot)?;

        let mut stats = PoolStats::new();
        stats.total_profit = snapshot.profit_stocks.iter().map(|s| s.revenue).sum();
        stats.total_loss = snapshot.loss_stocks.iter().map(|s| s.loss).sum();
        stats.total_not_won_cost = snapshot.not_won_stocks.iter().map(|s| s.cost).sum();
        stats.total_cost = stats.total_loss + stats.total_not_won_cost;
        stats.net_profit = stats.total_profit - stats.total_cost;
        stats.operator_profit = stats.net_profit * snapshot.operator_share;
        stats.investor_total_profit = stats.net_profit * snapshot.investor_share;
        stats.profit_stock_count = snapshot.profit_stocks.len();
        stats.loss_stock_count = snapshot.loss_stocks.len();
        stats.not_won_stock_count = snapshot.not_won_stocks.len();

        stats.investor_shares = snapshot
            .investors
            .iter()
            .map(|investor| InvestorShare {
                name: investor.name.clone(),
                investment: investor.investment,
                profit: self.investor_profit(snapshot, &totals, investor),
            })
            .collect();

        tracing::debug!(
            net_profit = %stats.net_profit,
            investors = stats.investor_shares.len(),
            "pool stats computed"
        );

        Ok(stats)
    }

    /// Per-instrument detail of the operator's result.
    ///
    /// The operator takes a flat `operator_share` of every instrument's raw
    /// outcome, independent of which investor pool funded it, so no basis
    /// lookup is involved. Zero-cost not-won stocks are omitted.
    ///
    /// # Errors
    ///
    /// `InconsistentShareSplit` if the snapshot's split fractions do not
    /// sum to 1.
    pub fn operator_breakdown(&self, snapshot: &Snapshot) -> Result<Breakdown, AllocationError> {
        self.validate_share_split(snapshot)?;

        let mut lines = Vec::new();
        for stock in &snapshot.profit_stocks {
            lines.push(LineItem {
                stock: stock.name.clone(),
                kind: StockKind::Profit,
                outcome: stock.revenue,
                share: stock.revenue * snapshot.operator_share,
                special_basis: false,
            });
        }
        for stock in &snapshot.loss_stocks {
            lines.push(LineItem {
                stock: stock.name.clone(),
                kind: StockKind::Loss,
                outcome: -stock.loss,
                share: -(stock.loss * snapshot.operator_share),
                special_basis: false,
            });
        }
        for stock in &snapshot.not_won_stocks {
            if stock.cost > Decimal::ZERO {
                lines.push(LineItem {
                    stock: stock.name.clone(),
                    kind: StockKind::NotWon,
                    outcome: -stock.cost,
                    share: -(stock.cost * snapshot.operator_share),
                    special_basis: false,
                });
            }
        }

        Ok(Breakdown {
            total: lines.iter().map(|l| l.share).sum(),
            lines,
        })
    }

    /// Per-instrument detail of one Normal-set investor's result.
    ///
    /// Profit lines follow the per-stock basis rule and are included only
    /// when the personal share is strictly positive; loss and not-won lines
    /// with a nonzero amount are included as negative lines on the Normal
    /// basis. The running total equals the investor's `InvestorShare.profit`
    /// from `compute_stats`.
    ///
    /// # Errors
    ///
    /// - `InconsistentShareSplit` if the snapshot's split fractions do not
    ///   sum to 1.
    /// - `UnknownInvestor` if `name` is not in the Normal set.
    /// - `MissingDenominator` if an instrument requires a basis whose total
    ///   investment is zero.
    pub fn investor_breakdown(
        &self,
        snapshot: &Snapshot,
        name: &str,
    ) -> Result<Breakdown, AllocationError> {
        self.validate_share_split(snapshot)?;
        let investor = snapshot
            .investor(name)
            .ok_or_else(|| AllocationError::UnknownInvestor(name.to_string()))?;
        let totals = self.basis_totals(snapshot)?;

        let mut lines = Vec::new();
        for stock in &snapshot.profit_stocks {
            let share = self.weight(snapshot, &totals, investor, stock.basis)
                * (stock.revenue * snapshot.investor_share);
            if share > Decimal::ZERO {
                lines.push(LineItem {
                    stock: stock.name.clone(),
                    kind: StockKind::Profit,
                    outcome: stock.revenue,
                    share,
                    special_basis: stock.basis == ApportionBasis::Special,
                });
            }
        }
        for stock in &snapshot.loss_stocks {
            if stock.loss != Decimal::ZERO {
                let share = self.weight(snapshot, &totals, investor, ApportionBasis::Normal)
                    * (stock.loss * snapshot.investor_share);
                lines.push(LineItem {
                    stock: stock.name.clone(),
                    kind: StockKind::Loss,
                    outcome: -stock.loss,
                    share: -share,
                    special_basis: false,
                });
            }
        }
        for stock in &snapshot.not_won_stocks {
            if stock.cost != Decimal::ZERO {
                let share = self.weight(snapshot, &totals, investor, ApportionBasis::Normal)
                    * (stock.cost * snapshot.investor_share);
                lines.push(LineItem {
                    stock: stock.name.clone(),
                    kind: StockKind::NotWon,
                    outcome: -stock.cost,
                    share: -share,
                    special_basis: false,
                });
            }
        }

        Ok(Breakdown {
            total: lines.iter().map(|l| l.share).sum(),
            lines,
        })
    }

    /// One investor's final profit: gross contributions from every profit
    /// stock (on that stock's basis) minus costs apportioned on the Normal
    /// basis. Losses and unfilled costs are never special-basis.
    fn investor_profit(
        &self,
        snapshot: &Snapshot,
        totals: &BasisTotals,
        investor: &Investor,
    ) -> Decimal {
        let mut profit = Decimal::ZERO;
        for stock in &snapshot.profit_stocks {
            profit += self.weight(snapshot, totals, investor, stock.basis)
                * (stock.revenue * snapshot.investor_share);
        }
        for stock in &snapshot.loss_stocks {
            profit -= self.weight(snapshot, totals, investor, ApportionBasis::Normal)
                * (stock.loss * snapshot.investor_share);
        }
        for stock in &snapshot.not_won_stocks {
            profit -= self.weight(snapshot, totals, investor, ApportionBasis::Normal)
                * (stock.cost * snapshot.investor_share);
        }
        profit
    }

    /// The investor's fraction of the given basis. An investor absent from
    /// the Special set holds a zero weight there, which is how a
    /// special-basis stock pays nothing to investors who left at the cutoff.
    fn weight(
        &self,
        snapshot: &Snapshot,
        totals: &BasisTotals,
        investor: &Investor,
        basis: ApportionBasis,
    ) -> Decimal {
        match basis {
            ApportionBasis::Normal => investor.investment / totals.normal,
            ApportionBasis::Special => match snapshot.special_investor(&investor.name) {
                Some(special) => special.investment / totals.special,
                None => Decimal::ZERO,
            },
        }
    }

    /// Sums both investor sets and rejects a zero denominator, but only for
    /// a basis some instrument actually requires; an empty pool with no
    /// invested capital is a valid all-zero snapshot.
    fn basis_totals(&self, snapshot: &Snapshot) -> Result<BasisTotals, AllocationError> {
        let totals = BasisTotals {
            normal: snapshot.total_investment(),
            special: snapshot.special_total_investment(),
        };

        let needs_normal = !snapshot.loss_stocks.is_empty()
            || !snapshot.not_won_stocks.is_empty()
            || snapshot
                .profit_stocks
                .iter()
                .any(|s| s.basis == ApportionBasis::Normal);
        if needs_normal && totals.normal <= Decimal::ZERO {
            return Err(AllocationError::MissingDenominator(ApportionBasis::Normal));
        }

        let needs_special = snapshot
            .profit_stocks
            .iter()
            .any(|s| s.basis == ApportionBasis::Special);
        if needs_special && totals.special <= Decimal::ZERO {
            return Err(AllocationError::MissingDenominator(ApportionBasis::Special));
        }

        Ok(totals)
    }

    /// Every downstream amount is scaled by one of the two split fractions,
    /// so a split that does not sum to 1 invalidates the whole computation.
    fn validate_share_split(&self, snapshot: &Snapshot) -> Result<(), AllocationError> {
        let sum = snapshot.operator_share + snapshot.investor_share;
        if (sum - Decimal::ONE).abs() > SHARE_SPLIT_TOLERANCE {
            return Err(AllocationError::InconsistentShareSplit {
                operator: snapshot.operator_share,
                investor: snapshot.investor_share,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{LossStock, NotWonStock, ProfitStock};
    use rust_decimal_macros::dec;

    fn investor(name: &str, investment: Decimal) -> Investor {
        Investor {
            name: name.to_string(),
            investment,
        }
    }

    fn profit_stock(name: &str, revenue: Decimal, basis: ApportionBasis) -> ProfitStock {
        ProfitStock {
            name: name.to_string(),
            revenue,
            basis,
        }
    }

    /// Two investors, A with 100 and B with 300, under a 40/60 split.
    fn base_snapshot() -> Snapshot {
        Snapshot {
            generated_at: "2026-01-05 09:00".to_string(),
            operator_share: dec!(0.4),
            investor_share: dec!(0.6),
            profit_stocks: vec![profit_stock("Alpha", dec!(1000), ApportionBasis::Normal)],
            loss_stocks: vec![],
            not_won_stocks: vec![],
            investors: vec![investor("A", dec!(100)), investor("B", dec!(300))],
            special_investors: vec![],
        }
    }

    #[test]
    fn profit_apportions_by_normal_investment_ratio() {
        let stats = AllocationEngine::new()
            .compute_stats(&base_snapshot())
            .unwrap();

        assert_eq!(stats.total_profit, dec!(1000));
        assert_eq!(stats.net_profit, dec!(1000));
        assert_eq!(stats.operator_profit, dec!(400));
        assert_eq!(stats.investor_total_profit, dec!(600));
        assert_eq!(stats.investor_shares[0].profit, dec!(150));
        assert_eq!(stats.investor_shares[1].profit, dec!(450));
    }

    #[test]
    fn losses_apportion_on_the_normal_basis() {
        let mut snapshot = base_snapshot();
        snapshot.loss_stocks.push(LossStock {
            name: "Beta".to_string(),
            loss: dec!(200),
        });

        let stats = AllocationEngine::new().compute_stats(&snapshot).unwrap();

        assert_eq!(stats.total_cost, dec!(200));
        assert_eq!(stats.net_profit, dec!(800));
        assert_eq!(stats.investor_total_profit, dec!(480));
        // A: 150 - (100/400) * 200 * 0.6 = 120; B: 450 - 90 = 360.
        assert_eq!(stats.investor_shares[0].profit, dec!(120));
        assert_eq!(stats.investor_shares[1].profit, dec!(360));

        let sum: Decimal = stats.investor_shares.iter().map(|s| s.profit).sum();
        assert_eq!(sum, stats.investor_total_profit);
    }

    #[test]
    fn operator_and_investor_totals_conserve_net_profit() {
        let mut snapshot = base_snapshot();
        snapshot.loss_stocks.push(LossStock {
            name: "Beta".to_string(),
            loss: dec!(333.33),
        });
        snapshot.not_won_stocks.push(NotWonStock {
            name: "Gamma".to_string(),
            cost: dec!(41.67),
        });

        let stats = AllocationEngine::new().compute_stats(&snapshot).unwrap();
        assert_eq!(
            stats.operator_profit + stats.investor_total_profit,
            stats.net_profit
        );
    }

    #[test]
    fn special_stock_pays_by_special_set_weights_only() {
        let mut snapshot = base_snapshot();
        // B stayed past the cutoff with 150; A withdrew entirely.
        snapshot.special_investors = vec![investor("B", dec!(150))];
        snapshot
            .profit_stocks
            .push(profit_stock("Delta", dec!(500), ApportionBasis::Special));

        let stats = AllocationEngine::new().compute_stats(&snapshot).unwrap();

        // A keeps only the normal stock's 150; the special stock's
        // 500 * 0.6 = 300 goes entirely to B on top of B's 450.
        assert_eq!(stats.investor_shares[0].profit, dec!(150));
        assert_eq!(stats.investor_shares[1].profit, dec!(750));

        let sum: Decimal = stats.investor_shares.iter().map(|s| s.profit).sum();
        assert_eq!(sum, stats.investor_total_profit);
    }

    #[test]
    fn special_investment_change_leaves_normal_contributions_alone() {
        let mut snapshot = base_snapshot();
        snapshot.loss_stocks.push(LossStock {
            name: "Beta".to_string(),
            loss: dec!(200),
        });
        snapshot
            .profit_stocks
            .push(profit_stock("Delta", dec!(500), ApportionBasis::Special));
        snapshot.special_investors = vec![investor("A", dec!(50)), investor("B", dec!(150))];

        let engine = AllocationEngine::new();
        let before = engine.investor_breakdown(&snapshot, "A").unwrap();

        snapshot.special_investors[1].investment = dec!(999);
        let after = engine.investor_breakdown(&snapshot, "A").unwrap();

        // Only the special-basis line may move.
        for (b, a) in before.lines.iter().zip(after.lines.iter()) {
            assert_eq!(b.stock, a.stock);
            if !b.special_basis {
                assert_eq!(b.share, a.share);
            }
        }
        assert_ne!(
            before.lines.iter().find(|l| l.special_basis).unwrap().share,
            after.lines.iter().find(|l| l.special_basis).unwrap().share
        );
    }

    #[test]
    fn empty_instrument_lists_yield_all_zero_stats() {
        let mut snapshot = base_snapshot();
        snapshot.profit_stocks.clear();

        let stats = AllocationEngine::new().compute_stats(&snapshot).unwrap();
        assert_eq!(stats.net_profit, Decimal::ZERO);
        assert_eq!(stats.operator_profit, Decimal::ZERO);
        assert!(stats
            .investor_shares
            .iter()
            .all(|s| s.profit == Decimal::ZERO));
    }

    #[test]
    fn empty_pool_without_capital_is_not_an_error() {
        let snapshot = Snapshot {
            generated_at: String::new(),
            operator_share: dec!(0.5),
            investor_share: dec!(0.5),
            profit_stocks: vec![],
            loss_stocks: vec![],
            not_won_stocks: vec![],
            investors: vec![],
            special_investors: vec![],
        };

        let stats = AllocationEngine::new().compute_stats(&snapshot).unwrap();
        assert!(stats.investor_shares.is_empty());
        assert_eq!(stats.net_profit, Decimal::ZERO);
    }

    #[test]
    fn zero_normal_capital_with_costs_is_a_missing_denominator() {
        let mut snapshot = base_snapshot();
        snapshot.investors.clear();
        snapshot.profit_stocks.clear();
        snapshot.loss_stocks.push(LossStock {
            name: "Beta".to_string(),
            loss: dec!(10),
        });

        let err = AllocationEngine::new().compute_stats(&snapshot).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::MissingDenominator(ApportionBasis::Normal)
        ));
    }

    #[test]
    fn special_stock_without_special_capital_is_a_missing_denominator() {
        let mut snapshot = base_snapshot();
        snapshot
            .profit_stocks
            .push(profit_stock("Delta", dec!(500), ApportionBasis::Special));

        let err = AllocationEngine::new().compute_stats(&snapshot).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::MissingDenominator(ApportionBasis::Special)
        ));
    }

    #[test]
    fn share_split_must_sum_to_one_at_every_entry_point() {
        let mut snapshot = base_snapshot();
        snapshot.operator_share = dec!(0.5);
        // investor_share stays 0.6: sum is 1.1.

        let engine = AllocationEngine::new();
        assert!(matches!(
            engine.compute_stats(&snapshot),
            Err(AllocationError::InconsistentShareSplit { .. })
        ));
        assert!(matches!(
            engine.operator_breakdown(&snapshot),
            Err(AllocationError::InconsistentShareSplit { .. })
        ));
        assert!(matches!(
            engine.investor_breakdown(&snapshot, "A"),
            Err(AllocationError::InconsistentShareSplit { .. })
        ));
    }

    #[test]
    fn unknown_investor_is_reported_not_an_empty_list() {
        let err = AllocationEngine::new()
            .investor_breakdown(&base_snapshot(), "nonexistent")
            .unwrap_err();
        match err {
            AllocationError::UnknownInvestor(name) => assert_eq!(name, "nonexistent"),
            other => panic!("expected UnknownInvestor, got {other:?}"),
        }
    }

    #[test]
    fn operator_breakdown_is_a_flat_cut_with_signed_lines() {
        let mut snapshot = base_snapshot();
        snapshot.loss_stocks.push(LossStock {
            name: "Beta".to_string(),
            loss: dec!(200),
        });
        snapshot.not_won_stocks.push(NotWonStock {
            name: "Gamma".to_string(),
            cost: dec!(50),
        });
        snapshot.not_won_stocks.push(NotWonStock {
            name: "ZeroCost".to_string(),
            cost: Decimal::ZERO,
        });

        let engine = AllocationEngine::new();
        let breakdown = engine.operator_breakdown(&snapshot).unwrap();

        // The zero-cost not-won stock is omitted.
        assert_eq!(breakdown.lines.len(), 3);
        assert_eq!(breakdown.lines[0].outcome, dec!(1000));
        assert_eq!(breakdown.lines[0].share, dec!(400));
        assert_eq!(breakdown.lines[1].outcome, dec!(-200));
        assert_eq!(breakdown.lines[1].share, dec!(-80));
        assert_eq!(breakdown.lines[2].kind, StockKind::NotWon);
        assert_eq!(breakdown.lines[2].share, dec!(-20));

        let stats = engine.compute_stats(&snapshot).unwrap();
        assert_eq!(breakdown.total, stats.operator_profit);
    }

    #[test]
    fn investor_breakdown_total_matches_the_stats_share() {
        let mut snapshot = base_snapshot();
        snapshot.loss_stocks.push(LossStock {
            name: "Beta".to_string(),
            loss: dec!(200),
        });
        snapshot
            .profit_stocks
            .push(profit_stock("Delta", dec!(500), ApportionBasis::Special));
        snapshot.special_investors = vec![investor("B", dec!(150))];

        let engine = AllocationEngine::new();
        let stats = engine.compute_stats(&snapshot).unwrap();

        for share in &stats.investor_shares {
            let breakdown = engine.investor_breakdown(&snapshot, &share.name).unwrap();
            assert_eq!(breakdown.total, share.profit, "investor {}", share.name);
        }
    }

    #[test]
    fn investor_outside_special_set_gets_no_special_line() {
        let mut snapshot = base_snapshot();
        snapshot
            .profit_stocks
            .push(profit_stock("Delta", dec!(500), ApportionBasis::Special));
        snapshot.special_investors = vec![investor("B", dec!(150))];

        let breakdown = AllocationEngine::new()
            .investor_breakdown(&snapshot, "A")
            .unwrap();

        // A's zero share of the special stock is filtered out entirely.
        assert_eq!(breakdown.lines.len(), 1);
        assert_eq!(breakdown.lines[0].stock, "Alpha");
        assert!(!breakdown.lines[0].special_basis);

        let b = AllocationEngine::new()
            .investor_breakdown(&snapshot, "B")
            .unwrap();
        assert!(b.lines.iter().any(|l| l.special_basis));
    }
}
