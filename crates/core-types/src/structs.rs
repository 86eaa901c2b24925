use crate::enums::ApportionBasis;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A subscription that was allotted and closed with a profit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitStock {
    pub name: String,
    /// Realized revenue, always non-negative.
    pub revenue: Decimal,
    /// The snapshot file flags post-cutoff stocks with a `special_investors`
    /// boolean; in memory that flag is the `ApportionBasis` variant so the
    /// apportionment rule is a single lookup instead of a scattered branch.
    #[serde(rename = "special_investors", default, with = "basis_flag")]
    pub basis: ApportionBasis,
}

/// A subscription that was allotted and closed with a loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossStock {
    pub name: String,
    /// Loss magnitude, always non-negative. The sign is implied by list
    /// membership, never encoded in the value.
    pub loss: Decimal,
}

/// A subscription that was not allotted; it incurs a cost with no
/// offsetting revenue. The cost may be zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotWonStock {
    pub name: String,
    pub cost: Decimal,
}

/// One stakeholder's contribution under a given investor-weight set.
///
/// The same shape serves the Normal set (`Snapshot::investors`) and the
/// Special set (`Snapshot::special_investors`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investor {
    pub name: String,
    pub investment: Decimal,
}

/// The immutable input to every allocation computation.
///
/// Loaded once from the snapshot file and never mutated afterwards. List
/// order is preserved wherever it surfaces (stats rows, breakdown lines).
///
/// Every name in `special_investors` must also appear in `investors`; a
/// Normal-set investor absent from the Special set receives no share of
/// special-basis stocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Export timestamp of the snapshot, display-only.
    pub generated_at: String,
    /// The operator's fraction of every instrument's net result.
    pub operator_share: Decimal,
    /// The investor pool's fraction. Must sum to 1 with `operator_share`.
    pub investor_share: Decimal,
    pub profit_stocks: Vec<ProfitStock>,
    pub loss_stocks: Vec<LossStock>,
    pub not_won_stocks: Vec<NotWonStock>,
    /// The Normal set: original (pre-cutoff) investment amounts.
    pub investors: Vec<Investor>,
    /// The Special set: revised (post-cutoff) investment amounts.
    pub special_investors: Vec<Investor>,
}

impl Snapshot {
    /// Total investment of the Normal set.
    pub fn total_investment(&self) -> Decimal {
        self.investors.iter().map(|i| i.investment).sum()
    }

    /// Total investment of the Special set.
    pub fn special_total_investment(&self) -> Decimal {
        self.special_investors.iter().map(|i| i.investment).sum()
    }

    /// Looks up a Normal-set investor by name.
    pub fn investor(&self, name: &str) -> Option<&Investor> {
        self.investors.iter().find(|i| i.name == name)
    }

    /// Looks up a Special-set investor by name.
    pub fn special_investor(&self, name: &str) -> Option<&Investor> {
        self.special_investors.iter().find(|i| i.name == name)
    }
}

/// Serde adapter between the wire-level `special_investors` boolean and the
/// in-memory `ApportionBasis` variant.
mod basis_flag {
    use super::ApportionBasis;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(basis: &ApportionBasis, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(matches!(*basis, ApportionBasis::Special))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ApportionBasis, D::Error>
    where
        D: Deserializer<'de>,
    {
        let flagged = bool::deserialize(deserializer)?;
        Ok(if flagged {
            ApportionBasis::Special
        } else {
            ApportionBasis::Normal
        })
    }
}
