use serde::{Deserialize, Serialize};
use std::fmt;

/// Which investor-weight set apportions an instrument's investor-side proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApportionBasis {
    /// The original investment ratios. Used for everything except profit
    /// stocks flagged as post-cutoff.
    #[default]
    Normal,
    /// The revised (post-cutoff) investment ratios. Applies only to profit
    /// stocks explicitly flagged in the snapshot.
    Special,
}

impl fmt::Display for ApportionBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApportionBasis::Normal => write!(f, "normal"),
            ApportionBasis::Special => write!(f, "special"),
        }
    }
}

/// Which result list a breakdown line item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockKind {
    Profit,
    Loss,
    NotWon,
}
