use core_types::ApportionBasis;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("inconsistent share split: operator {operator} + investor {investor} must sum to 1")]
    InconsistentShareSplit { operator: Decimal, investor: Decimal },

    #[error("cannot apportion on the {0} basis: its total investment is zero")]
    MissingDenominator(ApportionBasis),

    #[error("no investor named '{0}' in the pool")]
    UnknownInvestor(String),
}
