pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ApportionBasis, StockKind};
pub use structs::{Investor, LossStock, NotWonStock, ProfitStock, Snapshot};
