//! Read-side reporting over movement histories.
//!
//! Builds disposable point-in-time balance read models from an immutable
//! movement log; never mutates its input.

pub mod snapshot;


pub use snapshot::{BalanceSummary, ProductBalance, StockBalanceProjection};
