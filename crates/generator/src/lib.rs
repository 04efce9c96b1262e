//! Synthetic movement sequence generator.
//!
//! Produces per-product stock movement histories whose running balance never
//! goes negative, reproducibly from an explicit seed.

pub mod config;
pub mod simulate;

pub use config::{DateWindow, SimulationConfig, OPENING_MARGIN_DAYS};
pub use simulate::MovementGenerator;
