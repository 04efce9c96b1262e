//! Stock movement domain module.
//!
//! This crate contains the movement event model, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod movement;

pub use movement::{Movement, MovementKind, MovementLog};
