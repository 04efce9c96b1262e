use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocksim_core::{DomainError, DomainResult, ProductId};

/// Kind of a stock movement (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Initial stock level, recorded before any flow activity.
    Opening,
    /// Stock received.
    Inflow,
    /// Stock issued.
    Outflow,
}

impl MovementKind {
    /// Sign applied to the stored quantity when accumulating balances.
    pub fn sign(self) -> i64 {
        match self {
            MovementKind::Opening | MovementKind::Inflow => 1,
            MovementKind::Outflow => -1,
        }
    }
}

/// A single stock movement (immutable once appended).
///
/// Quantities are stored unsigned; direction is derived from `kind`. This is
/// the exported record shape consumed by downstream storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Monotonically increasing within a log. Breaks ties between records
    /// sharing an `occurred_on` date.
    pub sequence_id: u64,
    pub product_id: ProductId,
    pub kind: MovementKind,
    /// Strictly positive for inflow/outflow. An opening quantity of zero is
    /// permitted: it records a level, not a flow.
    pub quantity: u32,
    /// Calendar date of the movement (business time).
    pub occurred_on: NaiveDate,
}

impl Movement {
    /// Signed contribution of this movement to the running balance.
    pub fn signed_quantity(&self) -> i64 {
        self.kind.sign() * i64::from(self.quantity)
    }
}

/// Append-only movement log.
///
/// Assigns `sequence_id`s at append time (starting at 1, +1 per record;
/// ids are never reused) and validates quantities before a record is
/// admitted. Records are immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementLog {
    movements: Vec<Movement>,
    next_sequence_id: u64,
}

impl MovementLog {
    pub fn new() -> Self {
        Self {
            movements: Vec::new(),
            next_sequence_id: 1,
        }
    }

    /// Append a movement, assigning the next sequence id.
    ///
    /// Rejects zero-quantity inflow/outflow records: flows that move nothing
    /// are not emitted.
    pub fn append(
        &mut self,
        product_id: ProductId,
        kind: MovementKind,
        quantity: u32,
        occurred_on: NaiveDate,
    ) -> DomainResult<()> {
        if quantity == 0 && kind != MovementKind::Opening {
            return Err(DomainError::invalid_parameter(
                "inflow/outflow quantity must be positive",
            ));
        }

        self.movements.push(Movement {
            sequence_id: self.next_sequence_id,
            product_id,
            kind,
            quantity,
            occurred_on,
        });
        self.next_sequence_id += 1;

        Ok(())
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn into_movements(self) -> Vec<Movement> {
        self.movements
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }
}

impl Default for MovementLog {
    fn default() -> Self {
        Self::new()
    }
}
