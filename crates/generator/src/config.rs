use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocksim_core::{DomainError, DomainResult};

/// Trailing days reserved past the latest possible opening date, so the
/// post-opening movements have room before the window closes.
pub const OPENING_MARGIN_DAYS: i64 = 30;

/// Inclusive calendar window movements are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if end < start {
            return Err(DomainError::invalid_parameter(
                "date window end precedes start",
            ));
        }
        Ok(Self { start, end })
    }

    /// Number of days from start to end.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Tuning for one simulation run.
///
/// Reproducibility is a function of this configuration plus the product
/// processing order; no ambient state is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Opening stock level per product.
    pub opening_stock: u32,
    /// Target count of post-opening movements per product. Outflows drawn
    /// against empty stock are skipped, so fewer may be emitted.
    pub movements_per_product: u32,
    /// Inclusive quantity range for inflows. Minimum must be positive.
    pub inflow_range: (u32, u32),
    /// Upper bound on a single outflow; the available balance caps it further.
    pub outflow_cap: u32,
    /// Window all movement dates are drawn from.
    pub date_window: DateWindow,
    /// Seed for the run's random source.
    pub seed: u64,
}

impl SimulationConfig {
    /// Configuration covering one calendar year with the default tuning:
    /// opening stock 500, 30 movements per product, inflows of 20..=150,
    /// outflows capped at 120.
    pub fn sample_year(year: i32, seed: u64) -> DomainResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| DomainError::invalid_parameter("invalid calendar year"))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| DomainError::invalid_parameter("invalid calendar year"))?;

        Ok(Self {
            opening_stock: 500,
            movements_per_product: 30,
            inflow_range: (20, 150),
            outflow_cap: 120,
            date_window: DateWindow::new(start, end)?,
            seed,
        })
    }

    /// Validate the configuration before any movement is emitted.
    pub fn validate(&self) -> DomainResult<()> {
        if self.date_window.end < self.date_window.start {
            return Err(DomainError::invalid_parameter(
                "date window end precedes start",
            ));
        }
        if self.date_window.num_days() <= OPENING_MARGIN_DAYS {
            return Err(DomainError::invalid_parameter(format!(
                "date window must span more than {} days",
                OPENING_MARGIN_DAYS
            )));
        }

        let (min, max) = self.inflow_range;
        if min == 0 {
            return Err(DomainError::invalid_parameter(
                "inflow minimum must be positive",
            ));
        }
        if max < min {
            return Err(DomainError::invalid_parameter("inflow range is inverted"));
        }

        if self.outflow_cap == 0 {
            return Err(DomainError::invalid_parameter(
                "outflow cap must be positive",
            ));
        }

        Ok(())
    }
}
