//! Demonstration driver: generate a synthetic movement history for a small
//! product catalog and report point-in-time stock positions.
//!
//! Persistence and presentation are downstream concerns; this binary only
//! wires the generator to the reporting side and logs what it finds.

use anyhow::Result;

use stocksim_core::ProductId;
use stocksim_generator::{MovementGenerator, SimulationConfig};
use stocksim_reporting::StockBalanceProjection;

const CATALOG_SIZE: usize = 20;

fn main() -> Result<()> {
    stocksim_observability::init();

    let config = SimulationConfig::sample_year(2024, 42)?;
    let products: Vec<ProductId> = (0..CATALOG_SIZE).map(|_| ProductId::new()).collect();

    let generator = MovementGenerator::new(config.clone())?;
    let log = generator.generate(&products)?;

    let projection = StockBalanceProjection::with_registry(log.movements(), products)?;

    let mid_year = config.date_window.start + chrono::Duration::days(182);
    for as_of in [mid_year, config.date_window.end] {
        let summary = projection.summary_as_of(as_of);
        tracing::info!(
            %as_of,
            products = summary.total_products,
            stocked = summary.stocked_products,
            empty = summary.empty_products,
            total_units = summary.total_units,
            "stock position"
        );
    }

    Ok(())
}
