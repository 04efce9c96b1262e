use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stocksim_core::{DomainResult, ProductId};
use stocksim_movements::{MovementKind, MovementLog};

use crate::config::{SimulationConfig, OPENING_MARGIN_DAYS};

/// Stock-constrained movement sequence generator.
///
/// One seeded [`StdRng`] drives the whole run; products are processed in
/// caller order. Draws are consumed per product in a fixed order: the opening
/// date, then the raw event dates, then kind and magnitude per date slot in
/// sorted order. A skipped outflow consumes its kind draw but no magnitude
/// draw and no sequence id. Re-running with the same configuration and
/// product order reproduces the log exactly.
#[derive(Debug, Clone)]
pub struct MovementGenerator {
    config: SimulationConfig,
}

impl MovementGenerator {
    pub fn new(config: SimulationConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Generate the movement history for every product, in slice order.
    ///
    /// Each product receives one opening followed by up to
    /// `movements_per_product` flow movements. An outflow drawn while no
    /// stock is available is dropped entirely rather than clamped; the
    /// running balance therefore never goes negative.
    pub fn generate(&self, products: &[ProductId]) -> DomainResult<MovementLog> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut log = MovementLog::new();
        let mut skipped_outflows = 0usize;

        for product_id in products {
            skipped_outflows += self.generate_for(&mut rng, &mut log, *product_id)?;
        }

        tracing::info!(
            products = products.len(),
            movements = log.len(),
            skipped_outflows,
            seed = self.config.seed,
            "movement generation complete"
        );

        Ok(log)
    }

    /// Generate one product's sequence. Returns the number of skipped
    /// outflows.
    fn generate_for(
        &self,
        rng: &mut StdRng,
        log: &mut MovementLog,
        product_id: ProductId,
    ) -> DomainResult<usize> {
        let window = self.config.date_window;

        // The opening is drawn from a sub-range ending before the window
        // does, so the remaining days can host the post-opening movements.
        let latest_opening = window.end - Duration::days(OPENING_MARGIN_DAYS);
        let opening_span = (latest_opening - window.start).num_days();
        let opening_date = window.start + Duration::days(rng.gen_range(0..=opening_span));

        // Event dates are drawn independently, then sorted: movements must be
        // emitted in non-decreasing date order for the running balance to be
        // meaningful. Duplicate dates are resolved by sequence id.
        let event_span = (window.end - opening_date).num_days();
        let mut event_dates: Vec<NaiveDate> = (0..self.config.movements_per_product)
            .map(|_| opening_date + Duration::days(rng.gen_range(0..=event_span)))
            .collect();
        event_dates.sort();

        log.append(
            product_id,
            MovementKind::Opening,
            self.config.opening_stock,
            opening_date,
        )?;
        let mut balance = i64::from(self.config.opening_stock);
        let mut skipped = 0usize;

        for occurred_on in event_dates {
            if rng.gen_bool(0.5) {
                let (min, max) = self.config.inflow_range;
                let quantity = rng.gen_range(min..=max);
                balance += i64::from(quantity);
                log.append(product_id, MovementKind::Inflow, quantity, occurred_on)?;
            } else {
                let max_allowed = i64::from(self.config.outflow_cap).min(balance);
                if max_allowed <= 0 {
                    // Not enough stock to issue anything: the outflow does
                    // not happen at all (no partial fulfillment).
                    tracing::debug!(
                        %product_id,
                        %occurred_on,
                        balance,
                        "outflow skipped, no stock available"
                    );
                    skipped += 1;
                    continue;
                }

                let quantity = rng.gen_range(1..=max_allowed as u32);
                balance -= i64::from(quantity);
                log.append(product_id, MovementKind::Outflow, quantity, occurred_on)?;
            }
        }

        Ok(skipped)
    }
}
