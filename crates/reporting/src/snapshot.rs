use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocksim_core::{DomainError, DomainResult, ProductId};
use stocksim_movements::Movement;

/// Running-balance timeline for one product.
///
/// One entry per movement, ordered by `(occurred_on, sequence_id)`, carrying
/// the cumulative balance after that movement. Duplicate dates are fine: the
/// last entry at or before a query date wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct BalanceTimeline {
    entries: Vec<(NaiveDate, i64)>,
}

impl BalanceTimeline {
    fn balance_as_of(&self, as_of: NaiveDate) -> i64 {
        let idx = self.entries.partition_point(|(date, _)| *date <= as_of);
        if idx == 0 { 0 } else { self.entries[idx - 1].1 }
    }
}

/// Queryable balance row: one product's stock level as of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBalance {
    pub product_id: ProductId,
    pub balance: i64,
}

/// Fleet-level rollup of a point-in-time balance query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSummary {
    pub total_products: usize,
    pub stocked_products: usize,
    pub empty_products: usize,
    pub total_units: i64,
}

/// Point-in-time stock read model.
///
/// Built once over an immutable movement history, then queried for balances
/// as of arbitrary dates. Input order does not matter: each product's
/// partition is sorted by `(occurred_on, sequence_id)`, matching emission
/// order, before the running sums are materialized. The projection never
/// mutates the log; queries are pure and repeatable.
#[derive(Debug, Clone)]
pub struct StockBalanceProjection {
    timelines: HashMap<ProductId, BalanceTimeline>,
    /// When present, defines the complete known-product set and the
    /// `UnknownEntity` boundary. When absent, the log defines it.
    registry: Option<HashSet<ProductId>>,
}

impl StockBalanceProjection {
    /// Build from a movement history. Known products are those appearing in
    /// the log.
    pub fn from_movements(movements: &[Movement]) -> Self {
        Self {
            timelines: build_timelines(movements),
            registry: None,
        }
    }

    /// Build from a movement history against an explicit product registry.
    ///
    /// The registry defines the known-product set completely: query results
    /// carry one row per registered product (zero-history products included),
    /// and movements for unregistered products are rejected up front rather
    /// than silently dropped.
    pub fn with_registry(
        movements: &[Movement],
        registry: impl IntoIterator<Item = ProductId>,
    ) -> DomainResult<Self> {
        let registry: HashSet<ProductId> = registry.into_iter().collect();

        for movement in movements {
            if !registry.contains(&movement.product_id) {
                return Err(DomainError::unknown_entity(format!(
                    "movement {} references unregistered product {}",
                    movement.sequence_id, movement.product_id
                )));
            }
        }

        Ok(Self {
            timelines: build_timelines(movements),
            registry: Some(registry),
        })
    }

    /// Balance of one product as of a date: the running sum at the last
    /// movement dated at or before `as_of`, or 0 when there is none.
    ///
    /// Fails with `UnknownEntity` only when a registry was supplied and the
    /// product is not in it.
    pub fn balance_as_of(&self, product_id: &ProductId, as_of: NaiveDate) -> DomainResult<i64> {
        if let Some(registry) = &self.registry {
            if !registry.contains(product_id) {
                return Err(DomainError::unknown_entity(product_id.to_string()));
            }
        }

        Ok(self
            .timelines
            .get(product_id)
            .map_or(0, |timeline| timeline.balance_as_of(as_of)))
    }

    /// Balances of every known product as of a date, one row per product,
    /// zero-history products mapped to 0. Rows are ordered by product id.
    pub fn balances_as_of(&self, as_of: NaiveDate) -> Vec<ProductBalance> {
        let mut rows: Vec<ProductBalance> = self
            .known_products()
            .map(|product_id| ProductBalance {
                product_id,
                balance: self
                    .timelines
                    .get(&product_id)
                    .map_or(0, |timeline| timeline.balance_as_of(as_of)),
            })
            .collect();

        rows.sort_by_key(|row| *row.product_id.as_uuid().as_bytes());
        rows
    }

    /// Rollup across the whole fleet as of a date.
    pub fn summary_as_of(&self, as_of: NaiveDate) -> BalanceSummary {
        let rows = self.balances_as_of(as_of);
        let total_products = rows.len();
        let stocked_products = rows.iter().filter(|row| row.balance > 0).count();
        let total_units: i64 = rows.iter().map(|row| row.balance).sum();

        BalanceSummary {
            total_products,
            stocked_products,
            empty_products: total_products - stocked_products,
            total_units,
        }
    }

    /// The known products, ordered by id.
    pub fn products(&self) -> Vec<ProductId> {
        let mut products: Vec<ProductId> = self.known_products().collect();
        products.sort_by_key(|product_id| *product_id.as_uuid().as_bytes());
        products
    }

    fn known_products(&self) -> impl Iterator<Item = ProductId> + '_ {
        match &self.registry {
            Some(registry) => Box::new(registry.iter().copied())
                as Box<dyn Iterator<Item = ProductId> + '_>,
            None => Box::new(self.timelines.keys().copied()),
        }
    }
}

/// Partition by product, sort each partition by `(occurred_on, sequence_id)`,
/// and materialize the running signed sums.
fn build_timelines(movements: &[Movement]) -> HashMap<ProductId, BalanceTimeline> {
    let mut partitions: HashMap<ProductId, Vec<&Movement>> = HashMap::new();
    for movement in movements {
        partitions
            .entry(movement.product_id)
            .or_default()
            .push(movement);
    }

    let mut timelines = HashMap::with_capacity(partitions.len());
    for (product_id, mut partition) in partitions {
        partition.sort_by_key(|m| (m.occurred_on, m.sequence_id));

        let mut running = 0i64;
        let entries = partition
            .iter()
            .map(|movement| {
                running += movement.signed_quantity();
                (movement.occurred_on, running)
            })
            .collect();

        timelines.insert(product_id, BalanceTimeline { entries });
    }

    timelines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stocksim_movements::MovementKind;
    use uuid::Uuid;

    fn product(n: u128) -> ProductId {
        ProductId::from_uuid(Uuid::from_u128(n))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn movement(
        sequence_id: u64,
        product_id: ProductId,
        kind: MovementKind,
        quantity: u32,
        occurred_on: NaiveDate,
    ) -> Movement {
        Movement {
            sequence_id,
            product_id,
            kind,
            quantity,
            occurred_on,
        }
    }

    /// Opening 100 on day 1, inflow 50 on day 5, outflow 30 on day 10.
    fn sample_history(product_id: ProductId) -> Vec<Movement> {
        vec![
            movement(1, product_id, MovementKind::Opening, 100, day(1)),
            movement(2, product_id, MovementKind::Inflow, 50, day(5)),
            movement(3, product_id, MovementKind::Outflow, 30, day(10)),
        ]
    }

    #[test]
    fn balance_tracks_the_latest_movement_at_or_before_the_date() {
        let p1 = product(1);
        let projection = StockBalanceProjection::from_movements(&sample_history(p1));

        assert_eq!(projection.balance_as_of(&p1, day(3)).unwrap(), 100);
        assert_eq!(projection.balance_as_of(&p1, day(7)).unwrap(), 150);
        assert_eq!(projection.balance_as_of(&p1, day(10)).unwrap(), 120);
    }

    #[test]
    fn date_before_any_history_is_zero() {
        let p1 = product(1);
        let projection = StockBalanceProjection::from_movements(&sample_history(p1));

        let before = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(projection.balance_as_of(&p1, before).unwrap(), 0);
    }

    #[test]
    fn unknown_product_without_registry_defaults_to_zero() {
        let projection = StockBalanceProjection::from_movements(&sample_history(product(1)));
        assert_eq!(projection.balance_as_of(&product(99), day(10)).unwrap(), 0);
    }

    #[test]
    fn same_date_ties_resolve_by_sequence_id() {
        let p1 = product(1);
        let movements = vec![
            movement(1, p1, MovementKind::Opening, 10, day(1)),
            movement(2, p1, MovementKind::Inflow, 5, day(4)),
            movement(3, p1, MovementKind::Outflow, 8, day(4)),
        ];
        let projection = StockBalanceProjection::from_movements(&movements);

        // Both day-4 movements apply: 10 + 5 - 8.
        assert_eq!(projection.balance_as_of(&p1, day(4)).unwrap(), 7);
    }

    #[test]
    fn registry_defines_the_result_set() {
        let p1 = product(1);
        let p2 = product(2);
        let projection =
            StockBalanceProjection::with_registry(&sample_history(p1), [p1, p2]).unwrap();

        let rows = projection.balances_as_of(day(31));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ProductBalance { product_id: p1, balance: 120 });
        assert_eq!(rows[1], ProductBalance { product_id: p2, balance: 0 });
    }

    #[test]
    fn unregistered_product_query_fails() {
        let p1 = product(1);
        let projection =
            StockBalanceProjection::with_registry(&sample_history(p1), [p1]).unwrap();

        let err = projection.balance_as_of(&product(99), day(10)).unwrap_err();
        assert!(matches!(err, DomainError::UnknownEntity(_)));
    }

    #[test]
    fn movements_for_unregistered_products_are_rejected_up_front() {
        let err =
            StockBalanceProjection::with_registry(&sample_history(product(1)), [product(2)])
                .unwrap_err();
        assert!(matches!(err, DomainError::UnknownEntity(_)));
    }

    #[test]
    fn repeated_queries_return_equal_results() {
        let p1 = product(1);
        let projection = StockBalanceProjection::from_movements(&sample_history(p1));

        let first = projection.balances_as_of(day(10));
        let second = projection.balances_as_of(day(10));
        assert_eq!(first, second);
    }

    #[test]
    fn summary_rolls_up_the_fleet() {
        let p1 = product(1);
        let p2 = product(2);
        let mut movements = sample_history(p1);
        movements.push(movement(4, p2, MovementKind::Opening, 0, day(2)));

        let projection = StockBalanceProjection::from_movements(&movements);
        let summary = projection.summary_as_of(day(31));

        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.stocked_products, 1);
        assert_eq!(summary.empty_products, 1);
        assert_eq!(summary.total_units, 120);
    }

    fn two_product_history() -> Vec<Movement> {
        let p2 = product(2);
        let mut movements = sample_history(product(1));
        movements.extend([
            movement(4, p2, MovementKind::Opening, 40, day(2)),
            movement(5, p2, MovementKind::Outflow, 15, day(5)),
            movement(6, p2, MovementKind::Inflow, 5, day(5)),
        ]);
        movements
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the projection's output is independent of the input
        /// order of the log (partitioning + sorting restores emission order).
        #[test]
        fn input_order_does_not_matter(
            shuffled in Just(two_product_history()).prop_shuffle()
        ) {
            let baseline = StockBalanceProjection::from_movements(&two_product_history());
            let projection = StockBalanceProjection::from_movements(&shuffled);

            for d in [1, 2, 4, 5, 7, 10, 31] {
                prop_assert_eq!(
                    projection.balances_as_of(day(d)),
                    baseline.balances_as_of(day(d))
                );
            }
        }
    }
}
