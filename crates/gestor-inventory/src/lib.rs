use std::collections::HashMap;

use gestor_core::error::checked_total;
use gestor_core::{InventoryRecord, PricingError, Product, StockMovement};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Units on hand for one product: everything that came in minus everything
/// that went out.
pub fn current_stock(movements: &[StockMovement], product_id: Uuid) -> i64 {
    movements
        .iter()
        .filter(|movement| movement.product_id == product_id)
        .fold(0i64, |acc, movement| acc.saturating_add(movement.signed_quantity()))
}

pub fn stock_levels(movements: &[StockMovement]) -> HashMap<Uuid, i64> {
    let mut levels: HashMap<Uuid, i64> = HashMap::new();
    for movement in movements {
        let level = levels.entry(movement.product_id).or_default();
        *level = level.saturating_add(movement.signed_quantity());
    }
    levels
}

/// Joins the catalog with its movement log into the snapshot the pricing
/// engine consumes. Movements for products no longer in the catalog are
/// ignored.
pub fn inventory_records(
    products: &[Product],
    movements: &[StockMovement],
) -> Vec<InventoryRecord> {
    let levels = stock_levels(movements);
    products
        .iter()
        .map(|product| InventoryRecord {
            id: product.id,
            purchase_cost: product.purchase_cost,
            overhead_already_allocated: product.overhead_allocated,
            current_stock: levels.get(&product.id).copied().unwrap_or(0),
        })
        .collect()
}

/// Value of everything on the shelves at landed unit cost. This is both the
/// overhead proration denominator and the dashboard's inventory figure.
pub fn valuate_inventory(records: &[InventoryRecord]) -> Result<Decimal, PricingError> {
    let values = records
        .iter()
        .map(|record| {
            record.stock_value().ok_or_else(|| {
                PricingError::invalid_amount("total_inventory_value", record.purchase_cost)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    checked_total("total_inventory_value", values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gestor_core::{MovementKind, PriceMode};
    use rust_decimal_macros::dec;

    fn product(purchase_cost: Decimal, overhead_allocated: Decimal) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "item".to_string(),
            purchase_cost,
            overhead_allocated,
            sale_price: purchase_cost,
            price_mode: PriceMode::Suggested,
            created_at: Utc::now(),
        }
    }

    fn record(stock: i64, cost: Decimal, overhead: Decimal) -> InventoryRecord {
        InventoryRecord {
            id: Uuid::new_v4(),
            purchase_cost: cost,
            overhead_already_allocated: overhead,
            current_stock: stock,
        }
    }

    #[test]
    fn stock_is_ins_minus_outs() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let movements = vec![
            StockMovement::new(id, MovementKind::In, 10),
            StockMovement::new(id, MovementKind::Out, 3),
            StockMovement::new(other, MovementKind::In, 7),
            StockMovement::new(id, MovementKind::In, 2),
        ];

        assert_eq!(current_stock(&movements, id), 9);
        assert_eq!(current_stock(&movements, other), 7);
        assert_eq!(current_stock(&movements, Uuid::new_v4()), 0);

        let levels = stock_levels(&movements);
        assert_eq!(levels.get(&id), Some(&9));
        assert_eq!(levels.get(&other), Some(&7));
    }

    #[test]
    fn empty_inventory_is_worth_nothing() {
        assert_eq!(valuate_inventory(&[]), Ok(Decimal::ZERO));
    }

    #[test]
    fn non_positive_stock_is_worth_nothing() {
        let records = vec![
            record(0, dec!(10), dec!(1)),
            record(-5, dec!(20), dec!(2)),
        ];
        assert_eq!(valuate_inventory(&records), Ok(Decimal::ZERO));
    }

    #[test]
    fn valuation_uses_cost_plus_allocated_overhead() {
        let records = vec![
            record(4, dec!(10), dec!(0.5)),
            record(-2, dec!(100), dec!(0)),
            record(1, dec!(20), dec!(0)),
        ];
        assert_eq!(valuate_inventory(&records), Ok(dec!(62)));
    }

    #[test]
    fn valuation_out_of_decimal_range_is_an_invalid_amount() {
        let huge = |digits: u32| Decimal::from_i128_with_scale(5 * 10i128.pow(digits), 0);

        let records = vec![record(1_000_000, huge(23), dec!(0))];
        assert!(matches!(
            valuate_inventory(&records),
            Err(PricingError::InvalidAmount {
                field: "total_inventory_value",
                ..
            })
        ));

        let records = vec![record(1, huge(28), dec!(0)), record(1, huge(28), dec!(0))];
        assert_eq!(
            valuate_inventory(&records),
            Err(PricingError::invalid_amount(
                "total_inventory_value",
                huge(28)
            ))
        );
    }

    #[test]
    fn records_join_catalog_with_movements() {
        let shirt = product(dec!(8), dec!(0.2));
        let mug = product(dec!(3), dec!(0));
        let movements = vec![
            StockMovement::new(shirt.id, MovementKind::In, 5),
            StockMovement::new(shirt.id, MovementKind::Out, 1),
            StockMovement::new(Uuid::new_v4(), MovementKind::In, 50),
        ];

        let records = inventory_records(&[shirt.clone(), mug.clone()], &movements);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, shirt.id);
        assert_eq!(records[0].current_stock, 4);
        assert_eq!(records[0].overhead_already_allocated, dec!(0.2));
        assert_eq!(records[1].current_stock, 0);
        assert_eq!(valuate_inventory(&records), Ok(dec!(32.8)));
    }
}
