use gestor_core::error::{checked_total, ensure_non_negative};
use gestor_core::{FixedExpenseEntry, PricingError, PricingPolicy};
use rust_decimal::Decimal;
use tracing::debug;

/// Sum of every fixed expense with a readable, non-negative amount.
/// Anything else is left out of the pool rather than failing the quote. A
/// pool too large for a `Decimal` is an invalid amount.
pub fn overhead_pool(entries: &[FixedExpenseEntry]) -> Result<Decimal, PricingError> {
    let amounts = entries
        .iter()
        .filter(|entry| entry.is_fixed)
        .filter_map(|entry| match entry.amount {
            Some(amount) if amount >= Decimal::ZERO => Some(amount),
            Some(amount) => {
                debug!(category = %entry.category, %amount, "skipping negative fixed expense");
                None
            }
            None => {
                debug!(category = %entry.category, "skipping fixed expense with unreadable amount");
                None
            }
        });
    checked_total("total_fixed_expenses", amounts)
}

/// Share of the overhead pool carried by an item, weighted by its purchase
/// value against the value of the whole inventory. An empty inventory is
/// measured against the policy's fallback baseline instead.
pub fn allocate_overhead(
    candidate_purchase_price: Decimal,
    total_fixed_expenses: Decimal,
    total_inventory_value: Decimal,
    policy: &PricingPolicy,
) -> Result<Decimal, PricingError> {
    let price = ensure_non_negative("purchase_price", candidate_purchase_price)?;
    let pool = ensure_non_negative("total_fixed_expenses", total_fixed_expenses)?;
    let inventory_value = ensure_non_negative("total_inventory_value", total_inventory_value)?;

    let denominator = if inventory_value > Decimal::ZERO {
        inventory_value
    } else {
        policy.fallback_baseline
    };

    let factor = price
        .checked_div(denominator)
        .ok_or_else(|| PricingError::invalid_amount("purchase_price", price))?;
    pool.checked_mul(factor)
        .ok_or_else(|| PricingError::invalid_amount("total_fixed_expenses", pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestor_core::ExpenseCategory;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn entry(amount: Option<Decimal>, is_fixed: bool) -> FixedExpenseEntry {
        FixedExpenseEntry {
            category: ExpenseCategory::Rent,
            amount,
            is_fixed,
            surcharge_applied: false,
            recorded_at: None,
        }
    }

    #[test]
    fn pool_only_counts_readable_fixed_amounts() {
        let entries = vec![
            entry(Some(dec!(800)), true),
            entry(Some(dec!(200)), true),
            entry(Some(dec!(999)), false),
            entry(None, true),
            entry(Some(dec!(-50)), true),
        ];
        assert_eq!(overhead_pool(&entries), Ok(dec!(1000)));
        assert_eq!(overhead_pool(&[]), Ok(Decimal::ZERO));
    }

    #[test]
    fn pool_beyond_decimal_range_is_an_invalid_amount() {
        let half = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        let entries = vec![entry(Some(half), true), entry(Some(half), true)];
        assert_eq!(
            overhead_pool(&entries),
            Err(PricingError::invalid_amount("total_fixed_expenses", half))
        );
    }

    #[test]
    fn allocation_beyond_decimal_range_is_an_invalid_amount() {
        let policy = PricingPolicy::default();
        assert!(matches!(
            allocate_overhead(Decimal::MAX, dec!(1000), dec!(0.0001), &policy),
            Err(PricingError::InvalidAmount {
                field: "purchase_price",
                ..
            })
        ));
        assert!(matches!(
            allocate_overhead(Decimal::MAX, Decimal::MAX, Decimal::ONE, &policy),
            Err(PricingError::InvalidAmount {
                field: "total_fixed_expenses",
                ..
            })
        ));
    }

    #[test]
    fn allocation_is_value_weighted() {
        let policy = PricingPolicy::default();
        let allocated = allocate_overhead(dec!(250), dec!(1000), dec!(5000), &policy).unwrap();
        assert_eq!(allocated, dec!(50));
    }

    #[test]
    fn empty_inventory_uses_fallback_baseline() {
        let policy = PricingPolicy::default();
        let allocated = allocate_overhead(dec!(50), dec!(1000), Decimal::ZERO, &policy).unwrap();
        assert_eq!(allocated, dec!(1000) * dec!(50) / dec!(100000));
        assert_eq!(allocated, dec!(0.5));
    }

    #[test]
    fn fallback_baseline_is_configurable() {
        let policy = PricingPolicy {
            fallback_baseline: dec!(10000),
            ..PricingPolicy::default()
        };
        let allocated = allocate_overhead(dec!(50), dec!(1000), Decimal::ZERO, &policy).unwrap();
        assert_eq!(allocated, dec!(5));
    }

    #[test]
    fn negative_inputs_are_rejected() {
        let policy = PricingPolicy::default();
        assert_eq!(
            allocate_overhead(dec!(-1), dec!(1000), dec!(10), &policy),
            Err(PricingError::invalid_amount("purchase_price", dec!(-1)))
        );
        assert!(matches!(
            allocate_overhead(dec!(1), dec!(-1000), dec!(10), &policy),
            Err(PricingError::InvalidAmount {
                field: "total_fixed_expenses",
                ..
            })
        ));
    }

    fn close(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() <= dec!(0.000000001)
    }

    proptest! {
        #[test]
        fn allocation_is_linear_in_purchase_price(
            price_cents in 0u32..=10_000_000,
            scale in 1u32..=50,
            pool_cents in 0u32..=100_000_000,
            inventory_cents in 1u32..=1_000_000_000,
        ) {
            let policy = PricingPolicy::default();
            let price = Decimal::new(price_cents.into(), 2);
            let pool = Decimal::new(pool_cents.into(), 2);
            let inventory = Decimal::new(inventory_cents.into(), 2);
            let k = Decimal::from(scale);

            let single = allocate_overhead(price, pool, inventory, &policy).unwrap();
            let scaled = allocate_overhead(price * k, pool, inventory, &policy).unwrap();
            prop_assert!(close(scaled, single * k), "{} vs {}", scaled, single * k);
        }

        #[test]
        fn allocation_is_linear_in_fixed_expenses(
            price_cents in 0u32..=10_000_000,
            scale in 1u32..=50,
            pool_cents in 0u32..=100_000_000,
            inventory_cents in 1u32..=1_000_000_000,
        ) {
            let policy = PricingPolicy::default();
            let price = Decimal::new(price_cents.into(), 2);
            let pool = Decimal::new(pool_cents.into(), 2);
            let inventory = Decimal::new(inventory_cents.into(), 2);
            let k = Decimal::from(scale);

            let single = allocate_overhead(price, pool, inventory, &policy).unwrap();
            let scaled = allocate_overhead(price, pool * k, inventory, &policy).unwrap();
            prop_assert!(close(scaled, single * k), "{} vs {}", scaled, single * k);
        }
    }
}
