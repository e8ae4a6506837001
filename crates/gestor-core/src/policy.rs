use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Hypothetical inventory size used as the proration denominator while the
/// catalog is still empty, so a first product does not absorb all overhead.
pub const FALLBACK_BASELINE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Uplift applied to salary expenses when they are persisted.
pub const SALARY_SURCHARGE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

pub const DEFAULT_SALES_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
pub const DEFAULT_INCOME_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Tunable constants of the pricing engine. `Default` carries the values the
/// shop has always used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub fallback_baseline: Decimal,
    pub salary_surcharge: Decimal,
    pub default_sales_tax_rate: Decimal,
    pub default_income_tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            fallback_baseline: FALLBACK_BASELINE,
            salary_surcharge: SALARY_SURCHARGE,
            default_sales_tax_rate: DEFAULT_SALES_TAX_RATE,
            default_income_tax_rate: DEFAULT_INCOME_TAX_RATE,
        }
    }
}

impl PricingPolicy {
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.fallback_baseline <= Decimal::ZERO {
            return Err(PricingError::InvalidPolicy(format!(
                "fallback baseline must be positive (got {})",
                self.fallback_baseline
            )));
        }
        if self.salary_surcharge < Decimal::ZERO {
            return Err(PricingError::InvalidPolicy(format!(
                "salary surcharge must not be negative (got {})",
                self.salary_surcharge
            )));
        }
        for (name, rate) in [
            ("default sales tax rate", self.default_sales_tax_rate),
            ("default income tax rate", self.default_income_tax_rate),
        ] {
            if !is_unit_fraction(rate) {
                return Err(PricingError::InvalidPolicy(format!(
                    "{name} must be between 0 and 1 (got {rate})"
                )));
            }
        }
        Ok(())
    }
}

pub fn is_unit_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_match_house_constants() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.fallback_baseline, dec!(100000));
        assert_eq!(policy.salary_surcharge, dec!(0.05));
        assert_eq!(policy.default_sales_tax_rate, dec!(0.10));
        assert_eq!(policy.default_income_tax_rate, dec!(0.10));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn zero_baseline_is_rejected() {
        let policy = PricingPolicy {
            fallback_baseline: Decimal::ZERO,
            ..PricingPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PricingError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn out_of_range_default_rate_is_rejected() {
        let policy = PricingPolicy {
            default_income_tax_rate: dec!(1.5),
            ..PricingPolicy::default()
        };
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("default income tax rate"));
    }
}
