use gestor_core::error::{checked_total, ensure_non_negative};
use gestor_core::{PricingError, PricingPolicy, TaxConfig};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Rounds to cents the way prices are shown to customers.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Price that leaves `margin_percent` of the sale as profit once the item's
/// cost and overhead share are covered. Margin is measured on the sale price,
/// not on cost.
pub fn compute_provisional_price(
    purchase_price: Decimal,
    allocated_overhead: Decimal,
    margin_percent: Decimal,
) -> Result<Decimal, PricingError> {
    if margin_percent >= Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidMargin { margin_percent });
    }
    ensure_non_negative("margin_percent", margin_percent)?;
    let purchase_price = ensure_non_negative("purchase_price", purchase_price)?;
    let allocated_overhead = ensure_non_negative("allocated_overhead", allocated_overhead)?;

    let base_cost = checked_total("purchase_price", [purchase_price, allocated_overhead])?;
    let kept_share = Decimal::ONE - margin_percent / Decimal::ONE_HUNDRED;
    base_cost
        .checked_div(kept_share)
        .ok_or_else(|| PricingError::invalid_amount("margin_percent", margin_percent))
}

/// Effective tax rates after falling back to the policy defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRates {
    pub sales: Decimal,
    pub income: Decimal,
}

impl TaxRates {
    pub fn resolve(config: Option<&TaxConfig>, policy: &PricingPolicy) -> Self {
        match config {
            Some(config) => Self {
                sales: config.sales_rate(policy),
                income: config.income_rate(policy),
            },
            None => Self {
                sales: policy.default_sales_tax_rate,
                income: policy.default_income_tax_rate,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEstimate {
    pub sales_tax: Decimal,
    pub income_tax: Decimal,
}

pub fn compute_taxes(
    provisional_price: Decimal,
    rates: &TaxRates,
) -> Result<TaxEstimate, PricingError> {
    let tax_at = |field: &'static str, rate: Decimal| {
        provisional_price
            .checked_mul(rate)
            .ok_or_else(|| PricingError::invalid_amount(field, provisional_price))
    };
    Ok(TaxEstimate {
        sales_tax: tax_at("sales_tax", rates.sales)?,
        income_tax: tax_at("income_tax", rates.income)?,
    })
}

pub fn compute_final_price(
    provisional_price: Decimal,
    sales_tax: Decimal,
    income_tax: Decimal,
) -> Result<Decimal, PricingError> {
    checked_total("final_sale_price", [provisional_price, sales_tax, income_tax])
}

pub fn compute_landed_cost(
    purchase_price: Decimal,
    allocated_overhead: Decimal,
    sales_tax: Decimal,
    income_tax: Decimal,
) -> Result<Decimal, PricingError> {
    checked_total(
        "total_landed_cost",
        [purchase_price, allocated_overhead, sales_tax, income_tax],
    )
}
