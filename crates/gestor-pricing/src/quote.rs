use gestor_core::error::ensure_non_negative;
use gestor_core::{
    CandidateItem, FixedExpenseEntry, InventoryRecord, PriceMode, PricingError, PricingPolicy,
    TaxConfig,
};
use gestor_inventory::valuate_inventory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::overhead::{allocate_overhead, overhead_pool};
use crate::price::{
    TaxRates, compute_final_price, compute_landed_cost, compute_provisional_price, compute_taxes,
    round_currency,
};

/// Everything a quote depends on, captured before the engine runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    #[serde(default)]
    pub inventory_records: Vec<InventoryRecord>,
    #[serde(default)]
    pub fixed_expenses: Vec<FixedExpenseEntry>,
    #[serde(default)]
    pub tax_config: Option<TaxConfig>,
    pub candidate: CandidateItem,
    #[serde(default)]
    pub price_mode: PriceMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingQuote {
    pub allocated_overhead: Decimal,
    pub provisional_price: Decimal,
    pub sales_tax: Decimal,
    pub income_tax: Decimal,
    pub final_sale_price: Decimal,
    pub total_landed_cost: Decimal,
    /// The manual price when one was given, otherwise `final_sale_price`.
    pub effective_sale_price: Decimal,
    pub price_mode: PriceMode,
}

impl PricingQuote {
    /// Same quote with every amount rounded to cents.
    pub fn rounded(&self) -> Self {
        Self {
            allocated_overhead: round_currency(self.allocated_overhead),
            provisional_price: round_currency(self.provisional_price),
            sales_tax: round_currency(self.sales_tax),
            income_tax: round_currency(self.income_tax),
            final_sale_price: round_currency(self.final_sale_price),
            total_landed_cost: round_currency(self.total_landed_cost),
            effective_sale_price: round_currency(self.effective_sale_price),
            price_mode: self.price_mode,
        }
    }
}

pub fn quote(input: &PricingInput, policy: &PricingPolicy) -> Result<PricingQuote, PricingError> {
    let candidate = &input.candidate;
    let total_fixed_expenses = overhead_pool(&input.fixed_expenses)?;
    let total_inventory_value = valuate_inventory(&input.inventory_records)?;

    let allocated_overhead = allocate_overhead(
        candidate.purchase_price,
        total_fixed_expenses,
        total_inventory_value,
        policy,
    )?;
    let provisional_price = compute_provisional_price(
        candidate.purchase_price,
        allocated_overhead,
        candidate.margin_percent,
    )?;

    let rates = TaxRates::resolve(input.tax_config.as_ref(), policy);
    let taxes = compute_taxes(provisional_price, &rates)?;
    let final_sale_price =
        compute_final_price(provisional_price, taxes.sales_tax, taxes.income_tax)?;
    let total_landed_cost = compute_landed_cost(
        candidate.purchase_price,
        allocated_overhead,
        taxes.sales_tax,
        taxes.income_tax,
    )?;

    let effective_sale_price = match input.price_mode {
        PriceMode::Suggested => final_sale_price,
        PriceMode::ManualOverride(price) => ensure_non_negative("override_price", price)?,
    };

    Ok(PricingQuote {
        allocated_overhead,
        provisional_price,
        sales_tax: taxes.sales_tax,
        income_tax: taxes.income_tax,
        final_sale_price,
        total_landed_cost,
        effective_sale_price,
        price_mode: input.price_mode,
    })
}

/// A validated policy bundled with the quote pipeline.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    policy: PricingPolicy,
}

impl PricingEngine {
    pub fn new(policy: PricingPolicy) -> Result<Self, PricingError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn quote(&self, input: &PricingInput) -> Result<PricingQuote, PricingError> {
        quote(input, &self.policy)
    }
}
