use chrono::{DateTime, Utc};
use gestor_core::{PriceMode, Product};
use gestor_pricing::{PricingInput, PricingQuote};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A pricing snapshot as handed over by the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub business_id: Option<String>,
    #[serde(flatten)]
    pub input: PricingInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub business_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub total_inventory_value: Decimal,
    pub total_fixed_expenses: Decimal,
    pub quote: PricingQuote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub purchase_price: Decimal,
    pub margin_percent: Decimal,
    #[serde(default)]
    pub initial_quantity: i64,
    #[serde(default)]
    pub price_mode: PriceMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredProduct {
    pub product: Product,
    pub quote: PricingQuote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub business_id: String,
    pub generated_at: DateTime<Utc>,
    pub inventory_value: Decimal,
    pub total_fixed_expenses: Decimal,
    pub product_count: usize,
}
