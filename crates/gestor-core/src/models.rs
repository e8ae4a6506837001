use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::policy::{PricingPolicy, is_unit_fraction};

/// One existing catalog item as seen by the overhead proration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: Uuid,
    pub purchase_cost: Decimal,
    #[serde(default)]
    pub overhead_already_allocated: Decimal,
    pub current_stock: i64,
}

impl InventoryRecord {
    /// Stock below zero only shows up with corrupted movement data and
    /// counts as empty.
    pub fn valued_stock(&self) -> Decimal {
        Decimal::from(self.current_stock.max(0))
    }

    /// Landed unit cost; `None` when it does not fit in a `Decimal`.
    pub fn unit_value(&self) -> Option<Decimal> {
        self.purchase_cost.checked_add(self.overhead_already_allocated)
    }

    pub fn stock_value(&self) -> Option<Decimal> {
        let stock = self.valued_stock();
        if stock.is_zero() {
            return Some(Decimal::ZERO);
        }
        self.unit_value()?.checked_mul(stock)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    Salaries,
    Rent,
    Utilities,
    Supplies,
    Other(String),
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Salaries => "salaries",
            Self::Rent => "rent",
            Self::Utilities => "utilities",
            Self::Supplies => "supplies",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl From<&str> for ExpenseCategory {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "salaries" | "salary" | "salarios" | "sueldos" => Self::Salaries,
            "rent" | "alquiler" => Self::Rent,
            "utilities" | "servicios" => Self::Utilities,
            "supplies" | "insumos" => Self::Supplies,
            _ => Self::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for ExpenseCategory {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExpenseCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExpenseCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw))
    }
}

/// A persisted expense. `amount` is `None` when the stored value could not be
/// read as a number; such entries never reach the overhead pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedExpenseEntry {
    pub category: ExpenseCategory,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub surcharge_applied: bool,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Operator input for an expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftExpense {
    pub category: ExpenseCategory,
    pub raw_amount: Decimal,
    pub is_fixed: bool,
}

/// Tax rates configured for a business, as stored. Missing, unreadable or
/// out-of-range rates fall back to the policy defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxConfig {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub sales_tax_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub income_tax_rate: Option<Decimal>,
}

impl TaxConfig {
    pub fn new(sales_tax_rate: Decimal, income_tax_rate: Decimal) -> Self {
        Self {
            sales_tax_rate: Some(sales_tax_rate),
            income_tax_rate: Some(income_tax_rate),
        }
    }

    pub fn sales_rate(&self, policy: &PricingPolicy) -> Decimal {
        usable_rate(self.sales_tax_rate).unwrap_or(policy.default_sales_tax_rate)
    }

    pub fn income_rate(&self, policy: &PricingPolicy) -> Decimal {
        usable_rate(self.income_tax_rate).unwrap_or(policy.default_income_tax_rate)
    }
}

fn usable_rate(rate: Option<Decimal>) -> Option<Decimal> {
    rate.filter(|value| is_unit_fraction(*value))
}

/// The item being priced. Never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub purchase_price: Decimal,
    pub margin_percent: Decimal,
}

/// Whether the caller shows the engine's suggestion or a price the operator
/// typed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "price", rename_all = "snake_case")]
pub enum PriceMode {
    #[default]
    Suggested,
    ManualOverride(Decimal),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub purchase_cost: Decimal,
    pub overhead_allocated: Decimal,
    pub sale_price: Decimal,
    #[serde(default)]
    pub price_mode: PriceMode,
    pub created_at: DateTime<Utc>,
}

/// Reads a decimal from a JSON number or numeric string. Anything else,
/// including `null` and text like `"NaN"`, becomes `None`.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_decimal(&value))
}

pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal_str(&number.to_string()),
        Value::String(text) => parse_decimal_str(text),
        _ => None,
    }
}

fn parse_decimal_str(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}
