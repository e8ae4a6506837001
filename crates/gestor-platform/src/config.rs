use std::str::FromStr;

use anyhow::{Context, Result};
use gestor_core::PricingPolicy;
use rust_decimal::Decimal;

pub const FALLBACK_BASELINE_VAR: &str = "GESTOR_FALLBACK_BASELINE";
pub const SALARY_SURCHARGE_VAR: &str = "GESTOR_SALARY_SURCHARGE";
pub const DEFAULT_SALES_TAX_RATE_VAR: &str = "GESTOR_DEFAULT_SALES_TAX_RATE";
pub const DEFAULT_INCOME_TAX_RATE_VAR: &str = "GESTOR_DEFAULT_INCOME_TAX_RATE";
pub const BUSINESS_ID_VAR: &str = "GESTOR_BUSINESS_ID";

#[derive(Clone, Debug)]
pub struct PricingConfig {
    pub policy: PricingPolicy,
    pub business_id: Option<String>,
}

impl PricingConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep the policy
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PricingPolicy::default();
        let policy = PricingPolicy {
            fallback_baseline: decimal_var(&lookup, FALLBACK_BASELINE_VAR)?
                .unwrap_or(defaults.fallback_baseline),
            salary_surcharge: decimal_var(&lookup, SALARY_SURCHARGE_VAR)?
                .unwrap_or(defaults.salary_surcharge),
            default_sales_tax_rate: decimal_var(&lookup, DEFAULT_SALES_TAX_RATE_VAR)?
                .unwrap_or(defaults.default_sales_tax_rate),
            default_income_tax_rate: decimal_var(&lookup, DEFAULT_INCOME_TAX_RATE_VAR)?
                .unwrap_or(defaults.default_income_tax_rate),
        };
        policy.validate().context("pricing configuration is invalid")?;

        let business_id = lookup(BUSINESS_ID_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            policy,
            business_id,
        })
    }
}

fn decimal_var<F>(lookup: &F, key: &str) -> Result<Option<Decimal>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = Decimal::from_str(trimmed)
        .with_context(|| format!("{key} must be a decimal number, got {trimmed:?}"))?;
    Ok(Some(value))
}
