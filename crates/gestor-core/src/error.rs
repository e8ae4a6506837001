use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures raised by the pricing engine. Each one blocks the
/// save that triggered it and is meant to be shown to the operator as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("margin must be below 100% (got {margin_percent}%)")]
    InvalidMargin { margin_percent: Decimal },

    #[error("{field} must be a non-negative amount within decimal range (got {value})")]
    InvalidAmount { field: &'static str, value: Decimal },

    #[error("invalid pricing policy: {0}")]
    InvalidPolicy(String),
}

impl PricingError {
    pub fn invalid_amount(field: &'static str, value: Decimal) -> Self {
        Self::InvalidAmount { field, value }
    }
}

/// Rejects negative amounts, returning the value unchanged otherwise.
pub fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<Decimal, PricingError> {
    if value < Decimal::ZERO {
        return Err(PricingError::invalid_amount(field, value));
    }
    Ok(value)
}

/// Adds up `terms`, reporting the term that pushed the total out of the
/// decimal range as an invalid `field`.
pub fn checked_total<I>(field: &'static str, terms: I) -> Result<Decimal, PricingError>
where
    I: IntoIterator<Item = Decimal>,
{
    terms.into_iter().try_fold(Decimal::ZERO, |total, term| {
        total
            .checked_add(term)
            .ok_or_else(|| PricingError::invalid_amount(field, term))
    })
}
