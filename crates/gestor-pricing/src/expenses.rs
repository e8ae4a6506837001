use chrono::Utc;
use gestor_core::error::ensure_non_negative;
use gestor_core::{DraftExpense, ExpenseCategory, FixedExpenseEntry, PricingError, PricingPolicy};
use rust_decimal::Decimal;

use crate::price::round_currency;

/// Turns operator input into the entry that gets stored. Salaries carry the
/// policy surcharge; the draft is consumed so the uplift cannot be applied a
/// second time to the same input.
pub fn finalize_expense(
    draft: DraftExpense,
    policy: &PricingPolicy,
) -> Result<FixedExpenseEntry, PricingError> {
    let raw_amount = ensure_non_negative("expense_amount", draft.raw_amount)?;

    let surcharge_applied = draft.category == ExpenseCategory::Salaries;
    let amount = if surcharge_applied {
        (Decimal::ONE + policy.salary_surcharge)
            .checked_mul(raw_amount)
            .ok_or_else(|| PricingError::invalid_amount("expense_amount", raw_amount))?
    } else {
        raw_amount
    };

    Ok(FixedExpenseEntry {
        category: draft.category,
        amount: Some(round_currency(amount)),
        is_fixed: draft.is_fixed,
        surcharge_applied,
        recorded_at: Some(Utc::now()),
    })
}
