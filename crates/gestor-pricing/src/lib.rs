pub mod expenses;
pub mod overhead;
pub mod price;
pub mod quote;

pub use expenses::finalize_expense;
pub use overhead::{allocate_overhead, overhead_pool};
pub use price::{
    TaxEstimate, TaxRates, compute_final_price, compute_landed_cost, compute_provisional_price,
    compute_taxes, round_currency,
};
pub use quote::{PricingEngine, PricingInput, PricingQuote, quote};
