pub mod config;
pub mod contracts;

pub use config::PricingConfig;
pub use contracts::{
    DashboardSummary, ProductDraft, QuoteRequest, QuoteResponse, RegisteredProduct,
};
