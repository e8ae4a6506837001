pub mod error;
pub mod models;
pub mod movements;
pub mod policy;
pub mod storage;

pub use error::PricingError;
pub use models::{
    CandidateItem, DraftExpense, ExpenseCategory, FixedExpenseEntry, InventoryRecord, PriceMode,
    Product, TaxConfig,
};
pub use movements::{MovementKind, StockMovement};
pub use policy::PricingPolicy;
pub use storage::{Collection, RecordStore};
