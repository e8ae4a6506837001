use gestor_core::{Collection, PricingError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("product name must not be empty")]
    EmptyProductName,

    #[error("quantity must be positive (got {0})")]
    InvalidQuantity(i64),

    #[error("unknown product {0}")]
    UnknownProduct(Uuid),

    #[error("not enough stock for {product_id}: {available} on hand, {requested} requested")]
    InsufficientStock {
        product_id: Uuid,
        available: i64,
        requested: i64,
    },

    #[error("stored {collection} for {business_id} could not be read: {source}")]
    Document {
        business_id: String,
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("record store failure: {0:#}")]
    Store(anyhow::Error),
}
