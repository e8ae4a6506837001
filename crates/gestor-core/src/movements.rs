use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    In,
    Out,
}

/// A stock entry or exit for one product. Current stock is never stored; it
/// is always derived from the movement log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub kind: MovementKind,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

impl StockMovement {
    pub fn new(product_id: Uuid, kind: MovementKind, quantity: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            kind,
            quantity,
            occurred_at: Utc::now(),
        }
    }

    /// Quantity with the sign of its direction. A stored quantity below one
    /// only comes from corrupted data and moves nothing.
    pub fn signed_quantity(&self) -> i64 {
        let quantity = self.quantity.max(0);
        match self.kind {
            MovementKind::In => quantity,
            MovementKind::Out => -quantity,
        }
    }
}
