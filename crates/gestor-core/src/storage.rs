use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The documents kept per business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Products,
    Movements,
    Expenses,
    TaxConfig,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Movements => "movements",
            Self::Expenses => "expenses",
            Self::TaxConfig => "tax_config",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document repository namespaced by business. Each `get`/`put` is atomic
/// for its key; there are no multi-key transactions.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(
        &self,
        business_id: &str,
        collection: Collection,
    ) -> anyhow::Result<Option<Value>>;

    async fn put(
        &self,
        business_id: &str,
        collection: Collection,
        document: Value,
    ) -> anyhow::Result<()>;
}
