use std::collections::HashMap;

use async_trait::async_trait;
use gestor_core::{Collection, RecordStore};
use serde_json::Value;
use tokio::sync::RwLock;

/// Process-local record store. Documents are keyed by business and
/// collection and replaced wholesale on every `put`.
#[derive(Default)]
pub struct InMemoryRecordStore {
    documents: RwLock<HashMap<(String, Collection), Value>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn businesses(&self) -> Vec<String> {
        let documents = self.documents.read().await;
        let mut names: Vec<String> = documents
            .keys()
            .map(|(business, _)| business.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(
        &self,
        business_id: &str,
        collection: Collection,
    ) -> anyhow::Result<Option<Value>> {
        let documents = self.documents.read().await;
        Ok(documents.get(&(business_id.to_string(), collection)).cloned())
    }

    async fn put(
        &self,
        business_id: &str,
        collection: Collection,
        document: Value,
    ) -> anyhow::Result<()> {
        if business_id.trim().is_empty() {
            anyhow::bail!("business id must not be empty");
        }

        let mut documents = self.documents.write().await;
        documents.insert((business_id.to_string(), collection), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn documents_are_namespaced_by_business() {
        let store = InMemoryRecordStore::new();
        store
            .put("panaderia", Collection::Products, json!([{"name": "pan"}]))
            .await
            .unwrap();
        store
            .put("ferreteria", Collection::Products, json!([]))
            .await
            .unwrap();

        assert_eq!(
            store.get("panaderia", Collection::Products).await.unwrap(),
            Some(json!([{"name": "pan"}]))
        );
        assert_eq!(
            store.get("ferreteria", Collection::Products).await.unwrap(),
            Some(json!([]))
        );
        assert_eq!(store.get("panaderia", Collection::Expenses).await.unwrap(), None);
        assert_eq!(store.businesses().await, vec!["ferreteria", "panaderia"]);
    }

    #[tokio::test]
    async fn put_replaces_the_whole_document() {
        let store = InMemoryRecordStore::new();
        store
            .put("kiosco", Collection::TaxConfig, json!({"sales_tax_rate": "0.1"}))
            .await
            .unwrap();
        store
            .put("kiosco", Collection::TaxConfig, json!({"income_tax_rate": "0.2"}))
            .await
            .unwrap();

        assert_eq!(
            store.get("kiosco", Collection::TaxConfig).await.unwrap(),
            Some(json!({"income_tax_rate": "0.2"}))
        );
    }

    #[tokio::test]
    async fn blank_business_is_rejected() {
        let store = InMemoryRecordStore::new();
        assert!(store.put("  ", Collection::Products, json!([])).await.is_err());
    }
}
