//! Caller side of the pricing engine: reads a business's documents from a
//! [`RecordStore`], hands immutable snapshots to the engine and writes the
//! results back. Every operation finishes its reads and validation before
//! the first write, so a rejected input leaves the store untouched.

pub mod error;

use chrono::Utc;
use gestor_core::policy::is_unit_fraction;
use gestor_core::{
    CandidateItem, Collection, DraftExpense, FixedExpenseEntry, MovementKind, PriceMode,
    PricingError, Product, RecordStore, StockMovement, TaxConfig,
};
use gestor_inventory::{current_stock, inventory_records, valuate_inventory};
use gestor_platform::{DashboardSummary, ProductDraft, RegisteredProduct};
use gestor_pricing::{PricingEngine, PricingInput, PricingQuote, finalize_expense, overhead_pool};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

pub use error::DeskError;

pub struct Desk<S: RecordStore> {
    store: S,
    engine: PricingEngine,
}

impl<S: RecordStore> Desk<S> {
    pub fn new(store: S, engine: PricingEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// Gathers the pricing snapshot for `candidate` from the stored catalog,
    /// movements, expenses and tax configuration.
    pub async fn snapshot(
        &self,
        business_id: &str,
        candidate: CandidateItem,
        price_mode: PriceMode,
    ) -> Result<PricingInput, DeskError> {
        let products: Vec<Product> = self.load(business_id, Collection::Products).await?;
        let movements: Vec<StockMovement> = self.load(business_id, Collection::Movements).await?;

        Ok(PricingInput {
            inventory_records: inventory_records(&products, &movements),
            fixed_expenses: self.load_expenses(business_id).await?,
            tax_config: self.load_tax_config(business_id).await?,
            candidate,
            price_mode,
        })
    }

    pub async fn quote(
        &self,
        business_id: &str,
        candidate: CandidateItem,
        price_mode: PriceMode,
    ) -> Result<PricingQuote, DeskError> {
        let input = self.snapshot(business_id, candidate, price_mode).await?;
        Ok(self.engine.quote(&input)?)
    }

    /// Prices a new product against the current inventory, saves it with its
    /// overhead share and books the initial stock as an entry movement.
    pub async fn register_product(
        &self,
        business_id: &str,
        draft: ProductDraft,
    ) -> Result<RegisteredProduct, DeskError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(DeskError::EmptyProductName);
        }
        if draft.initial_quantity < 0 {
            return Err(DeskError::InvalidQuantity(draft.initial_quantity));
        }

        let mut products: Vec<Product> = self.load(business_id, Collection::Products).await?;
        let mut movements: Vec<StockMovement> =
            self.load(business_id, Collection::Movements).await?;
        let input = PricingInput {
            inventory_records: inventory_records(&products, &movements),
            fixed_expenses: self.load_expenses(business_id).await?,
            tax_config: self.load_tax_config(business_id).await?,
            candidate: CandidateItem {
                purchase_price: draft.purchase_price,
                margin_percent: draft.margin_percent,
            },
            price_mode: draft.price_mode,
        };
        let quote = self.engine.quote(&input)?.rounded();

        let product = Product {
            id: Uuid::new_v4(),
            name,
            purchase_cost: draft.purchase_price,
            overhead_allocated: quote.allocated_overhead,
            sale_price: quote.effective_sale_price,
            price_mode: draft.price_mode,
            created_at: Utc::now(),
        };
        // Movements are written first: if the product write then fails, the
        // orphan movement matches no catalog entry and is never valued.
        if draft.initial_quantity > 0 {
            movements.push(StockMovement::new(
                product.id,
                MovementKind::In,
                draft.initial_quantity,
            ));
            self.save(business_id, Collection::Movements, &movements).await?;
        }

        products.push(product.clone());
        self.save(business_id, Collection::Products, &products).await?;

        info!(
            "product {} registered for {business_id}: overhead={} price={}",
            product.id, quote.allocated_overhead, quote.effective_sale_price
        );
        Ok(RegisteredProduct { product, quote })
    }

    pub async fn record_movement(
        &self,
        business_id: &str,
        product_id: Uuid,
        kind: MovementKind,
        quantity: i64,
    ) -> Result<StockMovement, DeskError> {
        if quantity <= 0 {
            return Err(DeskError::InvalidQuantity(quantity));
        }

        let products: Vec<Product> = self.load(business_id, Collection::Products).await?;
        if !products.iter().any(|product| product.id == product_id) {
            return Err(DeskError::UnknownProduct(product_id));
        }

        let mut movements: Vec<StockMovement> =
            self.load(business_id, Collection::Movements).await?;
        if kind == MovementKind::Out {
            let available = current_stock(&movements, product_id);
            if quantity > available {
                return Err(DeskError::InsufficientStock {
                    product_id,
                    available,
                    requested: quantity,
                });
            }
        }

        let movement = StockMovement::new(product_id, kind, quantity);
        movements.push(movement.clone());
        self.save(business_id, Collection::Movements, &movements).await?;

        info!("{kind:?} movement of {quantity} recorded for product {product_id}");
        Ok(movement)
    }

    /// Persists an expense. This is the only place a draft is finalized, so a
    /// salary is uplifted exactly once per save.
    pub async fn record_expense(
        &self,
        business_id: &str,
        draft: DraftExpense,
    ) -> Result<FixedExpenseEntry, DeskError> {
        let mut entries: Vec<Value> = self.load(business_id, Collection::Expenses).await?;
        let entry = finalize_expense(draft, self.engine.policy())?;

        let document = serde_json::to_value(&entry).map_err(|source| DeskError::Document {
            business_id: business_id.to_string(),
            collection: Collection::Expenses,
            source,
        })?;
        entries.push(document);
        self.save(business_id, Collection::Expenses, &entries).await?;

        info!(
            "expense recorded for {business_id}: category={} amount={:?} surcharge={}",
            entry.category, entry.amount, entry.surcharge_applied
        );
        Ok(entry)
    }

    pub async fn set_tax_config(
        &self,
        business_id: &str,
        config: TaxConfig,
    ) -> Result<(), DeskError> {
        for (name, rate) in [
            ("sales tax rate", config.sales_tax_rate),
            ("income tax rate", config.income_tax_rate),
        ] {
            if let Some(rate) = rate.filter(|rate| !is_unit_fraction(*rate)) {
                return Err(PricingError::InvalidPolicy(format!(
                    "{name} must be between 0 and 1 (got {rate})"
                ))
                .into());
            }
        }

        self.save(business_id, Collection::TaxConfig, &config).await
    }

    pub async fn dashboard(&self, business_id: &str) -> Result<DashboardSummary, DeskError> {
        let products: Vec<Product> = self.load(business_id, Collection::Products).await?;
        let movements: Vec<StockMovement> = self.load(business_id, Collection::Movements).await?;
        let expenses = self.load_expenses(business_id).await?;

        Ok(DashboardSummary {
            business_id: business_id.to_string(),
            generated_at: Utc::now(),
            inventory_value: valuate_inventory(&inventory_records(&products, &movements))?,
            total_fixed_expenses: overhead_pool(&expenses)?,
            product_count: products.len(),
        })
    }

    async fn load<T>(&self, business_id: &str, collection: Collection) -> Result<T, DeskError>
    where
        T: DeserializeOwned + Default,
    {
        let document = self
            .store
            .get(business_id, collection)
            .await
            .map_err(DeskError::Store)?;

        match document {
            None | Some(Value::Null) => Ok(T::default()),
            Some(document) => {
                serde_json::from_value(document).map_err(|source| DeskError::Document {
                    business_id: business_id.to_string(),
                    collection,
                    source,
                })
            }
        }
    }

    async fn save<T>(
        &self,
        business_id: &str,
        collection: Collection,
        value: &T,
    ) -> Result<(), DeskError>
    where
        T: Serialize + ?Sized,
    {
        let document = serde_json::to_value(value).map_err(|source| DeskError::Document {
            business_id: business_id.to_string(),
            collection,
            source,
        })?;
        self.store
            .put(business_id, collection, document)
            .await
            .map_err(DeskError::Store)
    }

    /// Entries that cannot be read at all are dropped with a warning; entries
    /// with an unreadable amount are kept and skipped by the overhead pool.
    async fn load_expenses(&self, business_id: &str) -> Result<Vec<FixedExpenseEntry>, DeskError> {
        let raw: Vec<Value> = self.load(business_id, Collection::Expenses).await?;
        let mut entries = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<FixedExpenseEntry>(value) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!("skipping expense #{index} of {business_id}: {err}"),
            }
        }
        Ok(entries)
    }

    /// A tax document that does not parse counts as absent, which puts both
    /// rates on their defaults.
    async fn load_tax_config(&self, business_id: &str) -> Result<Option<TaxConfig>, DeskError> {
        let document = self
            .store
            .get(business_id, Collection::TaxConfig)
            .await
            .map_err(DeskError::Store)?;

        let Some(document) = document else {
            return Ok(None);
        };
        match serde_json::from_value::<TaxConfig>(document) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                warn!("ignoring unreadable tax config of {business_id}: {err}");
                Ok(None)
            }
        }
    }
}
