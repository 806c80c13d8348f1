//! In-memory storage implementation for testing
//!
//! Implements every backend trait over `Arc<RwLock<HashMap>>` maps. The
//! sequence counter sits behind its own mutex so `next_number` is an
//! atomic read-increment, which is what upholds the uniqueness invariant
//! under concurrent allocation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::traits::*;
use crate::types::*;

const PREFIX_KEY: &str = "invoice_prefix";
const STATE_CODE_KEY: &str = "company_state_code";

/// In-memory storage implementation for testing and development
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    orders: Arc<RwLock<HashMap<String, Order>>>,
    products: Arc<RwLock<HashMap<String, ProductGstMeta>>>,
    invoices: Arc<RwLock<HashMap<String, InvoiceRecord>>>,
    inter_state: Arc<RwLock<HashMap<String, bool>>>,
    settings: Arc<RwLock<HashMap<String, String>>>,
    next_number: Arc<Mutex<u64>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance with the counter at 1
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
            products: Arc::new(RwLock::new(HashMap::new())),
            invoices: Arc::new(RwLock::new(HashMap::new())),
            inter_state: Arc::new(RwLock::new(HashMap::new())),
            settings: Arc::new(RwLock::new(HashMap::new())),
            next_number: Arc::new(Mutex::new(1)),
        }
    }

    /// Register an order (what the platform would hand to the hooks)
    pub fn insert_order(&self, order: Order) {
        self.orders
            .write()
            .unwrap()
            .insert(order.id.clone(), order);
    }

    /// Register product GST metadata
    pub fn insert_product_meta(&self, product_id: &str, meta: ProductGstMeta) {
        self.products
            .write()
            .unwrap()
            .insert(product_id.to_string(), meta);
    }

    /// Convenience setter mirroring `SettingsStore::set_invoice_prefix`
    pub fn set_invoice_prefix(&self, prefix: &str) {
        self.settings
            .write()
            .unwrap()
            .insert(PREFIX_KEY.to_string(), prefix.to_string());
    }

    /// Convenience setter mirroring `SettingsStore::set_company_state_code`
    pub fn set_company_state_code(&self, code: &str) {
        self.settings
            .write()
            .unwrap()
            .insert(STATE_CODE_KEY.to_string(), code.to_string());
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.orders.write().unwrap().clear();
        self.products.write().unwrap().clear();
        self.invoices.write().unwrap().clear();
        self.inter_state.write().unwrap().clear();
        self.settings.write().unwrap().clear();
        *self.next_number.lock().unwrap() = 1;
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderSource for MemoryStorage {
    async fn get_order(&self, order_id: &str) -> InvoiceResult<Option<Order>> {
        Ok(self.orders.read().unwrap().get(order_id).cloned())
    }
}

#[async_trait]
impl ProductCatalog for MemoryStorage {
    async fn gst_metadata(&self, product_id: &str) -> InvoiceResult<Option<ProductGstMeta>> {
        Ok(self.products.read().unwrap().get(product_id).cloned())
    }
}

#[async_trait]
impl InvoiceStore for MemoryStorage {
    async fn invoice_record(&self, order_id: &str) -> InvoiceResult<Option<InvoiceRecord>> {
        Ok(self.invoices.read().unwrap().get(order_id).cloned())
    }

    async fn save_invoice_record_if_absent(
        &self,
        order_id: &str,
        record: &InvoiceRecord,
    ) -> InvoiceResult<InvoiceRecord> {
        // Check and insert under one write lock so racing allocators for
        // the same order all settle on the first record stored
        let mut invoices = self.invoices.write().unwrap();
        Ok(invoices
            .entry(order_id.to_string())
            .or_insert_with(|| record.clone())
            .clone())
    }

    async fn delete_invoice_record(&self, order_id: &str) -> InvoiceResult<()> {
        self.invoices.write().unwrap().remove(order_id);
        Ok(())
    }

    async fn cached_inter_state(&self, order_id: &str) -> InvoiceResult<Option<bool>> {
        Ok(self.inter_state.read().unwrap().get(order_id).copied())
    }

    async fn cache_inter_state(&self, order_id: &str, is_inter_state: bool) -> InvoiceResult<()> {
        self.inter_state
            .write()
            .unwrap()
            .insert(order_id.to_string(), is_inter_state);
        Ok(())
    }
}

#[async_trait]
impl SequenceStore for MemoryStorage {
    async fn next_number(&self) -> InvoiceResult<u64> {
        // Read and increment under one lock; concurrent callers serialize here
        let mut counter = self.next_number.lock().unwrap();
        let allocated = *counter;
        *counter += 1;
        Ok(allocated)
    }

    async fn current(&self) -> InvoiceResult<u64> {
        Ok(*self.next_number.lock().unwrap())
    }

    async fn set_next(&self, value: u64) -> InvoiceResult<()> {
        if value == 0 {
            return Err(InvoiceError::Validation(
                "Invoice sequence must start at 1 or higher".to_string(),
            ));
        }
        *self.next_number.lock().unwrap() = value;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MemoryStorage {
    async fn invoice_prefix(&self) -> InvoiceResult<String> {
        Ok(self
            .settings
            .read()
            .unwrap()
            .get(PREFIX_KEY)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_invoice_prefix(&self, prefix: &str) -> InvoiceResult<()> {
        self.set_invoice_prefix(prefix);
        Ok(())
    }

    async fn company_state_code(&self) -> InvoiceResult<Option<String>> {
        Ok(self.settings.read().unwrap().get(STATE_CODE_KEY).cloned())
    }

    async fn set_company_state_code(&self, code: &str) -> InvoiceResult<()> {
        self.set_company_state_code(code);
        Ok(())
    }
}
