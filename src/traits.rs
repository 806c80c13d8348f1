//! Traits for storage abstraction and extensibility
//!
//! The invoicing core never talks to the host platform directly; every
//! persistence concern sits behind one of these traits so the core can run
//! against any backend (the platform's option/metadata stores, a database,
//! or the in-memory implementation used for testing).

use async_trait::async_trait;

use crate::types::*;

/// Source of order data from the host platform
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Load an order by its identifier; `None` when it does not exist
    async fn get_order(&self, order_id: &str) -> InvoiceResult<Option<Order>>;
}

/// Source of per-product GST metadata (HSN code, explicit rate, tax class)
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// GST metadata for a product; `None` when the product is unknown
    async fn gst_metadata(&self, product_id: &str) -> InvoiceResult<Option<ProductGstMeta>>;
}

/// Per-order invoice metadata: the assigned number/date and the cached
/// jurisdiction determination
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// The invoice record persisted for an order, if any
    async fn invoice_record(&self, order_id: &str) -> InvoiceResult<Option<InvoiceRecord>>;

    /// Persist an invoice record unless the order already has one, and
    /// return whichever record is stored afterwards. The check and the
    /// write must be atomic per order, so concurrent allocators racing on
    /// the same order all observe a single winning record. Number and date
    /// are stored together; a half-written record is never observable.
    async fn save_invoice_record_if_absent(
        &self,
        order_id: &str,
        record: &InvoiceRecord,
    ) -> InvoiceResult<InvoiceRecord>;

    /// Remove an order's invoice record (administrative use only; the
    /// sequence counter is never rewound)
    async fn delete_invoice_record(&self, order_id: &str) -> InvoiceResult<()>;

    /// The cached inter-state flag for an order, if one was computed
    async fn cached_inter_state(&self, order_id: &str) -> InvoiceResult<Option<bool>>;

    /// Cache the inter-state determination so later renders and exports
    /// reuse it even if the order's tax lines change
    async fn cache_inter_state(&self, order_id: &str, is_inter_state: bool) -> InvoiceResult<()>;
}

/// The shared invoice-number counter.
///
/// `next_number` must be atomic with respect to concurrent callers: no two
/// allocations may ever observe the same value. Values start at 1, advance
/// by exactly 1 per call, and are never reused; a downstream failure after
/// a call leaves a gap in the sequence.
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Atomically fetch the current counter value and advance it by one
    async fn next_number(&self) -> InvoiceResult<u64>;

    /// The value the next allocation will receive, without advancing
    async fn current(&self) -> InvoiceResult<u64>;

    /// Reset the counter (administrative use, e.g. start of a fiscal year)
    async fn set_next(&self, value: u64) -> InvoiceResult<()>;
}

/// Merchant-level configuration held in the platform's option store
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Prefix prepended to every invoice number; empty by default
    async fn invoice_prefix(&self) -> InvoiceResult<String>;

    async fn set_invoice_prefix(&self, prefix: &str) -> InvoiceResult<()>;

    /// The merchant's own GST state code; `None` until configured
    async fn company_state_code(&self) -> InvoiceResult<Option<String>>;

    async fn set_company_state_code(&self, code: &str) -> InvoiceResult<()>;
}

/// Everything the invoice service needs from a backend, combined so the
/// service takes a single generic parameter
pub trait InvoiceBackend:
    OrderSource + ProductCatalog + InvoiceStore + SequenceStore + SettingsStore
{
}

impl<T> InvoiceBackend for T where
    T: OrderSource + ProductCatalog + InvoiceStore + SequenceStore + SettingsStore
{
}
