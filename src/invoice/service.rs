//! Invoice service: idempotent number allocation and order tax breakdowns
//!
//! The service is the entry point the host platform wires its order hooks
//! into. Allocation is idempotent per order and draws numbers from the
//! backend's atomic sequence counter, so concurrent hook invocations can
//! never hand out a duplicate.

use tracing::{debug, info};

use crate::tax::{aggregator, jurisdiction, RateClassifier};
use crate::traits::*;
use crate::types::*;

/// Orchestrates invoice numbering and tax computation over a storage backend
pub struct InvoiceService<S: InvoiceBackend> {
    storage: S,
    classifier: RateClassifier<S>,
}

impl<S: InvoiceBackend + Clone> InvoiceService<S> {
    /// Create a service over the given backend
    pub fn new(storage: S) -> Self {
        let classifier = RateClassifier::new(storage.clone());
        Self {
            storage,
            classifier,
        }
    }
}

impl<S: InvoiceBackend> InvoiceService<S> {
    /// React to an order reaching a new status (creation or transition).
    ///
    /// Returns `Ok(None)` for statuses that do not trigger invoicing;
    /// otherwise allocates (or returns the existing) invoice number. The
    /// idempotency check makes repeated transitions into
    /// processing/completed harmless.
    pub async fn handle_order_event(
        &self,
        order_id: &str,
        new_status: OrderStatus,
    ) -> InvoiceResult<Option<String>> {
        if !new_status.triggers_invoicing() {
            debug!(order_id, status = new_status.slug(), "status does not trigger invoicing");
            return Ok(None);
        }
        self.allocate_invoice(order_id).await.map(Some)
    }

    /// Allocate an invoice number for an order, regardless of status.
    ///
    /// Idempotent: an order that already has a number gets the same number
    /// back with no counter advance. An unloadable order yields
    /// [`InvoiceError::OrderNotFound`] and no allocation.
    pub async fn allocate_invoice(&self, order_id: &str) -> InvoiceResult<String> {
        let order = self
            .storage
            .get_order(order_id)
            .await?
            .ok_or_else(|| InvoiceError::OrderNotFound(order_id.to_string()))?;
        self.allocate_for(&order).await
    }

    async fn allocate_for(&self, order: &Order) -> InvoiceResult<String> {
        if let Some(existing) = self.storage.invoice_record(&order.id).await? {
            debug!(order_id = %order.id, number = %existing.number, "invoice number already assigned");
            return Ok(existing.number);
        }

        let prefix = self.storage.invoice_prefix().await?;
        let sequence = self.storage.next_number().await?;
        let number = format!("{}{:06}", prefix, sequence);

        // Number and date are persisted in one conditional write. If another
        // allocation won the race for this order in the meantime, the stored
        // record stands and the drawn number becomes a gap in the sequence.
        let record = InvoiceRecord {
            number,
            date: chrono::Utc::now().date_naive(),
        };
        let stored = self
            .storage
            .save_invoice_record_if_absent(&order.id, &record)
            .await?;

        if stored.number == record.number {
            info!(order_id = %order.id, number = %stored.number, "allocated invoice number");
        } else {
            debug!(
                order_id = %order.id,
                number = %stored.number,
                "lost allocation race, returning stored number"
            );
        }
        Ok(stored.number)
    }

    /// Allocate invoice numbers for many orders, continuing past
    /// individual failures (bulk download / export path)
    pub async fn allocate_batch(&self, order_ids: &[String]) -> BatchAllocation {
        let mut report = BatchAllocation::default();
        for order_id in order_ids {
            match self.allocate_invoice(order_id).await {
                Ok(number) => report.allocated.push((order_id.clone(), number)),
                Err(err) => report.failed.push((order_id.clone(), err.to_string())),
            }
        }
        info!(
            succeeded = report.succeeded(),
            failed = report.failed.len(),
            "bulk allocation finished"
        );
        report
    }

    /// The invoice record persisted for an order, if any
    pub async fn invoice_record(&self, order_id: &str) -> InvoiceResult<Option<InvoiceRecord>> {
        self.storage.invoice_record(order_id).await
    }

    /// Whether the order is taxed inter-state (IGST) or intra-state
    /// (CGST/SGST).
    ///
    /// Resolved once per order and cached, so later renders and exports
    /// stay consistent even if the order's tax lines become unavailable.
    pub async fn is_inter_state(&self, order: &Order) -> InvoiceResult<bool> {
        if let Some(cached) = self.storage.cached_inter_state(&order.id).await? {
            return Ok(cached);
        }

        let company_code = self.storage.company_state_code().await?;
        let is_inter_state = jurisdiction::resolve(order, company_code.as_deref());
        self.storage
            .cache_inter_state(&order.id, is_inter_state)
            .await?;
        debug!(order_id = %order.id, is_inter_state, "cached jurisdiction determination");
        Ok(is_inter_state)
    }

    /// Per-rate tax breakdown for an order loaded by id
    pub async fn get_tax_breakdown(&self, order_id: &str) -> InvoiceResult<TaxBreakdown> {
        let order = self
            .storage
            .get_order(order_id)
            .await?
            .ok_or_else(|| InvoiceError::OrderNotFound(order_id.to_string()))?;
        self.get_tax_breakdown_for(&order).await
    }

    /// Per-rate tax breakdown for an already-loaded order
    pub async fn get_tax_breakdown_for(&self, order: &Order) -> InvoiceResult<TaxBreakdown> {
        let is_inter_state = self.is_inter_state(order).await?;
        aggregator::aggregate(&order.line_items, &self.classifier, is_inter_state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;
    use bigdecimal::BigDecimal;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order::new(id.to_string(), status)
    }

    fn service_with(storage: &MemoryStorage) -> InvoiceService<MemoryStorage> {
        InvoiceService::new(storage.clone())
    }

    #[tokio::test]
    async fn test_allocation_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.insert_order(order("1001", OrderStatus::Processing));
        let service = service_with(&storage);

        let first = service.allocate_invoice("1001").await.unwrap();
        let second = service.allocate_invoice("1001").await.unwrap();

        assert_eq!(first, "000001");
        assert_eq!(first, second);
        // Counter advanced exactly once
        assert_eq!(storage.current().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_numbers_are_sequential_with_prefix() {
        let storage = MemoryStorage::new();
        storage.set_invoice_prefix("INV-");
        for i in 1..=3 {
            storage.insert_order(order(&format!("{}", 1000 + i), OrderStatus::Completed));
        }
        let service = service_with(&storage);

        assert_eq!(service.allocate_invoice("1001").await.unwrap(), "INV-000001");
        assert_eq!(service.allocate_invoice("1002").await.unwrap(), "INV-000002");
        assert_eq!(service.allocate_invoice("1003").await.unwrap(), "INV-000003");
    }

    #[tokio::test]
    async fn test_event_skips_non_invoicing_status() {
        let storage = MemoryStorage::new();
        storage.insert_order(order("1001", OrderStatus::Pending));
        let service = service_with(&storage);

        let result = service
            .handle_order_event("1001", OrderStatus::Pending)
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(storage.invoice_record("1001").await.unwrap().is_none());
        assert_eq!(storage.current().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_event_allocates_on_processing() {
        let storage = MemoryStorage::new();
        storage.insert_order(order("1001", OrderStatus::Processing));
        let service = service_with(&storage);

        let number = service
            .handle_order_event("1001", OrderStatus::Processing)
            .await
            .unwrap();
        assert_eq!(number.as_deref(), Some("000001"));

        // A later transition to completed reuses the same number
        let again = service
            .handle_order_event("1001", OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(again.as_deref(), Some("000001"));
        assert_eq!(storage.current().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_order_is_a_failure_without_allocation() {
        let storage = MemoryStorage::new();
        let service = service_with(&storage);

        let result = service.allocate_invoice("nope").await;
        assert!(matches!(result, Err(InvoiceError::OrderNotFound(_))));
        assert_eq!(storage.current().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_manual_allocation_ignores_status() {
        let storage = MemoryStorage::new();
        storage.insert_order(order("1001", OrderStatus::Pending));
        let service = service_with(&storage);

        // Administrative allocation works for any status
        let number = service.allocate_invoice("1001").await.unwrap();
        assert_eq!(number, "000001");
    }

    #[tokio::test]
    async fn test_batch_continues_past_failures() {
        let storage = MemoryStorage::new();
        storage.insert_order(order("1001", OrderStatus::Completed));
        storage.insert_order(order("1003", OrderStatus::Completed));
        let service = service_with(&storage);

        let ids = vec![
            "1001".to_string(),
            "1002".to_string(),
            "1003".to_string(),
        ];
        let report = service.allocate_batch(&ids).await;

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_complete());
        assert_eq!(report.failed[0].0, "1002");
        // The missing order did not consume a sequence value
        assert_eq!(report.allocated[0].1, "000001");
        assert_eq!(report.allocated[1].1, "000002");
    }

    #[tokio::test]
    async fn test_jurisdiction_cache_survives_tax_line_changes() {
        let storage = MemoryStorage::new();
        let mut o = order("1001", OrderStatus::Completed);
        o.tax_lines = vec![
            TaxLine {
                rate_name: "CGST 9%".to_string(),
                amount: BigDecimal::from(90),
            },
            TaxLine {
                rate_name: "SGST 9%".to_string(),
                amount: BigDecimal::from(90),
            },
        ];
        storage.insert_order(o.clone());
        let service = service_with(&storage);

        assert!(!service.is_inter_state(&o).await.unwrap());

        // Tax line evidence disappears; the cached determination holds
        let mut stripped = o.clone();
        stripped.tax_lines.clear();
        assert!(!service.is_inter_state(&stripped).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_allocation_yields_unique_numbers() {
        let storage = MemoryStorage::new();
        for i in 0..16 {
            storage.insert_order(order(&format!("o{}", i), OrderStatus::Processing));
        }
        let service = std::sync::Arc::new(service_with(&storage));

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.allocate_invoice(&format!("o{}", i)).await.unwrap()
            }));
        }

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap());
        }
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 16);
        assert_eq!(storage.current().await.unwrap(), 17);
    }

    /// Backend that delays after the idempotency read, widening the window
    /// between "no record yet" and the record write so same-order races
    /// actually interleave.
    #[derive(Clone)]
    struct SlowReadStorage {
        inner: MemoryStorage,
        delay: std::time::Duration,
    }

    #[async_trait::async_trait]
    impl OrderSource for SlowReadStorage {
        async fn get_order(&self, order_id: &str) -> InvoiceResult<Option<Order>> {
            self.inner.get_order(order_id).await
        }
    }

    #[async_trait::async_trait]
    impl ProductCatalog for SlowReadStorage {
        async fn gst_metadata(&self, product_id: &str) -> InvoiceResult<Option<ProductGstMeta>> {
            self.inner.gst_metadata(product_id).await
        }
    }

    #[async_trait::async_trait]
    impl InvoiceStore for SlowReadStorage {
        async fn invoice_record(&self, order_id: &str) -> InvoiceResult<Option<InvoiceRecord>> {
            let record = self.inner.invoice_record(order_id).await?;
            tokio::time::sleep(self.delay).await;
            Ok(record)
        }

        async fn save_invoice_record_if_absent(
            &self,
            order_id: &str,
            record: &InvoiceRecord,
        ) -> InvoiceResult<InvoiceRecord> {
            self.inner.save_invoice_record_if_absent(order_id, record).await
        }

        async fn delete_invoice_record(&self, order_id: &str) -> InvoiceResult<()> {
            self.inner.delete_invoice_record(order_id).await
        }

        async fn cached_inter_state(&self, order_id: &str) -> InvoiceResult<Option<bool>> {
            self.inner.cached_inter_state(order_id).await
        }

        async fn cache_inter_state(
            &self,
            order_id: &str,
            is_inter_state: bool,
        ) -> InvoiceResult<()> {
            self.inner.cache_inter_state(order_id, is_inter_state).await
        }
    }

    #[async_trait::async_trait]
    impl SequenceStore for SlowReadStorage {
        async fn next_number(&self) -> InvoiceResult<u64> {
            self.inner.next_number().await
        }

        async fn current(&self) -> InvoiceResult<u64> {
            self.inner.current().await
        }

        async fn set_next(&self, value: u64) -> InvoiceResult<()> {
            self.inner.set_next(value).await
        }
    }

    #[async_trait::async_trait]
    impl SettingsStore for SlowReadStorage {
        async fn invoice_prefix(&self) -> InvoiceResult<String> {
            self.inner.invoice_prefix().await
        }

        async fn set_invoice_prefix(&self, prefix: &str) -> InvoiceResult<()> {
            SettingsStore::set_invoice_prefix(&self.inner, prefix).await
        }

        async fn company_state_code(&self) -> InvoiceResult<Option<String>> {
            self.inner.company_state_code().await
        }

        async fn set_company_state_code(&self, code: &str) -> InvoiceResult<()> {
            SettingsStore::set_company_state_code(&self.inner, code).await
        }
    }

    #[tokio::test]
    async fn test_same_order_race_settles_on_one_number() {
        let inner = MemoryStorage::new();
        inner.insert_order(order("1001", OrderStatus::Processing));
        let storage = SlowReadStorage {
            inner: inner.clone(),
            delay: std::time::Duration::from_millis(10),
        };
        let service = std::sync::Arc::new(InvoiceService::new(storage));

        // Both allocators pass the idempotency read before either writes
        let a = {
            let service = service.clone();
            tokio::spawn(async move { service.allocate_invoice("1001").await.unwrap() })
        };
        let b = {
            let service = service.clone();
            tokio::spawn(async move { service.allocate_invoice("1001").await.unwrap() })
        };
        let (a, b) = (a.await.unwrap(), b.await.unwrap());

        // The loser of the race returns the winner's number, and the stored
        // record matches what both callers saw
        assert_eq!(a, b);
        let stored = inner.invoice_record("1001").await.unwrap().unwrap();
        assert_eq!(stored.number, a);

        // Replays keep handing out the persisted number
        assert_eq!(service.allocate_invoice("1001").await.unwrap(), a);
    }
}
