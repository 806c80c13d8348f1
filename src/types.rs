//! Core types and data structures for GST invoicing

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Order status as reported by the host e-commerce platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

impl OrderStatus {
    /// Whether this status triggers automatic invoice-number allocation.
    /// Only paid-for orders get an invoice number.
    pub fn triggers_invoicing(&self) -> bool {
        matches!(self, OrderStatus::Processing | OrderStatus::Completed)
    }

    /// Parse a platform status slug (e.g. "on-hold", "completed")
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "on-hold" => Some(OrderStatus::OnHold),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            "refunded" => Some(OrderStatus::Refunded),
            "failed" => Some(OrderStatus::Failed),
            _ => None,
        }
    }

    /// The platform slug for this status
    pub fn slug(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::OnHold => "on-hold",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
        }
    }
}

/// A single order line item
///
/// `subtotal` is the pre-discount line value, `total` the post-discount
/// (but still pre-tax) value; GST is always computed on `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product reference; `None` when the product was deleted after purchase
    pub product_id: Option<String>,
    /// Item name as it appeared on the order
    pub name: String,
    /// Quantity ordered
    pub quantity: u32,
    /// Unit price before discounts
    pub unit_price: BigDecimal,
    /// Line value before discounts
    pub subtotal: BigDecimal,
    /// Line value after discounts, before tax
    pub total: BigDecimal,
}

impl LineItem {
    /// Create an undiscounted line item (subtotal == total == qty * unit price)
    pub fn new(
        product_id: Option<String>,
        name: String,
        quantity: u32,
        unit_price: BigDecimal,
    ) -> Self {
        let line_value = &unit_price * BigDecimal::from(quantity);
        Self {
            product_id,
            name,
            quantity,
            unit_price,
            subtotal: line_value.clone(),
            total: line_value,
        }
    }

    /// Line discount (subtotal minus total)
    pub fn discount(&self) -> BigDecimal {
        &self.subtotal - &self.total
    }
}

/// A tax line already attached to the order by the platform's tax engine.
/// The rate name ("CGST 9%", "IGST 18%", ...) is evidence for jurisdiction
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub rate_name: String,
    pub amount: BigDecimal,
}

/// Billing details relevant to GST jurisdiction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingDetails {
    pub name: String,
    pub address: String,
    /// Two-digit GST state code of the buyer, when captured
    pub state_code: Option<String>,
    /// Buyer's GST registration number, when captured
    pub gstin: Option<String>,
}

/// Read-only view of an order as supplied by the host platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub billing: BillingDetails,
    pub line_items: Vec<LineItem>,
    pub tax_lines: Vec<TaxLine>,
    pub created_at: NaiveDateTime,
}

impl Order {
    /// Create an empty order
    pub fn new(id: String, status: OrderStatus) -> Self {
        Self {
            id,
            status,
            billing: BillingDetails::default(),
            line_items: Vec::new(),
            tax_lines: Vec::new(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// GST metadata stored against a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductGstMeta {
    /// HSN classification code; empty when the merchant never set one
    pub hsn_code: String,
    /// Explicit GST rate percentage, when set
    pub gst_rate: Option<BigDecimal>,
    /// Tax class name; a `<digits>%` pattern in it serves as a rate fallback
    pub tax_class: String,
}

/// Invoice number and date assigned to an order.
/// Immutable once persisted; allocation is idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub number: String,
    pub date: NaiveDate,
}

/// Taxable value and tax amounts for one rate bucket (or the totals row)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxBucket {
    pub taxable: BigDecimal,
    pub igst: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
}

impl TaxBucket {
    /// Copy of this bucket with every field rounded for display.
    /// Accumulation stays exact; rounding happens only here.
    pub fn rounded(&self, digits: i64) -> TaxBucket {
        TaxBucket {
            taxable: self.taxable.with_scale_round(digits, RoundingMode::HalfUp),
            igst: self.igst.with_scale_round(digits, RoundingMode::HalfUp),
            cgst: self.cgst.with_scale_round(digits, RoundingMode::HalfUp),
            sgst: self.sgst.with_scale_round(digits, RoundingMode::HalfUp),
        }
    }

    /// Total tax in this bucket
    pub fn tax_amount(&self) -> BigDecimal {
        &self.igst + &self.cgst + &self.sgst
    }
}

/// Per-rate tax breakdown for an order
///
/// Rates are keyed by their canonical decimal value, so "5" and "5.0"
/// land in the same bucket. For every bucket exactly one of IGST or
/// CGST+SGST is non-zero, and CGST always equals SGST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub rates: BTreeMap<BigDecimal, TaxBucket>,
    pub totals: TaxBucket,
    pub is_inter_state: bool,
}

impl TaxBreakdown {
    /// Create an empty breakdown for the given jurisdiction
    pub fn new(is_inter_state: bool) -> Self {
        Self {
            rates: BTreeMap::new(),
            totals: TaxBucket::default(),
            is_inter_state,
        }
    }

    /// Invoice total before rounding: taxable + all tax amounts
    pub fn unrounded_total(&self) -> BigDecimal {
        &self.totals.taxable + self.totals.tax_amount()
    }

    /// Invoice total rounded to the nearest whole rupee
    pub fn final_amount(&self) -> BigDecimal {
        self.unrounded_total()
            .with_scale_round(0, RoundingMode::HalfUp)
    }

    /// Rounding adjustment shown on the invoice; may be negative
    pub fn round_off(&self) -> BigDecimal {
        self.final_amount() - self.unrounded_total()
    }
}

/// Outcome of a bulk allocation run. Individual failures do not abort
/// the batch; callers report the partial success count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchAllocation {
    /// (order id, invoice number) pairs that were allocated or already existed
    pub allocated: Vec<(String, String)>,
    /// (order id, error message) pairs for orders that could not be processed
    pub failed: Vec<(String, String)>,
}

impl BatchAllocation {
    pub fn succeeded(&self) -> usize {
        self.allocated.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Errors that can occur in the invoicing core
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for invoicing operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;
