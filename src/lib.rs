//! # GST Invoice Core
//!
//! Core domain logic for generating Indian GST-compliant invoices from
//! e-commerce orders: tax computation, jurisdiction resolution, and
//! sequential invoice numbering.
//!
//! ## Features
//!
//! - **Invoice numbering**: Idempotent, strictly monotonic number
//!   allocation backed by an atomic sequence counter
//! - **Rate classification**: Per-line-item GST rate and HSN code with
//!   documented fallbacks for missing product metadata
//! - **Jurisdiction resolution**: IGST vs CGST/SGST determination from tax
//!   line evidence or state codes, cached per order
//! - **Tax aggregation**: Exact decimal per-rate buckets with round-off
//!   computed only at presentation time
//! - **Amount in words**: Indian numbering system (lakh/crore) rendering
//! - **Storage abstraction**: Platform-agnostic design with trait-based
//!   backends
//!
//! ## Quick Start
//!
//! ```rust
//! use gst_invoice_core::{InvoiceService, Order, OrderStatus, MemoryStorage};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let storage = MemoryStorage::new();
//! storage.insert_order(Order::new("1001".to_string(), OrderStatus::Processing));
//!
//! let service = InvoiceService::new(storage);
//! let number = service
//!     .handle_order_event("1001", OrderStatus::Processing)
//!     .await
//!     .unwrap();
//! assert_eq!(number.as_deref(), Some("000001"));
//! # }
//! ```

pub mod invoice;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;
pub mod words;

// Re-export commonly used types
pub use invoice::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
pub use words::amount_to_words;

// Re-export the in-memory backend for convenience in tests and examples
pub use utils::memory_storage::MemoryStorage;
