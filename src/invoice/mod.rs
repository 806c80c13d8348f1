//! Invoice number allocation and order-level tax computation

pub mod service;

pub use service::InvoiceService;
