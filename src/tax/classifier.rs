//! Per-line-item GST rate and HSN code resolution
//!
//! Missing business data never fails classification; it degrades through
//! the documented fallback chain: explicit product rate, then a
//! `<digits>%` pattern in the product's tax class name, then the default
//! slab rate.

use bigdecimal::BigDecimal;

use crate::tax::GstSlab;
use crate::traits::ProductCatalog;
use crate::types::*;

/// Resolves the GST rate and HSN code applicable to an order line item
pub struct RateClassifier<C: ProductCatalog> {
    catalog: C,
    default_rate: BigDecimal,
}

impl<C: ProductCatalog> RateClassifier<C> {
    /// Create a classifier with the standard default rate (5%)
    pub fn new(catalog: C) -> Self {
        Self::with_default_rate(catalog, GstSlab::Reduced.rate())
    }

    /// Create a classifier with a custom default rate
    pub fn with_default_rate(catalog: C, default_rate: BigDecimal) -> Self {
        Self {
            catalog,
            default_rate,
        }
    }

    /// Resolve `(gst_rate, hsn_code)` for a line item.
    ///
    /// A deleted product or absent metadata yields the default rate and an
    /// empty HSN code; only storage failures propagate as errors.
    pub async fn resolve_rate(&self, item: &LineItem) -> InvoiceResult<(BigDecimal, String)> {
        let meta = match item.product_id.as_deref() {
            Some(product_id) => self.catalog.gst_metadata(product_id).await?,
            None => None,
        };

        let Some(meta) = meta else {
            return Ok((self.default_rate.clone(), String::new()));
        };

        let rate = meta
            .gst_rate
            .clone()
            .or_else(|| rate_from_tax_class(&meta.tax_class))
            .unwrap_or_else(|| self.default_rate.clone());

        Ok((rate, meta.hsn_code))
    }
}

/// Extract a rate from a tax class name containing `<digits>%`,
/// e.g. "GST 12%" resolves to 12. The first such occurrence wins.
fn rate_from_tax_class(tax_class: &str) -> Option<BigDecimal> {
    let bytes = tax_class.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'%' {
                return tax_class[start..i].parse::<u64>().ok().map(BigDecimal::from);
            }
        } else {
            i += 1;
        }
    }
    None
}
