//! Per-rate tax aggregation
//!
//! Buckets taxable value and tax by GST rate and produces the totals row.
//! All arithmetic is exact decimal; rounding belongs to the presentation
//! helpers on [`TaxBreakdown`] and [`TaxBucket`].

use bigdecimal::BigDecimal;

use crate::tax::classifier::RateClassifier;
use crate::traits::ProductCatalog;
use crate::types::*;

/// Aggregate line items into a per-rate tax breakdown.
///
/// For each item: taxable value is the post-discount line total and tax is
/// `taxable * rate / 100`. Inter-state orders put the whole tax into IGST;
/// intra-state orders split it evenly between CGST and SGST.
pub async fn aggregate<C: ProductCatalog>(
    line_items: &[LineItem],
    classifier: &RateClassifier<C>,
    is_inter_state: bool,
) -> InvoiceResult<TaxBreakdown> {
    let mut breakdown = TaxBreakdown::new(is_inter_state);
    let hundred = BigDecimal::from(100);
    let two = BigDecimal::from(2);

    for item in line_items {
        let (rate, _hsn) = classifier.resolve_rate(item).await?;

        let taxable = item.total.clone();
        let tax_amount = &taxable * &rate / &hundred;

        let bucket = breakdown.rates.entry(rate).or_default();
        bucket.taxable += &taxable;
        breakdown.totals.taxable += &taxable;

        if is_inter_state {
            bucket.igst += &tax_amount;
            breakdown.totals.igst += &tax_amount;
        } else {
            let half = &tax_amount / &two;
            bucket.cgst += &half;
            bucket.sgst += &half;
            breakdown.totals.cgst += &half;
            breakdown.totals.sgst += &half;
        }
    }

    Ok(breakdown)
}
