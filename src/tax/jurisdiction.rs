//! Inter-state vs intra-state jurisdiction resolution
//!
//! Decides whether an order attracts IGST (inter-state) or the CGST/SGST
//! split (intra-state). Tax lines already attached to the order are the
//! strongest evidence and override state-code comparison.

use crate::types::*;

/// Resolve whether a transaction is inter-state.
///
/// Priority order:
/// 1. If the order carries tax lines naming both CGST and SGST, the
///    platform already taxed it intra-state; return `false`.
/// 2. Otherwise compare state codes when both are known.
/// 3. With insufficient evidence, default to inter-state.
pub fn resolve(order: &Order, company_state_code: Option<&str>) -> bool {
    if has_cgst_sgst(&order.tax_lines) {
        return false;
    }

    let billing_code = order.billing.state_code.as_deref().unwrap_or("");
    match company_state_code {
        Some(company_code) if !company_code.is_empty() && !billing_code.is_empty() => {
            billing_code != company_code
        }
        _ => true,
    }
}

/// Whether the tax lines name both a CGST and an SGST component
/// (case-insensitive substring match on the rate name)
pub fn has_cgst_sgst(tax_lines: &[TaxLine]) -> bool {
    let mut has_cgst = false;
    let mut has_sgst = false;

    for line in tax_lines {
        let name = line.rate_name.to_lowercase();
        if name.contains("cgst") {
            has_cgst = true;
        }
        if name.contains("sgst") {
            has_sgst = true;
        }
    }

    has_cgst && has_sgst
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn tax_line(name: &str) -> TaxLine {
        TaxLine {
            rate_name: name.to_string(),
            amount: BigDecimal::from_str("9.0").unwrap(),
        }
    }

    fn order_with(state_code: Option<&str>, tax_lines: Vec<TaxLine>) -> Order {
        let mut order = Order::new("1001".to_string(), OrderStatus::Processing);
        order.billing.state_code = state_code.map(String::from);
        order.tax_lines = tax_lines;
        order
    }

    #[test]
    fn test_cgst_sgst_lines_override_state_codes() {
        // State codes differ, but the tax lines say intra-state
        let order = order_with(
            Some("27"),
            vec![tax_line("CGST 9%"), tax_line("SGST 9%")],
        );
        assert!(!resolve(&order, Some("29")));
    }

    #[test]
    fn test_igst_line_alone_is_not_intra_state() {
        // "igst" contains neither "cgst" nor "sgst"
        let order = order_with(None, vec![tax_line("IGST 18%")]);
        assert!(resolve(&order, None));
    }

    #[test]
    fn test_only_cgst_is_insufficient() {
        let order = order_with(None, vec![tax_line("CGST 9%")]);
        assert!(resolve(&order, None));
    }

    #[test]
    fn test_state_code_comparison() {
        let same = order_with(Some("29"), Vec::new());
        assert!(!resolve(&same, Some("29")));

        let different = order_with(Some("27"), Vec::new());
        assert!(resolve(&different, Some("29")));
    }

    #[test]
    fn test_missing_evidence_defaults_to_inter_state() {
        let no_billing = order_with(None, Vec::new());
        assert!(resolve(&no_billing, Some("29")));

        let no_company = order_with(Some("29"), Vec::new());
        assert!(resolve(&no_company, None));

        let empty_codes = order_with(Some(""), Vec::new());
        assert!(resolve(&empty_codes, Some("")));
    }

    #[test]
    fn test_rate_name_matching_is_case_insensitive() {
        let order = order_with(
            Some("29"),
            vec![tax_line("cGsT @ 6%"), tax_line("Sgst @ 6%")],
        );
        assert!(!resolve(&order, Some("29")));
    }
}
