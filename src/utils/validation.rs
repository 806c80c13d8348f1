//! Validation utilities for GST identifiers and settings

use crate::types::*;

/// GST state codes for Indian states and union territories, keyed by the
/// two-letter abbreviation the platform stores on billing addresses
const STATE_CODES: &[(&str, &str)] = &[
    ("AN", "35"), // Andaman and Nicobar Islands
    ("AP", "28"), // Andhra Pradesh
    ("AR", "12"), // Arunachal Pradesh
    ("AS", "18"), // Assam
    ("BR", "10"), // Bihar
    ("CH", "04"), // Chandigarh
    ("CT", "22"), // Chhattisgarh
    ("DD", "26"), // Daman and Diu
    ("DH", "26"), // Dadra and Nagar Haveli
    ("DL", "07"), // Delhi
    ("GA", "30"), // Goa
    ("GJ", "24"), // Gujarat
    ("HP", "02"), // Himachal Pradesh
    ("HR", "06"), // Haryana
    ("JH", "20"), // Jharkhand
    ("JK", "01"), // Jammu and Kashmir
    ("KA", "29"), // Karnataka
    ("KL", "32"), // Kerala
    ("LA", "38"), // Ladakh
    ("LD", "31"), // Lakshadweep
    ("MH", "27"), // Maharashtra
    ("ML", "17"), // Meghalaya
    ("MN", "14"), // Manipur
    ("MP", "23"), // Madhya Pradesh
    ("MZ", "15"), // Mizoram
    ("NL", "13"), // Nagaland
    ("OR", "21"), // Odisha
    ("PB", "03"), // Punjab
    ("PY", "34"), // Puducherry
    ("RJ", "08"), // Rajasthan
    ("SK", "11"), // Sikkim
    ("TG", "36"), // Telangana
    ("TN", "33"), // Tamil Nadu
    ("TR", "16"), // Tripura
    ("UP", "09"), // Uttar Pradesh
    ("UT", "05"), // Uttarakhand
    ("WB", "19"), // West Bengal
];

/// Look up the GST state code for a state abbreviation (e.g. "KA" -> "29"),
/// used to backfill a missing billing state code from the billing address
pub fn state_code_for_abbreviation(abbreviation: &str) -> Option<&'static str> {
    STATE_CODES
        .iter()
        .find(|(abbr, _)| *abbr == abbreviation)
        .map(|(_, code)| *code)
}

/// Validate a two-digit GST state code
pub fn validate_state_code(code: &str) -> InvoiceResult<()> {
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(InvoiceError::Validation(format!(
            "State code must be exactly two digits, got '{}'",
            code
        )));
    }
    Ok(())
}

/// Structural GSTIN check: 15 characters, a two-digit state code, an
/// uppercase alphanumeric body, and the constant "Z" in position 14.
/// The checksum character is not verified.
pub fn validate_gstin(gstin: &str) -> InvoiceResult<()> {
    if gstin.len() != 15 {
        return Err(InvoiceError::Validation(
            "GSTIN must be exactly 15 characters".to_string(),
        ));
    }

    let bytes = gstin.as_bytes();
    if !bytes[..2].iter().all(|b| b.is_ascii_digit()) {
        return Err(InvoiceError::Validation(
            "GSTIN must start with a two-digit state code".to_string(),
        ));
    }

    if !bytes
        .iter()
        .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
    {
        return Err(InvoiceError::Validation(
            "GSTIN may only contain digits and uppercase letters".to_string(),
        ));
    }

    if bytes[13] != b'Z' {
        return Err(InvoiceError::Validation(
            "GSTIN must have 'Z' in the fourteenth position".to_string(),
        ));
    }

    Ok(())
}

/// Validate an invoice-number prefix. Invoice numbers end up in filenames
/// and exports, so the prefix is kept short and filename-safe.
pub fn validate_invoice_prefix(prefix: &str) -> InvoiceResult<()> {
    if prefix.len() > 20 {
        return Err(InvoiceError::Validation(
            "Invoice prefix cannot exceed 20 characters".to_string(),
        ));
    }

    if !prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/')
    {
        return Err(InvoiceError::Validation(
            "Invoice prefix may only contain alphanumeric characters, dashes, underscores, and slashes"
                .to_string(),
        ));
    }

    Ok(())
}
