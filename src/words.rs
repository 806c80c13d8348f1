//! Amount-in-words conversion using the Indian numbering system
//!
//! Groups the integer part as ones/tens, hundred, thousand, lakh, crore
//! (two-digit groups above the hundreds, not uniform thousands). Paise are
//! appended only when present after rounding to two decimal places.

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive, Zero};

use crate::types::{InvoiceError, InvoiceResult};

const ONES: [&str; 20] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];

const TENS: [&str; 10] = [
    "", "ten", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Largest supported amount: anything at or above 100 crore rupees is
/// rejected rather than silently misrendered.
const MAX_RUPEES: u64 = 1_000_000_000;

/// Convert a non-negative rupee amount into words,
/// e.g. 1180 becomes "one thousand one hundred eighty rupees".
///
/// The amount is rounded to two decimal places first; a non-zero paise
/// component is appended as "and <words> paise". Zero converts to
/// "zero rupees". Negative amounts and amounts of 100 crore or more are
/// rejected with [`InvoiceError::InvalidAmount`].
pub fn amount_to_words(amount: &BigDecimal) -> InvoiceResult<String> {
    if amount < &BigDecimal::zero() {
        return Err(InvoiceError::InvalidAmount(format!(
            "cannot express negative amount in words: {}",
            amount
        )));
    }

    let rounded = amount.with_scale_round(2, RoundingMode::HalfUp);
    let whole = rounded.with_scale_round(0, RoundingMode::Floor);
    let rupees = whole.to_u64().unwrap_or(u64::MAX);
    if rupees >= MAX_RUPEES {
        return Err(InvoiceError::InvalidAmount(format!(
            "amount too large to express in words: {}",
            amount
        )));
    }

    let paise = ((&rounded - &whole) * BigDecimal::from(100))
        .with_scale(0)
        .to_u64()
        .unwrap_or(0);

    let mut result = format!("{} rupees", integer_to_words(rupees));
    if paise > 0 {
        result.push_str(&format!(" and {} paise", integer_to_words(paise)));
    }
    Ok(result)
}

/// Render a whole number in Indian-system words (input below 100 crore)
fn integer_to_words(n: u64) -> String {
    if n == 0 {
        return "zero".to_string();
    }

    let crore = n / 10_000_000;
    let lakh = (n / 100_000) % 100;
    let thousand = (n / 1_000) % 100;
    let hundred = (n / 100) % 10;
    let rest = n % 100;

    let mut parts = Vec::new();
    if crore > 0 {
        parts.push(format!("{} crore", two_digit_words(crore)));
    }
    if lakh > 0 {
        parts.push(format!("{} lakh", two_digit_words(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} thousand", two_digit_words(thousand)));
    }
    if hundred > 0 {
        parts.push(format!("{} hundred", ONES[hundred as usize]));
    }
    if rest > 0 {
        parts.push(two_digit_words(rest));
    }

    parts.join(" ")
}

fn two_digit_words(n: u64) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        ONES[n as usize].to_string()
    } else if n % 10 == 0 {
        TENS[(n / 10) as usize].to_string()
    } else {
        format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize])
    }
}
