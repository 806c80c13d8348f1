//! GST tax computation: rate classification, jurisdiction resolution,
//! and per-rate aggregation

pub mod aggregator;
pub mod classifier;
pub mod jurisdiction;

pub use aggregator::aggregate;
pub use classifier::RateClassifier;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The statutory GST rate slabs offered when classifying a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstSlab {
    /// Exempt goods - 0%
    Exempt,
    /// Supplies to merchant exporters - 0.1%
    MerchantExport,
    /// Rough precious and semi-precious stones - 0.25%
    PreciousStones,
    /// Composition-rate goods such as affordable housing - 1%
    Composition,
    /// Gold, silver, and other bullion - 3%
    Bullion,
    /// Reduced rate items - 5%
    Reduced,
    /// Standard rate items - 12%
    Standard,
    /// Higher rate items - 18%
    Higher,
    /// Luxury and sin goods - 28%
    Luxury,
}

impl GstSlab {
    /// The rate percentage for this slab
    pub fn rate(&self) -> BigDecimal {
        match self {
            GstSlab::Exempt => BigDecimal::from(0),
            GstSlab::MerchantExport => BigDecimal::from_str("0.1").unwrap(),
            GstSlab::PreciousStones => BigDecimal::from_str("0.25").unwrap(),
            GstSlab::Composition => BigDecimal::from(1),
            GstSlab::Bullion => BigDecimal::from(3),
            GstSlab::Reduced => BigDecimal::from(5),
            GstSlab::Standard => BigDecimal::from(12),
            GstSlab::Higher => BigDecimal::from(18),
            GstSlab::Luxury => BigDecimal::from(28),
        }
    }
}
