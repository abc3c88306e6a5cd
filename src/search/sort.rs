//! Result ordering
//!
//! Sorting is stable: units with equal keys keep their source order. Units
//! without the sort field go last regardless of direction.

use crate::catalog::model::Unit;
use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    SizeAsc,
    SizeDesc,
    FloorAsc,
    FloorDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::SizeAsc,
        SortKey::SizeDesc,
        SortKey::FloorAsc,
        SortKey::FloorDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::SizeAsc => "size-asc",
            Self::SizeDesc => "size-desc",
            Self::FloorAsc => "floor-asc",
            Self::FloorDesc => "floor-desc",
        }
    }

    fn descending(self) -> bool {
        matches!(self, Self::PriceDesc | Self::SizeDesc | Self::FloorDesc)
    }

    fn key(self, unit: &Unit) -> Option<f64> {
        match self {
            Self::PriceAsc | Self::PriceDesc => unit.price,
            Self::SizeAsc | Self::SizeDesc => unit.size,
            Self::FloorAsc | Self::FloorDesc => unit.floor.map(f64::from),
        }
    }

    /// Compare two units under this key
    pub fn compare(self, a: &Unit, b: &Unit) -> Ordering {
        match (self.key(a), self.key(b)) {
            (Some(x), Some(y)) if self.descending() => y.total_cmp(&x),
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    /// Accepts "price-asc", "price_asc" and "priceAsc"
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().replace('-', "") == wanted)
            .ok_or_else(|| {
                Error::validation(format!(
                    "unknown sort '{}' (expected one of: {})",
                    s,
                    Self::ALL.map(SortKey::as_str).join(", ")
                ))
            })
    }
}

/// Stable in-place sort
pub fn sort_units(units: &mut [Unit], key: SortKey) {
    units.sort_by(|a, b| key.compare(a, b));
}
