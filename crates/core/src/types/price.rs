//! Type-safe price representation.
//!
//! Prices are stored as integer minor units (kopeks, cents) plus an ISO 4217
//! currency code. Formatting into a display string happens only at the
//! boundary via [`Price::display`]; comparisons and sorting work on the
//! numeric amount.

use serde::{Deserialize, Serialize};

/// A monetary amount in integer minor units with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the smallest currency unit (e.g., kopeks for RUB).
    minor_units: i64,
    /// ISO 4217 currency code.
    currency: CurrencyCode,
}

impl Price {
    /// Create a new price from minor units.
    #[must_use]
    pub const fn new(minor_units: i64, currency: CurrencyCode) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Amount in minor units. This is the comparison/sorting key.
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.minor_units
    }

    /// The currency of this price.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Format for display (e.g., "45.00 ₽").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}.{:02} {}",
            self.minor_units / 100,
            (self.minor_units % 100).abs(),
            self.currency.symbol()
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    RUB,
    USD,
    EUR,
}

impl CurrencyCode {
    /// The currency symbol used in display strings.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::RUB => "₽",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RUB => "RUB",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}
