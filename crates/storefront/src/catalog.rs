//! Static product catalog.
//!
//! The catalog is immutable process-wide configuration: it is built exactly
//! once at startup (from a JSON seed file, or the builtin seed) and is
//! read-only for the lifetime of the process. No product is ever created or
//! deleted at runtime.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tgmarket_core::{CurrencyCode, Price, ProductId};

/// A product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current price.
    pub price: Price,
    /// Pre-discount price, if the product is on sale.
    #[serde(default)]
    pub original_price: Option<Price>,
    /// Discount in whole percent, if the product is on sale.
    #[serde(default)]
    pub discount_percent: Option<u8>,
    /// Whether the product can currently be purchased.
    pub available: bool,
    /// Short description.
    #[serde(default)]
    pub description: String,
}

/// Sort key for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Lexicographic ascending by name.
    #[default]
    Name,
    /// Ascending by numeric amount in minor units.
    Price,
}

/// Errors that can occur while building the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate product id {0} in catalog seed")]
    DuplicateId(ProductId),
    #[error("failed to read catalog seed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog seed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable, process-wide product registry.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from a seed, rejecting duplicate IDs.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an ID.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(products.len());
        for (index, product) in products.iter().enumerate() {
            if by_id.insert(product.id, index).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products, by_id })
    }

    /// Load a catalog from a JSON seed file (an array of products).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed, or if it
    /// contains duplicate product IDs.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        Self::new(products)
    }

    /// The builtin five-listing seed used when no catalog file is configured.
    #[must_use]
    pub fn builtin() -> Self {
        let rub = |minor| Price::new(minor, CurrencyCode::RUB);
        let products = vec![
            Product {
                id: ProductId::new(1),
                name: "Telegram Account Myanmar (+95)".to_string(),
                price: rub(4500),
                original_price: Some(rub(5000)),
                discount_percent: Some(10),
                available: true,
                description: "Premium account with a Myanmar number".to_string(),
            },
            Product {
                id: ProductId::new(2),
                name: "Telegram Account Bangladesh (+880)".to_string(),
                price: rub(5000),
                original_price: None,
                discount_percent: None,
                available: true,
                description: "Quality account with a Bangladeshi number".to_string(),
            },
            Product {
                id: ProductId::new(3),
                name: "Telegram Account USA virtual (+1)".to_string(),
                price: rub(5000),
                original_price: None,
                discount_percent: None,
                available: true,
                description: "Virtual US number for Telegram".to_string(),
            },
            Product {
                id: ProductId::new(4),
                name: "Telegram Account Nigeria (+234)".to_string(),
                price: rub(5500),
                original_price: None,
                discount_percent: None,
                available: true,
                description: "Reliable account with a Nigerian number".to_string(),
            },
            Product {
                id: ProductId::new(5),
                name: "Telegram Account Zimbabwe (+263)".to_string(),
                price: rub(5000),
                original_price: None,
                discount_percent: None,
                available: false,
                description: "Exclusive account (back in stock soon)".to_string(),
            },
        ];
        Self::new(products).expect("builtin seed has unique ids")
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn lookup(&self, id: ProductId) -> Option<&Product> {
        self.by_id.get(&id).and_then(|&index| self.products.get(index))
    }

    /// Whether the catalog contains a product with this ID.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// All products in seed order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Filtered, sorted listing.
    ///
    /// `filter` is a case-insensitive substring match on the product name.
    pub fn list(&self, filter: Option<&str>, sort: SortKey) -> Vec<&Product> {
        let needle = filter.map(str::to_lowercase);
        let mut listing: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| match &needle {
                Some(needle) => product.name.to_lowercase().contains(needle),
                None => true,
            })
            .collect();

        match sort {
            SortKey::Name => listing.sort_by(|a, b| a.name.cmp(&b.name)),
            SortKey::Price => listing.sort_by_key(|product| product.price.minor_units()),
        }

        listing
    }
}
