use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::product::errors::PriceError;
use crate::domain::product::errors::ProductIdError;
use crate::domain::product::errors::ProductNameError;
use crate::domain::product::errors::StockError;

/// Product catalog entry with its available stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: String,
    pub image_url: String,
    pub price: Price,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
}

/// Product unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a product ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ProductIdError> {
        Uuid::parse_str(s)
            .map(ProductId)
            .map_err(|e| ProductIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Product display name, 1-255 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductName(String);

impl ProductName {
    const MAX_LENGTH: usize = 255;

    pub fn new(name: String) -> Result<Self, ProductNameError> {
        let trimmed = name.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(ProductNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(ProductNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Monetary amount in minor units (cents). Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            Err(PriceError::Negative(cents))
        } else {
            Ok(Self(cents))
        }
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Price of `quantity` units.
    pub fn times(&self, quantity: u32) -> Result<Price, PriceError> {
        self.0
            .checked_mul(i64::from(quantity))
            .map(Price)
            .ok_or(PriceError::Overflow)
    }

    pub fn checked_add(&self, other: Price) -> Result<Price, PriceError> {
        self.0
            .checked_add(other.0)
            .map(Price)
            .ok_or(PriceError::Overflow)
    }
}

/// Units on hand for a new product. Bounded by the INTEGER stock column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stock(u32);

impl Stock {
    pub const MAX: u32 = i32::MAX as u32;

    pub fn new(units: u32) -> Result<Self, StockError> {
        if units > Self::MAX {
            Err(StockError::TooLarge {
                max: Self::MAX,
                actual: units,
            })
        } else {
            Ok(Self(units))
        }
    }

    pub fn units(&self) -> u32 {
        self.0
    }
}

/// Command to add a product to the catalog
#[derive(Debug)]
pub struct CreateProductCommand {
    pub name: ProductName,
    pub description: String,
    pub image_url: String,
    pub price: Price,
    pub stock: Stock,
}
