use thiserror::Error;

use crate::domain::product::errors::PriceError;

/// Error for shipping address validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address is required")]
    Empty,

    #[error("Address too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for OrderStatus parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown order status: {0}")]
pub struct OrderStatusError(pub String);

/// Top-level error for cart checkout and order operations
#[derive(Debug, Clone, Error)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid quantity for product {0}")]
    InvalidQuantity(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("Product {0} is not available in the store, please refresh your cart")]
    ProductUnavailable(String),

    #[error("Product {0} is not available in the quantity requested")]
    InsufficientStock(String),

    #[error("Invalid order total: {0}")]
    InvalidTotal(#[from] PriceError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
