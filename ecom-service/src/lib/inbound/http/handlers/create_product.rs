use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::get_product::ProductData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::errors::PriceError;
use crate::domain::product::errors::ProductNameError;
use crate::domain::product::errors::StockError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Price;
use crate::domain::product::models::ProductName;
use crate::domain::product::models::Stock;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<ApiSuccess<ProductData>, ApiError> {
    let product = state
        .product_service
        .create_product(body.try_into_command()?)
        .await
        .map_err(ApiError::from)?;

    tracing::info!(product_id = %product.id, created_by = %user.id, "Product created");

    Ok(ApiSuccess::new(StatusCode::CREATED, (&product).into()))
}

/// HTTP request body for adding a product (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateProductRequest {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: String,
    /// Minor units (cents).
    price: i64,
    quantity: u32,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateProductRequestError {
    #[error("Invalid product name: {0}")]
    Name(#[from] ProductNameError),

    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    #[error("Invalid quantity: {0}")]
    Quantity(#[from] StockError),
}

impl CreateProductRequest {
    fn try_into_command(self) -> Result<CreateProductCommand, ParseCreateProductRequestError> {
        Ok(CreateProductCommand {
            name: ProductName::new(self.name)?,
            description: self.description,
            image_url: self.image_url,
            price: Price::from_cents(self.price)?,
            stock: Stock::new(self.quantity)?,
        })
    }
}

impl From<ParseCreateProductRequestError> for ApiError {
    fn from(err: ParseCreateProductRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(price: i64, quantity: u32) -> CreateProductRequest {
        CreateProductRequest {
            name: "mug".to_string(),
            description: String::new(),
            image_url: String::new(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_valid_request_parses() {
        let command = request(1999, 5).try_into_command().unwrap();
        assert_eq!(command.price.cents(), 1999);
        assert_eq!(command.stock.units(), 5);
    }

    #[test]
    fn test_quantity_beyond_stock_column_rejected() {
        assert!(matches!(
            request(1999, 3_000_000_000).try_into_command(),
            Err(ParseCreateProductRequestError::Quantity(StockError::TooLarge { .. }))
        ));
        assert!(matches!(
            request(-1, 5).try_into_command(),
            Err(ParseCreateProductRequestError::Price(PriceError::Negative(-1)))
        ));
    }
}
