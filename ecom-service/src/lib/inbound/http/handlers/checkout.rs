use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::order::errors::AddressError;
use crate::domain::order::models::CartItem;
use crate::domain::order::models::CheckoutCommand;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderItem;
use crate::domain::order::models::ShippingAddress;
use crate::domain::product::errors::ProductIdError;
use crate::domain::product::models::ProductId;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CheckoutRequest>,
) -> Result<ApiSuccess<OrderData>, ApiError> {
    state
        .order_service
        .checkout(user.id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref order| ApiSuccess::new(StatusCode::CREATED, order.into()))
}

/// HTTP request body for checking out a cart (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutRequest {
    items: Vec<CartItemRequest>,
    address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartItemRequest {
    product_id: String,
    quantity: u32,
}

#[derive(Debug, Clone, Error)]
enum ParseCheckoutRequestError {
    #[error("Invalid product ID: {0}")]
    ProductId(#[from] ProductIdError),

    #[error("Invalid address: {0}")]
    Address(#[from] AddressError),
}

impl CheckoutRequest {
    fn try_into_command(self) -> Result<CheckoutCommand, ParseCheckoutRequestError> {
        let items = self
            .items
            .into_iter()
            .map(|item| {
                Ok(CartItem {
                    product_id: ProductId::from_string(&item.product_id)?,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>, ParseCheckoutRequestError>>()?;

        Ok(CheckoutCommand {
            items,
            address: ShippingAddress::new(self.address)?,
        })
    }
}

impl From<ParseCheckoutRequestError> for ApiError {
    fn from(err: ParseCheckoutRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Order as returned by checkout and order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderData {
    pub order_id: String,
    /// Minor units (cents).
    pub total_price: i64,
    pub status: String,
    pub address: String,
    pub items: Vec<OrderItemData>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemData {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: i64,
}

impl From<&OrderItem> for OrderItemData {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price.cents(),
        }
    }
}

impl From<&Order> for OrderData {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id.to_string(),
            total_price: order.total.cents(),
            status: order.status.to_string(),
            address: order.address.as_str().to_string(),
            items: order.items.iter().map(OrderItemData::from).collect(),
            created_at: order.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_product_id() {
        let request = CheckoutRequest {
            items: vec![CartItemRequest {
                product_id: "42".to_string(),
                quantity: 1,
            }],
            address: "Rua A, 123".to_string(),
        };

        assert!(matches!(
            request.try_into_command(),
            Err(ParseCheckoutRequestError::ProductId(_))
        ));
    }

    #[test]
    fn test_rejects_blank_address() {
        let request = CheckoutRequest {
            items: vec![],
            address: "   ".to_string(),
        };

        assert!(matches!(
            request.try_into_command(),
            Err(ParseCheckoutRequestError::Address(AddressError::Empty))
        ));
    }
}
