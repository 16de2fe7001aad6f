use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::inbound::http::router::AppState;

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<ApiSuccess<ProductData>, ApiError> {
    let product_id =
        ProductId::from_string(&product_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .product_service
        .get_product(&product_id)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}

/// Product as returned by every catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    /// Minor units (cents).
    pub price: i64,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductData {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.to_string(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            price: product.price.cents(),
            quantity: product.stock,
            created_at: product.created_at,
        }
    }
}
