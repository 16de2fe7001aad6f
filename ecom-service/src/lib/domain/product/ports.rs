use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;

/// Port for product catalog operations.
#[async_trait]
pub trait ProductServicePort: Send + Sync + 'static {
    /// List every product in the catalog.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_products(&self) -> Result<Vec<Product>, ProductError>;

    /// Retrieve a product by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError>;

    /// Add a product to the catalog.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_product(&self, command: CreateProductCommand)
        -> Result<Product, ProductError>;
}

/// Persistence operations for products.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn create(&self, product: Product) -> Result<Product, ProductError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;

    /// Retrieve multiple products by identifiers.
    ///
    /// # Returns
    /// Found products (missing IDs are skipped without error)
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, ProductError>;

    async fn list_all(&self) -> Result<Vec<Product>, ProductError>;
}
