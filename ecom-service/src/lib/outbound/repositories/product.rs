use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::product::errors::ProductError;
use crate::domain::product::errors::StockError;
use crate::domain::product::models::Price;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductName;
use crate::domain::product::models::Stock;
use crate::domain::product::ports::ProductRepository;

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    image_url: String,
    price_cents: i64,
    quantity: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = ProductError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let stock = u32::try_from(row.quantity).map_err(|_| {
            ProductError::DatabaseError(format!("negative stock for product {}", row.id))
        })?;

        Ok(Product {
            id: ProductId(row.id),
            name: ProductName::new(row.name)?,
            description: row.description,
            image_url: row.image_url,
            price: Price::from_cents(row.price_cents)?,
            stock,
            created_at: row.created_at,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, ProductError> {
    rows.into_iter().map(Product::try_from).collect()
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: Product) -> Result<Product, ProductError> {
        let quantity = i32::try_from(product.stock).map_err(|_| StockError::TooLarge {
            max: Stock::MAX,
            actual: product.stock,
        })?;

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, image_url, price_cents, quantity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id.0)
        .bind(product.name.as_str())
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.price.cents())
        .bind(quantity)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(product)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, image_url, price_cents, quantity, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?
        .map(Product::try_from)
        .transpose()
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, ProductError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, image_url, price_cents, quantity, created_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        into_products(rows)
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, image_url, price_cents, quantity, created_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        into_products(rows)
    }
}
