use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::order::errors::OrderError;
use crate::domain::order::models::Order;
use crate::domain::order::ports::OrderRepository;
use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::ProductRepository;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    products: HashMap<ProductId, Product>,
    orders: Vec<Order>,
}

/// Process-local store implementing every repository port.
///
/// A single lock guards all tables so that order placement sees and updates
/// stock atomically. Used by the integration tests and for running the
/// service without Postgres.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stock for a product, if it exists.
    pub async fn stock_of(&self, id: &ProductId) -> Option<u32> {
        self.tables
            .read()
            .await
            .products
            .get(id)
            .map(|product| product.stock)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create(&self, product: Product) -> Result<Product, ProductError> {
        self.tables
            .write()
            .await
            .products
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        Ok(self.tables.read().await.products.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, ProductError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.get(id).cloned())
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        let mut products: Vec<Product> =
            self.tables.read().await.products.values().cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn place(&self, order: Order) -> Result<Order, OrderError> {
        let mut tables = self.tables.write().await;

        // Check every line before touching stock so a failure leaves nothing behind.
        for item in &order.items {
            let product = tables
                .products
                .get(&item.product_id)
                .ok_or_else(|| OrderError::ProductUnavailable(item.product_id.to_string()))?;
            if product.stock < item.quantity {
                return Err(OrderError::InsufficientStock(product.name.to_string()));
            }
        }

        for item in &order.items {
            if let Some(product) = tables.products.get_mut(&item.product_id) {
                product.stock -= item.quantity;
            }
        }

        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderError> {
        let mut orders: Vec<Order> = self
            .tables
            .read()
            .await
            .orders
            .iter()
            .filter(|order| &order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}
