use async_trait::async_trait;

use crate::domain::order::errors::OrderError;
use crate::domain::order::models::CheckoutCommand;
use crate::domain::order::models::Order;
use crate::domain::user::models::UserId;

/// Port for cart checkout and order queries.
#[async_trait]
pub trait OrderServicePort: Send + Sync + 'static {
    /// Turn a cart into a pending order for `user_id`.
    ///
    /// Duplicate cart lines for the same product are merged.
    ///
    /// # Returns
    /// Placed order with its items and total
    ///
    /// # Errors
    /// * `EmptyCart` - No items
    /// * `InvalidQuantity` - A line asks for zero units
    /// * `ProductUnavailable` - A product does not exist
    /// * `InsufficientStock` - Not enough units of a product
    /// * `DatabaseError` - Database operation failed
    async fn checkout(&self, user_id: UserId, command: CheckoutCommand)
        -> Result<Order, OrderError>;

    /// List orders placed by `user_id`, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_orders(&self, user_id: &UserId) -> Result<Vec<Order>, OrderError>;
}

/// Persistence operations for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    /// Atomically reserve stock for every item and persist the order.
    ///
    /// Either all stock decrements and inserts happen, or none do.
    ///
    /// # Errors
    /// * `InsufficientStock` - A product no longer has enough units
    /// * `DatabaseError` - Database operation failed
    async fn place(&self, order: Order) -> Result<Order, OrderError>;

    /// Retrieve orders for a user, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderError>;
}
