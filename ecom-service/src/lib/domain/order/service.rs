use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::order::errors::OrderError;
use crate::domain::order::models::CartItem;
use crate::domain::order::models::CheckoutCommand;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderId;
use crate::domain::order::models::OrderItem;
use crate::domain::order::models::OrderStatus;
use crate::domain::order::ports::OrderRepository;
use crate::domain::order::ports::OrderServicePort;
use crate::domain::product::models::Price;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::ProductRepository;
use crate::domain::user::models::UserId;

/// Domain service implementation for cart checkout.
pub struct OrderService<OR, PR>
where
    OR: OrderRepository,
    PR: ProductRepository,
{
    orders: Arc<OR>,
    products: Arc<PR>,
}

impl<OR, PR> OrderService<OR, PR>
where
    OR: OrderRepository,
    PR: ProductRepository,
{
    pub fn new(orders: Arc<OR>, products: Arc<PR>) -> Self {
        Self { orders, products }
    }
}

/// Merge cart lines by product, rejecting empty carts and zero quantities.
fn merge_cart(items: Vec<CartItem>) -> Result<BTreeMap<ProductId, u32>, OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    let mut lines: BTreeMap<ProductId, u32> = BTreeMap::new();
    for item in items {
        if item.quantity == 0 {
            return Err(OrderError::InvalidQuantity(item.product_id.to_string()));
        }
        let quantity = lines.entry(item.product_id).or_insert(0);
        *quantity = quantity
            .checked_add(item.quantity)
            .ok_or_else(|| OrderError::InvalidQuantity(item.product_id.to_string()))?;
    }

    Ok(lines)
}

/// Price every line against the catalog and check stock.
fn price_lines(
    lines: &BTreeMap<ProductId, u32>,
    products: &HashMap<ProductId, Product>,
) -> Result<(Vec<OrderItem>, Price), OrderError> {
    let mut items = Vec::with_capacity(lines.len());
    let mut total = Price::ZERO;

    for (product_id, &quantity) in lines {
        let product = products
            .get(product_id)
            .ok_or_else(|| OrderError::ProductUnavailable(product_id.to_string()))?;

        if product.stock < quantity {
            return Err(OrderError::InsufficientStock(product.name.to_string()));
        }

        total = total.checked_add(product.price.times(quantity)?)?;
        items.push(OrderItem {
            product_id: *product_id,
            quantity,
            unit_price: product.price,
        });
    }

    Ok((items, total))
}

#[async_trait]
impl<OR, PR> OrderServicePort for OrderService<OR, PR>
where
    OR: OrderRepository,
    PR: ProductRepository,
{
    async fn checkout(
        &self,
        user_id: UserId,
        command: CheckoutCommand,
    ) -> Result<Order, OrderError> {
        let lines = merge_cart(command.items)?;

        let ids: Vec<ProductId> = lines.keys().copied().collect();
        let products: HashMap<ProductId, Product> = self
            .products
            .find_by_ids(&ids)
            .await
            .map_err(|e| OrderError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        let (items, total) = price_lines(&lines, &products)?;

        let order = Order {
            id: OrderId::new(),
            user_id,
            total,
            status: OrderStatus::Pending,
            address: command.address,
            items,
            created_at: Utc::now(),
        };

        let placed = self.orders.place(order).await?;
        tracing::info!(
            order_id = %placed.id,
            user_id = %placed.user_id,
            total_cents = placed.total.cents(),
            lines = placed.items.len(),
            "Order placed"
        );

        Ok(placed)
    }

    async fn list_orders(&self, user_id: &UserId) -> Result<Vec<Order>, OrderError> {
        self.orders.find_by_user(user_id).await
    }
}
