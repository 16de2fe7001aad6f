//! Postgres adapters against a real database. Run with `cargo test -- --ignored`
//! and a server reachable at `DATABASE_URL`.

mod common;

use chrono::Utc;
use common::db::TestDb;
use ecom_service::domain::order::errors::OrderError;
use ecom_service::domain::order::models::Order;
use ecom_service::domain::order::models::OrderId;
use ecom_service::domain::order::models::OrderItem;
use ecom_service::domain::order::models::OrderStatus;
use ecom_service::domain::order::models::ShippingAddress;
use ecom_service::domain::order::ports::OrderRepository;
use ecom_service::domain::product::models::Price;
use ecom_service::domain::product::models::Product;
use ecom_service::domain::product::models::ProductId;
use ecom_service::domain::product::models::ProductName;
use ecom_service::domain::product::ports::ProductRepository;
use ecom_service::domain::user::errors::UserError;
use ecom_service::domain::user::models::EmailAddress;
use ecom_service::domain::user::models::PersonName;
use ecom_service::domain::user::models::User;
use ecom_service::domain::user::models::UserId;
use ecom_service::domain::user::ports::UserRepository;
use ecom_service::outbound::repositories::PostgresOrderRepository;
use ecom_service::outbound::repositories::PostgresProductRepository;
use ecom_service::outbound::repositories::PostgresUserRepository;

fn user(email: &str) -> User {
    User {
        id: UserId::new(),
        first_name: PersonName::new("john".to_string()).unwrap(),
        last_name: PersonName::new("doe".to_string()).unwrap(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        password_hash: "hash".to_string(),
        created_at: Utc::now(),
    }
}

fn product(name: &str, stock: u32) -> Product {
    Product {
        id: ProductId::new(),
        name: ProductName::new(name.to_string()).unwrap(),
        description: format!("A {}", name),
        image_url: String::new(),
        price: Price::from_cents(500).unwrap(),
        stock,
        created_at: Utc::now(),
    }
}

fn order_for(user_id: UserId, lines: &[(ProductId, u32)]) -> Order {
    Order {
        id: OrderId::new(),
        user_id,
        total: Price::from_cents(500 * lines.iter().map(|&(_, q)| i64::from(q)).sum::<i64>())
            .unwrap(),
        status: OrderStatus::Pending,
        address: ShippingAddress::new("Rua A, 123".to_string()).unwrap(),
        items: lines
            .iter()
            .map(|&(product_id, quantity)| OrderItem {
                product_id,
                quantity,
                unit_price: Price::from_cents(500).unwrap(),
            })
            .collect(),
        created_at: Utc::now(),
    }
}

async fn stock_of(products: &PostgresProductRepository, id: &ProductId) -> u32 {
    products
        .find_by_id(id)
        .await
        .unwrap()
        .expect("Product should exist")
        .stock
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_duplicate_email_rejected() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());

    let created = users.create(user("john@example.com")).await.unwrap();
    let result = users.create(user("john@example.com")).await;

    assert!(matches!(
        result,
        Err(UserError::EmailAlreadyExists(email)) if email == "john@example.com"
    ));

    let found = users
        .find_by_email(&created.email)
        .await
        .unwrap()
        .expect("User should exist");
    assert_eq!(found.id, created.id);
    assert!(users.find_by_id(&UserId::new()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_place_decrements_stock_and_persists_items() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let products = PostgresProductRepository::new(db.pool.clone());
    let orders = PostgresOrderRepository::new(db.pool.clone());

    let buyer = users.create(user("john@example.com")).await.unwrap();
    let mug = products.create(product("mug", 5)).await.unwrap();
    let pen = products.create(product("pen", 4)).await.unwrap();

    let placed = orders
        .place(order_for(buyer.id, &[(mug.id, 2), (pen.id, 4)]))
        .await
        .unwrap();

    assert_eq!(stock_of(&products, &mug.id).await, 3);
    assert_eq!(stock_of(&products, &pen.id).await, 0);

    let fetched = products.find_by_ids(&[mug.id, pen.id]).await.unwrap();
    assert_eq!(fetched.len(), 2);

    let history = orders.find_by_user(&buyer.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, placed.id);
    assert_eq!(history[0].status, OrderStatus::Pending);
    assert_eq!(history[0].total.cents(), 3000);

    let mut quantities: Vec<(ProductId, u32)> = history[0]
        .items
        .iter()
        .map(|item| (item.product_id, item.quantity))
        .collect();
    quantities.sort();
    let mut expected = vec![(mug.id, 2), (pen.id, 4)];
    expected.sort();
    assert_eq!(quantities, expected);
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_place_is_all_or_nothing() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let products = PostgresProductRepository::new(db.pool.clone());
    let orders = PostgresOrderRepository::new(db.pool.clone());

    let buyer = users.create(user("john@example.com")).await.unwrap();
    let mug = products.create(product("mug", 5)).await.unwrap();
    let pen = products.create(product("pen", 1)).await.unwrap();

    let result = orders
        .place(order_for(buyer.id, &[(mug.id, 2), (pen.id, 3)]))
        .await;

    assert!(matches!(result, Err(OrderError::InsufficientStock(name)) if name == "pen"));
    assert_eq!(stock_of(&products, &mug.id).await, 5);
    assert_eq!(stock_of(&products, &pen.id).await, 1);
    assert!(orders.find_by_user(&buyer.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_place_unknown_product_leaves_stock_untouched() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let products = PostgresProductRepository::new(db.pool.clone());
    let orders = PostgresOrderRepository::new(db.pool.clone());

    let buyer = users.create(user("john@example.com")).await.unwrap();
    let mug = products.create(product("mug", 5)).await.unwrap();

    let result = orders
        .place(order_for(buyer.id, &[(mug.id, 1), (ProductId::new(), 1)]))
        .await;

    assert!(matches!(result, Err(OrderError::ProductUnavailable(_))));
    assert_eq!(stock_of(&products, &mug.id).await, 5);
    assert!(orders.find_by_user(&buyer.id).await.unwrap().is_empty());
}
