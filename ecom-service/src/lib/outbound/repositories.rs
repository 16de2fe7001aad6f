pub mod memory;
pub mod order;
pub mod product;
pub mod user;

pub use memory::InMemoryStore;
pub use order::PostgresOrderRepository;
pub use product::PostgresProductRepository;
pub use user::PostgresUserRepository;
