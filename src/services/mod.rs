// Storefront services working directly with entities
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod users;

// Re-export services for convenience
pub use cart::CartService;
pub use catalog::CatalogService;
pub use orders::OrderService;
pub use users::UserService;
