pub mod access;
pub mod advisor_service;
pub mod auth_service;
pub mod cart_service;
pub mod context_builder;
pub mod customer_service;
pub mod dish_service;
pub mod order_service;
pub mod report_service;
pub mod restaurant_service;

pub use advisor_service::AdvisorService;
pub use auth_service::AuthService;
pub use cart_service::{CartService, CartStore};
pub use context_builder::{ContextBuilder, ContextCache};
pub use customer_service::CustomerService;
pub use dish_service::DishService;
pub use order_service::OrderService;
pub use report_service::ReportService;
pub use restaurant_service::RestaurantService;
