pub mod blacklist;
pub mod categories;
pub mod dishes;
pub mod order_items;
pub mod orders;
pub mod restaurants;
pub mod users;

pub use blacklist as blacklist_entity;
pub use categories as category_entity;
pub use dishes as dish_entity;
pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use restaurants as restaurant_entity;
pub use users as user_entity;

pub use categories::DEFAULT_CATEGORY_NAMES;
pub use orders::OrderStatus;
pub use users::UserRole;
