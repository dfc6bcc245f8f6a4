pub mod advisor;
pub mod auth;
pub mod cart;
pub mod common;
pub mod customer;
pub mod dish;
pub mod order;
pub mod report;
pub mod restaurant;

pub use advisor::*;
pub use auth::*;
pub use cart::*;
pub use common::*;
pub use customer::*;
pub use dish::*;
pub use order::*;
pub use report::*;
pub use restaurant::*;
