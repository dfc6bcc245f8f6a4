pub mod jwt;
pub mod pagination;
pub mod password;

pub use jwt::{Claims, JwtService};
pub use pagination::{
    PaginatedBlacklistResponse, PaginatedCustomerResponse, PaginatedDishResponse,
    PaginatedOrderResponse, PaginatedResponse, PaginationInfo, PaginationParams,
};
pub use password::{hash_password, validate_password, verify_password};
