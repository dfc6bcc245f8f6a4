use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::orders::OrderStatus;
use crate::entities::users::UserRole;
use crate::handlers;
use crate::models::*;
use crate::utils::{
    PaginatedBlacklistResponse, PaginatedCustomerResponse, PaginatedDishResponse,
    PaginatedOrderResponse, PaginationInfo, PaginationParams,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::auth::profile,
        handlers::auth::change_password,
        handlers::auth::change_username,
        handlers::restaurant::list_restaurants,
        handlers::restaurant::create_restaurant,
        handlers::restaurant::my_restaurant,
        handlers::restaurant::get_restaurant,
        handlers::restaurant::update_restaurant,
        handlers::restaurant::get_menu,
        handlers::restaurant::get_dashboard,
        handlers::category::list_categories,
        handlers::category::create_category,
        handlers::category::update_category,
        handlers::category::delete_category,
        handlers::dish::list_dishes,
        handlers::dish::create_dish,
        handlers::dish::get_dish,
        handlers::dish::update_dish,
        handlers::dish::toggle_dish,
        handlers::dish::delete_dish,
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::update_item,
        handlers::cart::checkout,
        handlers::order::list_my_orders,
        handlers::order::get_order_detail,
        handlers::order::list_restaurant_orders,
        handlers::order::update_order_status,
        handlers::report::full_report,
        handlers::customer::list_customers,
        handlers::customer::get_customer_detail,
        handlers::customer::list_blacklist,
        handlers::customer::add_to_blacklist,
        handlers::customer::remove_from_blacklist,
        handlers::advisor::ask_advisor,
        handlers::advisor::ask_dish,
    ),
    components(
        schemas(
            UserRole,
            OrderStatus,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            ChangePasswordRequest,
            ChangeUsernameRequest,
            UserResponse,
            AuthResponse,
            RefreshResponse,
            CreateRestaurantRequest,
            UpdateRestaurantRequest,
            RestaurantResponse,
            DashboardResponse,
            CategoryResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateDishRequest,
            UpdateDishRequest,
            DishResponse,
            MenuQuery,
            MenuCategory,
            CartLine,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartResponse,
            UpdateCartItemResponse,
            CheckoutRequest,
            CheckoutResponse,
            OrderQuery,
            UpdateOrderStatusRequest,
            OrderResponse,
            OrderItemResponse,
            OrderDetailResponse,
            StatusCounts,
            Period,
            ReportQuery,
            ReportResponse,
            SalesSummary,
            DishStat,
            TopCustomer,
            DailySales,
            CategorySales,
            CustomerQuery,
            CustomerSummary,
            FavoriteDish,
            CustomerDetailResponse,
            AddBlacklistRequest,
            BlacklistEntryResponse,
            AdvisorRequest,
            AdvisorResponse,
            DishAskRequest,
            ApiError,
            PaginationParams,
            PaginationInfo,
            PaginatedDishResponse,
            PaginatedOrderResponse,
            PaginatedCustomerResponse,
            PaginatedBlacklistResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "注册登录与账号管理"),
        (name = "restaurant", description = "餐厅信息与菜单"),
        (name = "category", description = "菜单分类管理"),
        (name = "dish", description = "菜品管理"),
        (name = "cart", description = "购物车与结算"),
        (name = "order", description = "订单查询与状态流转"),
        (name = "report", description = "经营报表"),
        (name = "customer", description = "顾客画像与黑名单"),
        (name = "advisor", description = "AI 经营顾问"),
    ),
    info(
        title = "点餐后台 API",
        version = "1.0.0",
        description = "多租户餐厅点餐与经营管理后台 REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
