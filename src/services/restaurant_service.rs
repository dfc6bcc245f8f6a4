use crate::entities::{
    DEFAULT_CATEGORY_NAMES, OrderStatus, UserRole, categories, dishes, orders, restaurants, users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::access;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct RestaurantService {
    pool: DatabaseConnection,
}

impl RestaurantService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 创建餐厅并初始化默认分类, 同一事务内完成
    pub async fn create_restaurant(
        &self,
        user_id: i64,
        req: CreateRestaurantRequest,
    ) -> AppResult<RestaurantResponse> {
        let name = req.name.trim().to_string();
        if name.is_empty() || name.chars().count() > 100 {
            return Err(AppError::ValidationError(
                "餐厅名称长度必须在1-100字符之间".to_string(),
            ));
        }

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;
        if user.role != UserRole::Owner {
            return Err(AppError::Forbidden("只有商家账号可以创建餐厅".to_string()));
        }

        if access::find_owned_restaurant(&self.pool, user_id)
            .await?
            .is_some()
        {
            return Err(AppError::ValidationError("您已经创建过餐厅".to_string()));
        }
        if restaurants::Entity::find()
            .filter(restaurants::Column::Name.eq(name.clone()))
            .one(&self.pool)
            .await?
            .is_some()
        {
            return Err(AppError::ValidationError("餐厅名称已被使用".to_string()));
        }

        let txn = self.pool.begin().await?;

        let now = Utc::now();
        let restaurant = restaurants::ActiveModel {
            name: Set(name),
            description: Set(req.description),
            owner_id: Set(user_id),
            total_sales: Set(0.0),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for cat_name in DEFAULT_CATEGORY_NAMES {
            categories::ActiveModel {
                restaurant_id: Set(restaurant.id),
                name: Set(cat_name.to_string()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(RestaurantResponse::from(restaurant))
    }

    /// 顾客首页餐厅列表, 按累计销售额倒序
    pub async fn list_restaurants(&self) -> AppResult<Vec<RestaurantResponse>> {
        let restaurants = restaurants::Entity::find()
            .order_by_desc(restaurants::Column::TotalSales)
            .all(&self.pool)
            .await?;
        Ok(restaurants
            .into_iter()
            .map(RestaurantResponse::from)
            .collect())
    }

    pub async fn get_restaurant(&self, restaurant_id: i64) -> AppResult<RestaurantResponse> {
        let restaurant = access::ensure_restaurant(&self.pool, restaurant_id).await?;
        Ok(RestaurantResponse::from(restaurant))
    }

    pub async fn get_my_restaurant(&self, user_id: i64) -> AppResult<RestaurantResponse> {
        let restaurant = access::find_owned_restaurant(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("您还没有创建餐厅".to_string()))?;
        Ok(RestaurantResponse::from(restaurant))
    }

    pub async fn update_restaurant(
        &self,
        restaurant_id: i64,
        user_id: i64,
        req: UpdateRestaurantRequest,
    ) -> AppResult<RestaurantResponse> {
        let restaurant = access::ensure_owner(&self.pool, restaurant_id, user_id).await?;

        if let Some(name) = &req.name {
            let name = name.trim();
            if name.is_empty() || name.chars().count() > 100 {
                return Err(AppError::ValidationError(
                    "餐厅名称长度必须在1-100字符之间".to_string(),
                ));
            }
            if let Some(existing) = restaurants::Entity::find()
                .filter(restaurants::Column::Name.eq(name.to_string()))
                .one(&self.pool)
                .await?
                && existing.id != restaurant_id
            {
                return Err(AppError::ValidationError("餐厅名称已被使用".to_string()));
            }
        }

        let mut am = restaurant.into_active_model();
        if let Some(name) = req.name {
            am.name = Set(name.trim().to_string());
        }
        if let Some(description) = req.description {
            am.description = Set(Some(description));
        }
        let updated = am.update(&self.pool).await?;
        Ok(RestaurantResponse::from(updated))
    }

    /// 商家经营概览
    pub async fn get_dashboard(
        &self,
        restaurant_id: i64,
        user_id: i64,
    ) -> AppResult<DashboardResponse> {
        let restaurant = access::ensure_owner(&self.pool, restaurant_id, user_id).await?;

        let total_orders = orders::Entity::find()
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .count(&self.pool)
            .await? as i64;
        let pending_orders = orders::Entity::find()
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .filter(orders::Column::Status.eq(OrderStatus::Pending))
            .count(&self.pool)
            .await? as i64;
        let paid_orders = orders::Entity::find()
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .filter(orders::Column::Status.eq(OrderStatus::Paid))
            .count(&self.pool)
            .await? as i64;
        let dish_count = dishes::Entity::find()
            .filter(dishes::Column::RestaurantId.eq(restaurant_id))
            .filter(dishes::Column::IsActive.eq(true))
            .count(&self.pool)
            .await? as i64;
        let customer_count = orders::Entity::find()
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .select_only()
            .column(orders::Column::UserId)
            .distinct()
            .count(&self.pool)
            .await? as i64;

        let total_sales = restaurant.total_sales;
        Ok(DashboardResponse {
            restaurant: RestaurantResponse::from(restaurant),
            total_sales,
            total_orders,
            pending_orders,
            paid_orders,
            dish_count,
            customer_count,
        })
    }
}
