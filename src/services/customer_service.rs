use crate::entities::{OrderStatus, blacklist, dishes, order_items, orders, users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::access;
use crate::utils::{PaginatedResponse, PaginationParams};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use std::collections::HashSet;

const FAVORITE_DISH_LIMIT: u64 = 5;

#[derive(Clone)]
pub struct CustomerService {
    pool: DatabaseConnection,
}

impl CustomerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 客户花名册: 在本店下过单的所有顾客及其消费汇总
    pub async fn list_customers(
        &self,
        restaurant_id: i64,
        user_id: i64,
        query: CustomerQuery,
    ) -> AppResult<PaginatedResponse<CustomerSummary>> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;
        let params = PaginationParams::new(query.page, query.per_page);

        let sort_expr = match query.sort_by.as_deref() {
            Some("order_count") => Expr::col(Alias::new("order_count")),
            Some("last_order") => Expr::col(Alias::new("last_order_at")),
            _ => Expr::col(Alias::new("total_spent")),
        };

        let total = orders::Entity::find()
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .select_only()
            .column(orders::Column::UserId)
            .distinct()
            .count(&self.pool)
            .await? as i64;

        let rows: Vec<(i64, String, i64, Option<f64>, Option<DateTime<Utc>>)> =
            orders::Entity::find()
                .select_only()
                .column_as(orders::Column::UserId, "user_id")
                .column_as(
                    Expr::col((users::Entity, users::Column::Username)),
                    "username",
                )
                .column_as(orders::Column::Id.count(), "order_count")
                .column_as(orders::Column::TotalAmount.sum(), "total_spent")
                .column_as(orders::Column::CreatedAt.max(), "last_order_at")
                .join(JoinType::InnerJoin, orders::Relation::User.def())
                .filter(orders::Column::RestaurantId.eq(restaurant_id))
                .group_by(orders::Column::UserId)
                .group_by(Expr::col((users::Entity, users::Column::Username)))
                .order_by(sort_expr, Order::Desc)
                .order_by(orders::Column::UserId, Order::Asc)
                .offset(params.get_offset() as u64)
                .limit(params.get_limit() as u64)
                .into_tuple()
                .all(&self.pool)
                .await?;

        let blacklisted = self.blacklisted_user_ids(restaurant_id).await?;
        let items = rows
            .into_iter()
            .map(
                |(user_id, username, order_count, spent, last_order_at)| CustomerSummary {
                    user_id,
                    username,
                    order_count,
                    total_spent: spent.unwrap_or(0.0),
                    last_order_at,
                    is_blacklisted: blacklisted.contains(&user_id),
                },
            )
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_customer_detail(
        &self,
        restaurant_id: i64,
        customer_id: i64,
        user_id: i64,
    ) -> AppResult<CustomerDetailResponse> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;

        let customer = users::Entity::find_by_id(customer_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

        let rows: Vec<(i64, Option<f64>, Option<DateTime<Utc>>, Option<DateTime<Utc>>)> =
            orders::Entity::find()
                .select_only()
                .column_as(orders::Column::Id.count(), "order_count")
                .column_as(orders::Column::TotalAmount.sum(), "total_spent")
                .column_as(orders::Column::CreatedAt.min(), "first_order_at")
                .column_as(orders::Column::CreatedAt.max(), "last_order_at")
                .filter(orders::Column::RestaurantId.eq(restaurant_id))
                .filter(orders::Column::UserId.eq(customer_id))
                .into_tuple()
                .all(&self.pool)
                .await?;
        let (order_count, total_spent, first_order_at, last_order_at) = rows
            .into_iter()
            .next()
            .map(|(c, s, f, l)| (c, s.unwrap_or(0.0), f, l))
            .unwrap_or((0, 0.0, None, None));

        let favorite_dishes = self
            .favorite_dishes(restaurant_id, customer_id)
            .await?;

        let entry = blacklist::Entity::find()
            .filter(blacklist::Column::RestaurantId.eq(restaurant_id))
            .filter(blacklist::Column::UserId.eq(customer_id))
            .one(&self.pool)
            .await?;

        Ok(CustomerDetailResponse {
            user_id: customer.id,
            username: customer.username,
            email: customer.email,
            order_count,
            total_spent,
            first_order_at,
            last_order_at,
            favorite_dishes,
            is_blacklisted: entry.is_some(),
            blacklist_reason: entry.and_then(|e| e.reason),
        })
    }

    // ---------- 黑名单 ----------

    pub async fn list_blacklist(
        &self,
        restaurant_id: i64,
        user_id: i64,
        params: PaginationParams,
    ) -> AppResult<PaginatedResponse<BlacklistEntryResponse>> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;

        let total = blacklist::Entity::find()
            .filter(blacklist::Column::RestaurantId.eq(restaurant_id))
            .count(&self.pool)
            .await? as i64;
        let rows = blacklist::Entity::find()
            .filter(blacklist::Column::RestaurantId.eq(restaurant_id))
            .find_also_related(users::Entity)
            .order_by_desc(blacklist::Column::CreatedAt)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(|(entry, user)| BlacklistEntryResponse {
                id: entry.id,
                user_id: entry.user_id,
                username: user.map(|u| u.username).unwrap_or_default(),
                reason: entry.reason,
                created_at: entry.created_at,
            })
            .collect();
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn add_to_blacklist(
        &self,
        restaurant_id: i64,
        user_id: i64,
        req: AddBlacklistRequest,
    ) -> AppResult<BlacklistEntryResponse> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;

        let target = users::Entity::find_by_id(req.user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;
        if target.id == user_id {
            return Err(AppError::ValidationError(
                "不能将自己加入黑名单".to_string(),
            ));
        }

        if blacklist::Entity::find()
            .filter(blacklist::Column::RestaurantId.eq(restaurant_id))
            .filter(blacklist::Column::UserId.eq(req.user_id))
            .one(&self.pool)
            .await?
            .is_some()
        {
            return Err(AppError::ValidationError("该用户已在黑名单中".to_string()));
        }

        let entry = blacklist::ActiveModel {
            restaurant_id: Set(restaurant_id),
            user_id: Set(req.user_id),
            reason: Set(req.reason),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(BlacklistEntryResponse {
            id: entry.id,
            user_id: entry.user_id,
            username: target.username,
            reason: entry.reason,
            created_at: entry.created_at,
        })
    }

    pub async fn remove_from_blacklist(
        &self,
        restaurant_id: i64,
        target_user_id: i64,
        user_id: i64,
    ) -> AppResult<()> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;

        let entry = blacklist::Entity::find()
            .filter(blacklist::Column::RestaurantId.eq(restaurant_id))
            .filter(blacklist::Column::UserId.eq(target_user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("该用户不在黑名单中".to_string()))?;

        blacklist::Entity::delete_by_id(entry.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    async fn favorite_dishes(
        &self,
        restaurant_id: i64,
        customer_id: i64,
    ) -> AppResult<Vec<FavoriteDish>> {
        let rows: Vec<(i64, String, Option<i64>)> = order_items::Entity::find()
            .select_only()
            .column_as(order_items::Column::DishId, "dish_id")
            .column_as(
                Expr::col((dishes::Entity, dishes::Column::Name)),
                "dish_name",
            )
            .column_as(order_items::Column::Quantity.sum(), "total_quantity")
            .join(JoinType::InnerJoin, order_items::Relation::Dish.def())
            .join(JoinType::InnerJoin, order_items::Relation::Order.def())
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .filter(orders::Column::UserId.eq(customer_id))
            .filter(orders::Column::Status.eq(OrderStatus::Paid))
            .group_by(order_items::Column::DishId)
            .group_by(Expr::col((dishes::Entity, dishes::Column::Name)))
            .order_by(Expr::col(Alias::new("total_quantity")), Order::Desc)
            .order_by(order_items::Column::DishId, Order::Asc)
            .limit(FAVORITE_DISH_LIMIT)
            .into_tuple()
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(dish_id, dish_name, qty)| FavoriteDish {
                dish_id,
                dish_name,
                total_quantity: qty.unwrap_or(0),
            })
            .collect())
    }

    async fn blacklisted_user_ids(&self, restaurant_id: i64) -> AppResult<HashSet<i64>> {
        let ids: Vec<i64> = blacklist::Entity::find()
            .select_only()
            .column(blacklist::Column::UserId)
            .filter(blacklist::Column::RestaurantId.eq(restaurant_id))
            .into_tuple()
            .all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }
}
