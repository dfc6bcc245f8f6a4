use crate::entities::{OrderStatus, dishes, order_items, orders, restaurants, users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::access;
use crate::services::cart_service::CartStore;
use crate::services::context_builder::ContextCache;
use crate::utils::{PaginatedResponse, PaginationParams};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    cart_store: CartStore,
    context_cache: ContextCache,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection, cart_store: CartStore, context_cache: ContextCache) -> Self {
        Self {
            pool,
            cart_store,
            context_cache,
        }
    }

    /// 购物车结算: 订单 + 明细 + 计数器在同一事务内落库
    pub async fn checkout(&self, user_id: i64, req: CheckoutRequest) -> AppResult<CheckoutResponse> {
        let lines = self.cart_store.lines(user_id);
        if lines.is_empty() {
            return Err(AppError::ValidationError("购物车是空的".to_string()));
        }

        let restaurant_id = lines[0].restaurant_id;
        if lines.iter().any(|l| l.restaurant_id != restaurant_id) {
            return Err(AppError::ValidationError(
                "购物车包含多家餐厅的菜品, 请分开结算".to_string(),
            ));
        }

        access::ensure_restaurant(&self.pool, restaurant_id).await?;

        let txn = self.pool.begin().await?;

        // 加入购物车后菜品可能被删, 结算前先核对
        for line in &lines {
            dishes::Entity::find_by_id(line.dish_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("菜品 {} 不存在", line.dish_name)))?;
        }

        // 按加入购物车时的快照价格成交
        let total_amount = round2(
            lines
                .iter()
                .map(|line| line.price * line.quantity as f64)
                .sum(),
        );
        let now = Utc::now();

        let order = orders::ActiveModel {
            user_id: Set(user_id),
            restaurant_id: Set(restaurant_id),
            total_amount: Set(total_amount),
            status: Set(OrderStatus::Paid),
            remarks: Set(req.remarks),
            created_at: Set(now),
            paid_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for line in &lines {
            order_items::ActiveModel {
                order_id: Set(order.id),
                dish_id: Set(line.dish_id),
                quantity: Set(line.quantity),
                price_at_time: Set(line.price),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            // 销量计数只在结算时累加一次
            dishes::Entity::update_many()
                .col_expr(
                    dishes::Column::OrderCount,
                    Expr::col(dishes::Column::OrderCount).add(line.quantity),
                )
                .filter(dishes::Column::Id.eq(line.dish_id))
                .exec(&txn)
                .await?;
        }

        restaurants::Entity::update_many()
            .col_expr(
                restaurants::Column::TotalSales,
                Expr::col(restaurants::Column::TotalSales).add(total_amount),
            )
            .filter(restaurants::Column::Id.eq(restaurant_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        self.cart_store.clear(user_id);
        self.context_cache.invalidate(restaurant_id);

        Ok(CheckoutResponse {
            order_id: order.id,
            total_amount,
            message: "下单成功".to_string(),
        })
    }

    /// 商家推动订单状态, 只允许状态机内的迁移
    pub async fn update_status(
        &self,
        restaurant_id: i64,
        order_id: i64,
        user_id: i64,
        req: UpdateOrderStatusRequest,
    ) -> AppResult<OrderResponse> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;

        let order = orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("订单不存在".to_string()))?;
        if order.restaurant_id != restaurant_id {
            return Err(AppError::NotFound("订单不存在".to_string()));
        }

        let from = order.status;
        if !from.can_transition_to(&req.status) {
            return Err(AppError::InvalidTransition {
                from,
                to: req.status,
            });
        }

        // 条件更新: 只有状态仍是读到的 from 时才写, 并发迁移只会有一个生效
        let mut update = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(req.status.clone()))
            .filter(orders::Column::Id.eq(order_id))
            .filter(orders::Column::Status.eq(from.clone()));
        if from == OrderStatus::Pending && req.status == OrderStatus::Paid {
            update = update.col_expr(orders::Column::PaidAt, Expr::value(Utc::now()));
        }
        let result = update.exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::InvalidTransition {
                from,
                to: req.status,
            });
        }

        let updated = orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("订单不存在".to_string()))?;

        self.context_cache.invalidate(restaurant_id);
        Ok(OrderResponse::from(updated))
    }

    pub async fn list_customer_orders(
        &self,
        user_id: i64,
        query: OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut select = orders::Entity::find().filter(orders::Column::UserId.eq(user_id));
        if let Some(status) = query.status {
            select = select.filter(orders::Column::Status.eq(status));
        }

        let total = select.clone().count(&self.pool).await? as i64;
        let items = select
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(OrderResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn list_restaurant_orders(
        &self,
        restaurant_id: i64,
        user_id: i64,
        query: OrderQuery,
    ) -> AppResult<(PaginatedResponse<OrderResponse>, StatusCounts)> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;

        let params = PaginationParams::new(query.page, query.per_page);
        let mut select =
            orders::Entity::find().filter(orders::Column::RestaurantId.eq(restaurant_id));
        if let Some(status) = query.status.clone() {
            select = select.filter(orders::Column::Status.eq(status));
        }

        let total = select.clone().count(&self.pool).await? as i64;
        let items = select
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;

        let counts = self.status_counts(restaurant_id).await?;
        Ok((
            PaginatedResponse::new(
                items.into_iter().map(OrderResponse::from).collect(),
                &params,
                total,
            ),
            counts,
        ))
    }

    pub async fn get_order_detail(
        &self,
        order_id: i64,
        user_id: i64,
    ) -> AppResult<OrderDetailResponse> {
        let order = orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("订单不存在".to_string()))?;

        // 下单顾客或餐厅老板可见
        if order.user_id != user_id {
            access::ensure_owner(&self.pool, order.restaurant_id, user_id).await?;
        }

        let customer = users::Entity::find_by_id(order.user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

        let rows = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order.id))
            .find_also_related(dishes::Entity)
            .all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(|(item, dish)| {
                let name = dish.map(|d| d.name).unwrap_or_else(|| "已删除菜品".to_string());
                OrderItemResponse::from_item(item, name)
            })
            .collect();

        Ok(OrderDetailResponse {
            order: OrderResponse::from(order),
            customer_name: customer.username,
            items,
        })
    }

    async fn status_counts(&self, restaurant_id: i64) -> AppResult<StatusCounts> {
        let mut counts = StatusCounts::default();
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            let n = orders::Entity::find()
                .filter(orders::Column::RestaurantId.eq(restaurant_id))
                .filter(orders::Column::Status.eq(status.clone()))
                .count(&self.pool)
                .await? as i64;
            match status {
                OrderStatus::Pending => counts.pending = n,
                OrderStatus::Paid => counts.paid = n,
                OrderStatus::Completed => counts.completed = n,
                OrderStatus::Cancelled => counts.cancelled = n,
            }
        }
        Ok(counts)
    }
}
