use crate::entities::{OrderStatus, dishes, order_items, orders, users};
use crate::error::AppResult;
use crate::models::*;
use crate::services::access;
use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, Order, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use std::collections::HashMap;

const DEFAULT_TOP_N: u64 = 10;
const DEFAULT_DAILY_DAYS: u32 = 7;

/// 统计口径: 只计 paid 状态订单, pending/cancelled 一律不计入营收
#[derive(Clone)]
pub struct ReportService {
    pool: DatabaseConnection,
}

impl ReportService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 一次拉全量报表, 单项统计失败降级为空而不是整页报错
    pub async fn full_report(
        &self,
        restaurant_id: i64,
        user_id: i64,
        query: ReportQuery,
    ) -> AppResult<ReportResponse> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;

        let period = query.period.unwrap_or_default();
        let top_n = query.top_n.unwrap_or(DEFAULT_TOP_N);
        let days = query.days.unwrap_or(DEFAULT_DAILY_DAYS);

        let summary = match self.sales_summary(restaurant_id, period).await {
            Ok(s) => s,
            Err(e) => {
                log::error!("Sales summary failed for restaurant {restaurant_id}: {e}");
                SalesSummary {
                    period,
                    total_sales: 0.0,
                    order_count: 0,
                    average_order_amount: 0.0,
                }
            }
        };
        let top_dishes = self
            .top_dishes(restaurant_id, period, top_n)
            .await
            .unwrap_or_else(|e| {
                log::error!("Top dishes failed for restaurant {restaurant_id}: {e}");
                Vec::new()
            });
        let top_customers = self
            .top_customers(restaurant_id, period, top_n)
            .await
            .unwrap_or_else(|e| {
                log::error!("Top customers failed for restaurant {restaurant_id}: {e}");
                Vec::new()
            });
        let daily_sales = self
            .daily_sales(restaurant_id, days)
            .await
            .unwrap_or_else(|e| {
                log::error!("Daily sales failed for restaurant {restaurant_id}: {e}");
                Vec::new()
            });
        let category_sales = self
            .category_sales(restaurant_id, period)
            .await
            .unwrap_or_else(|e| {
                log::error!("Category sales failed for restaurant {restaurant_id}: {e}");
                Vec::new()
            });

        Ok(ReportResponse {
            summary,
            top_dishes,
            top_customers,
            daily_sales,
            category_sales,
        })
    }

    pub async fn sales_summary(
        &self,
        restaurant_id: i64,
        period: Period,
    ) -> AppResult<SalesSummary> {
        let mut select = orders::Entity::find()
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .filter(orders::Column::Status.eq(OrderStatus::Paid));
        if let Some(start) = period.start_bound(Utc::now()) {
            select = select.filter(orders::Column::CreatedAt.gte(start));
        }

        let rows: Vec<(Option<f64>, i64)> = select
            .select_only()
            .column_as(orders::Column::TotalAmount.sum(), "total_sales")
            .column_as(orders::Column::Id.count(), "order_count")
            .into_tuple()
            .all(&self.pool)
            .await?;

        let (total_sales, order_count) = rows
            .into_iter()
            .next()
            .map(|(s, c)| (s.unwrap_or(0.0), c))
            .unwrap_or((0.0, 0));
        let average = if order_count > 0 {
            total_sales / order_count as f64
        } else {
            0.0
        };

        Ok(SalesSummary {
            period,
            total_sales,
            order_count,
            average_order_amount: average,
        })
    }

    /// 热销菜品, 销量并列时按菜品 id 升序保证结果稳定
    pub async fn top_dishes(
        &self,
        restaurant_id: i64,
        period: Period,
        top_n: u64,
    ) -> AppResult<Vec<DishStat>> {
        let revenue = Expr::expr(
            Expr::col((order_items::Entity, order_items::Column::PriceAtTime))
                .mul(Expr::col((order_items::Entity, order_items::Column::Quantity))),
        )
        .sum();

        let mut select = order_items::Entity::find()
            .select_only()
            .column_as(order_items::Column::DishId, "dish_id")
            .column_as(
                Expr::col((dishes::Entity, dishes::Column::Name)),
                "dish_name",
            )
            .column_as(order_items::Column::Quantity.sum(), "total_quantity")
            .column_as(revenue, "total_revenue")
            .join(JoinType::InnerJoin, order_items::Relation::Dish.def())
            .join(JoinType::InnerJoin, order_items::Relation::Order.def())
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .filter(orders::Column::Status.eq(OrderStatus::Paid));
        if let Some(start) = period.start_bound(Utc::now()) {
            select = select.filter(orders::Column::CreatedAt.gte(start));
        }

        let rows: Vec<(i64, String, Option<i64>, Option<f64>)> = select
            .group_by(order_items::Column::DishId)
            .group_by(Expr::col((dishes::Entity, dishes::Column::Name)))
            .order_by(Expr::col(Alias::new("total_quantity")), Order::Desc)
            .order_by(order_items::Column::DishId, Order::Asc)
            .limit(top_n)
            .into_tuple()
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(dish_id, dish_name, qty, revenue)| DishStat {
                dish_id,
                dish_name,
                total_quantity: qty.unwrap_or(0),
                total_revenue: revenue.unwrap_or(0.0),
            })
            .collect())
    }

    pub async fn top_customers(
        &self,
        restaurant_id: i64,
        period: Period,
        top_n: u64,
    ) -> AppResult<Vec<TopCustomer>> {
        let mut select = orders::Entity::find()
            .select_only()
            .column_as(orders::Column::UserId, "user_id")
            .column_as(
                Expr::col((users::Entity, users::Column::Username)),
                "username",
            )
            .column_as(orders::Column::Id.count(), "order_count")
            .column_as(orders::Column::TotalAmount.sum(), "total_spent")
            .join(JoinType::InnerJoin, orders::Relation::User.def())
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .filter(orders::Column::Status.eq(OrderStatus::Paid));
        if let Some(start) = period.start_bound(Utc::now()) {
            select = select.filter(orders::Column::CreatedAt.gte(start));
        }

        let rows: Vec<(i64, String, i64, Option<f64>)> = select
            .group_by(orders::Column::UserId)
            .group_by(Expr::col((users::Entity, users::Column::Username)))
            .order_by(Expr::col(Alias::new("total_spent")), Order::Desc)
            .order_by(orders::Column::UserId, Order::Asc)
            .limit(top_n)
            .into_tuple()
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, username, order_count, spent)| TopCustomer {
                user_id,
                username,
                order_count,
                total_spent: spent.unwrap_or(0.0),
            })
            .collect())
    }

    /// 近 N 天逐日销售, 在应用侧按 UTC 日期分桶并补零
    pub async fn daily_sales(&self, restaurant_id: i64, days: u32) -> AppResult<Vec<DailySales>> {
        let days = days.clamp(1, 90);
        let now = Utc::now();
        let start: DateTime<Utc> = (now.date_naive() - Duration::days(days as i64 - 1))
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc();

        let rows: Vec<(DateTime<Utc>, f64)> = orders::Entity::find()
            .select_only()
            .column(orders::Column::CreatedAt)
            .column(orders::Column::TotalAmount)
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .filter(orders::Column::Status.eq(OrderStatus::Paid))
            .filter(orders::Column::CreatedAt.gte(start))
            .into_tuple()
            .all(&self.pool)
            .await?;

        let mut buckets: HashMap<chrono::NaiveDate, (f64, i64)> = HashMap::new();
        for (created_at, amount) in rows {
            let entry = buckets.entry(created_at.date_naive()).or_insert((0.0, 0));
            entry.0 += amount;
            entry.1 += 1;
        }

        let mut out = Vec::with_capacity(days as usize);
        for i in 0..days {
            let date = start.date_naive() + Duration::days(i as i64);
            let (total, order_count) = buckets.get(&date).copied().unwrap_or((0.0, 0));
            out.push(DailySales {
                date,
                total,
                order_count,
            });
        }
        Ok(out)
    }

    /// 各分类营收占比
    pub async fn category_sales(
        &self,
        restaurant_id: i64,
        period: Period,
    ) -> AppResult<Vec<CategorySales>> {
        let revenue = Expr::expr(
            Expr::col((order_items::Entity, order_items::Column::PriceAtTime))
                .mul(Expr::col((order_items::Entity, order_items::Column::Quantity))),
        )
        .sum();

        let mut select = order_items::Entity::find()
            .select_only()
            .column_as(
                Expr::col((dishes::Entity, dishes::Column::CategoryId)),
                "category_id",
            )
            .column_as(
                Expr::col((
                    crate::entities::categories::Entity,
                    crate::entities::categories::Column::Name,
                )),
                "category_name",
            )
            .column_as(revenue, "total_revenue")
            .join(JoinType::InnerJoin, order_items::Relation::Dish.def())
            .join(JoinType::InnerJoin, dishes::Relation::Category.def())
            .join(JoinType::InnerJoin, order_items::Relation::Order.def())
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .filter(orders::Column::Status.eq(OrderStatus::Paid));
        if let Some(start) = period.start_bound(Utc::now()) {
            select = select.filter(orders::Column::CreatedAt.gte(start));
        }

        let rows: Vec<(i64, String, Option<f64>)> = select
            .group_by(Expr::col((dishes::Entity, dishes::Column::CategoryId)))
            .group_by(Expr::col((
                crate::entities::categories::Entity,
                crate::entities::categories::Column::Name,
            )))
            .order_by(Expr::col(Alias::new("total_revenue")), Order::Desc)
            .into_tuple()
            .all(&self.pool)
            .await?;

        let grand_total: f64 = rows.iter().map(|(_, _, r)| r.unwrap_or(0.0)).sum();
        Ok(rows
            .into_iter()
            .map(|(category_id, category_name, revenue)| {
                let total_revenue = revenue.unwrap_or(0.0);
                let percentage = if grand_total > 0.0 {
                    (total_revenue / grand_total * 10000.0).round() / 100.0
                } else {
                    0.0
                };
                CategorySales {
                    category_id,
                    category_name,
                    total_revenue,
                    percentage,
                }
            })
            .collect())
    }
}
