use crate::entities::{blacklist, categories, dishes, orders};
use crate::error::AppResult;
use crate::models::Period;
use crate::services::report_service::ReportService;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// 按餐厅缓存生成好的上下文文本, 下单/改菜单时显式失效
#[derive(Clone)]
pub struct ContextCache {
    entries: Arc<RwLock<HashMap<i64, (Instant, String)>>>,
    ttl: Duration,
}

impl ContextCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn get(&self, restaurant_id: i64) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&restaurant_id).and_then(|(at, text)| {
            if at.elapsed() < self.ttl {
                Some(text.clone())
            } else {
                None
            }
        })
    }

    pub fn put(&self, restaurant_id: i64, text: String) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(restaurant_id, (Instant::now(), text));
    }

    pub fn invalidate(&self, restaurant_id: i64) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(&restaurant_id);
    }
}

#[derive(Clone)]
pub struct ContextBuilder {
    pool: DatabaseConnection,
    reports: ReportService,
    cache: ContextCache,
    budget: usize,
}

impl ContextBuilder {
    pub fn new(
        pool: DatabaseConnection,
        reports: ReportService,
        cache: ContextCache,
        budget: usize,
    ) -> Self {
        Self {
            pool,
            reports,
            cache,
            budget,
        }
    }

    /// 汇总餐厅全量经营数据为给大模型的文本块
    pub async fn build(&self, restaurant_id: i64) -> AppResult<String> {
        if let Some(cached) = self.cache.get(restaurant_id) {
            return Ok(cached);
        }

        let mut context = String::new();
        context.push_str(&self.restaurant_section(restaurant_id).await?);
        context.push_str(&self.overview_section(restaurant_id).await?);
        context.push_str(&self.sales_section(restaurant_id).await?);
        context.push_str(&self.dishes_section(restaurant_id).await?);
        context.push_str(&self.customers_section(restaurant_id).await?);

        self.cache.put(restaurant_id, context.clone());
        Ok(context)
    }

    /// 超出预算时按问题关键词挑出相关段落, 仍超长则硬截断
    pub fn fit_to_budget(&self, context: &str, question: &str) -> String {
        if context.chars().count() <= self.budget {
            return context.to_string();
        }
        log::warn!(
            "Advisor context too long ({} chars), compressing",
            context.chars().count()
        );
        compress_context(context, question, self.budget)
    }

    async fn restaurant_section(&self, restaurant_id: i64) -> AppResult<String> {
        let restaurant = crate::services::access::ensure_restaurant(&self.pool, restaurant_id).await?;
        let mut s = String::from("=== 餐厅基本信息 ===\n");
        s.push_str(&format!("餐厅名称: {}\n", restaurant.name));
        s.push_str(&format!("餐厅ID: {}\n", restaurant.id));
        if let Some(desc) = &restaurant.description {
            s.push_str(&format!("简介: {desc}\n"));
        }
        s.push('\n');
        Ok(s)
    }

    async fn overview_section(&self, restaurant_id: i64) -> AppResult<String> {
        let dish_count = dishes::Entity::find()
            .filter(dishes::Column::RestaurantId.eq(restaurant_id))
            .filter(dishes::Column::IsActive.eq(true))
            .count(&self.pool)
            .await?;
        let category_count = categories::Entity::find()
            .filter(categories::Column::RestaurantId.eq(restaurant_id))
            .count(&self.pool)
            .await?;
        let order_count = orders::Entity::find()
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .count(&self.pool)
            .await?;
        let customer_count = orders::Entity::find()
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .select_only()
            .column(orders::Column::UserId)
            .distinct()
            .count(&self.pool)
            .await?;
        let blacklist_count = blacklist::Entity::find()
            .filter(blacklist::Column::RestaurantId.eq(restaurant_id))
            .count(&self.pool)
            .await?;

        let mut s = String::from("=== 经营概览 ===\n");
        s.push_str(&format!("在售菜品数: {dish_count}\n"));
        s.push_str(&format!("菜品分类数: {category_count}\n"));
        s.push_str(&format!("订单总数: {order_count}\n"));
        s.push_str(&format!("顾客总数: {customer_count}\n"));
        s.push_str(&format!("黑名单顾客数: {blacklist_count}\n"));
        s.push('\n');
        Ok(s)
    }

    async fn sales_section(&self, restaurant_id: i64) -> AppResult<String> {
        let all = self.reports.sales_summary(restaurant_id, Period::All).await?;
        let today = self.reports.sales_summary(restaurant_id, Period::Day).await?;
        let daily = self.reports.daily_sales(restaurant_id, 7).await?;

        let mut s = String::from("=== 销售统计 ===\n");
        s.push_str(&format!(
            "累计销售额: ¥{:.2} ({} 单)\n",
            all.total_sales, all.order_count
        ));
        s.push_str(&format!(
            "今日销售额: ¥{:.2} ({} 单)\n",
            today.total_sales, today.order_count
        ));
        s.push_str("近7天逐日:\n");
        for day in daily {
            s.push_str(&format!(
                "  {}: ¥{:.2} ({} 单)\n",
                day.date, day.total, day.order_count
            ));
        }
        s.push('\n');
        Ok(s)
    }

    async fn dishes_section(&self, restaurant_id: i64) -> AppResult<String> {
        let top = self
            .reports
            .top_dishes(restaurant_id, Period::All, 10)
            .await?;
        let mut s = String::from("=== 热门菜品分析 ===\n");
        if top.is_empty() {
            s.push_str("暂无销售记录\n");
        }
        for (i, dish) in top.iter().enumerate() {
            s.push_str(&format!(
                "{}. {} 销量 {} 营收 ¥{:.2}\n",
                i + 1,
                dish.dish_name,
                dish.total_quantity,
                dish.total_revenue
            ));
        }
        s.push('\n');
        Ok(s)
    }

    async fn customers_section(&self, restaurant_id: i64) -> AppResult<String> {
        let top = self
            .reports
            .top_customers(restaurant_id, Period::All, 10)
            .await?;
        let blacklisted: Vec<i64> = blacklist::Entity::find()
            .select_only()
            .column(blacklist::Column::UserId)
            .filter(blacklist::Column::RestaurantId.eq(restaurant_id))
            .into_tuple()
            .all(&self.pool)
            .await?;

        let mut s = String::from("=== 顾客信息 ===\n");
        if top.is_empty() {
            s.push_str("暂无顾客消费记录\n");
        }
        for customer in &top {
            s.push_str(&format!(
                "{}: {} 单, 消费 ¥{:.2}{}\n",
                customer.username,
                customer.order_count,
                customer.total_spent,
                if blacklisted.contains(&customer.user_id) {
                    " [黑名单]"
                } else {
                    ""
                }
            ));
        }
        s.push('\n');
        Ok(s)
    }
}

/// 问题关键词 -> 要保留的段落标题
fn key_sections(question: &str) -> Vec<&'static str> {
    if question.contains("顾客") && (question.contains("喜欢") || question.contains("最爱")) {
        vec!["=== 顾客信息 ==="]
    } else if question.contains("销售") || question.contains("营业额") || question.contains("收入")
    {
        vec!["=== 销售统计 ==="]
    } else if question.contains("热门") || question.contains("畅销") || question.contains("卖得好")
    {
        vec!["=== 热门菜品分析 ==="]
    } else {
        vec![
            "=== 餐厅基本信息 ===",
            "=== 销售统计 ===",
            "=== 热门菜品分析 ===",
            "=== 顾客信息 ===",
        ]
    }
}

fn compress_context(context: &str, question: &str, budget: usize) -> String {
    let sections = key_sections(question);
    let mut kept = Vec::new();
    let mut in_key_section = false;
    for line in context.lines() {
        if sections.iter().any(|s| line.starts_with(s)) {
            in_key_section = true;
            kept.push(line);
        } else if line.starts_with("===") {
            in_key_section = false;
        } else if in_key_section {
            kept.push(line);
        }
    }

    let mut compressed = kept.join("\n");
    if compressed.chars().count() > budget {
        compressed = compressed.chars().take(budget).collect::<String>() + "...[上下文被截断]";
    }
    compressed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_put_get_invalidate() {
        let cache = ContextCache::new(Duration::from_secs(60));
        assert!(cache.get(1).is_none());
        cache.put(1, "ctx".to_string());
        assert_eq!(cache.get(1).as_deref(), Some("ctx"));
        cache.invalidate(1);
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn test_cache_expires() {
        let cache = ContextCache::new(Duration::from_millis(0));
        cache.put(1, "ctx".to_string());
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn test_compress_keeps_matching_section() {
        let context = "=== 销售统计 ===\n今日销售额: ¥10.00\n\n=== 顾客信息 ===\n张三: 3 单\n";
        let out = compress_context(context, "最近销售额如何", 1000);
        assert!(out.contains("今日销售额"));
        assert!(!out.contains("张三"));
    }

    #[test]
    fn test_compress_hard_truncates() {
        let body = "x".repeat(500);
        let context = format!("=== 销售统计 ===\n{body}\n");
        let out = compress_context(&context, "销售", 100);
        assert!(out.ends_with("...[上下文被截断]"));
        assert!(out.chars().count() <= 100 + "...[上下文被截断]".chars().count());
    }
}
