use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 报表统计周期
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl Default for Period {
    fn default() -> Self {
        Period::All
    }
}

impl Period {
    /// 返回统计起点 (UTC 日历边界), All 不设下界
    pub fn start_bound(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        let start_date = match self {
            Period::Day => today,
            // 本周从周一起算
            Period::Week => today - Duration::days(today.weekday().num_days_from_monday() as i64),
            Period::Month => today.with_day(1).unwrap_or(today),
            Period::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            Period::All => return None,
        };
        Some(start_date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportQuery {
    pub period: Option<Period>,
    pub top_n: Option<u64>,
    /// 近 N 天的逐日销售, 默认 7
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DishStat {
    pub dish_id: i64,
    pub dish_name: String,
    pub total_quantity: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailySales {
    pub date: NaiveDate,
    pub total: f64,
    pub order_count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategorySales {
    pub category_id: i64,
    pub category_name: String,
    pub total_revenue: f64,
    /// 占比, 0-100
    pub percentage: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopCustomer {
    pub user_id: i64,
    pub username: String,
    pub order_count: i64,
    pub total_spent: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalesSummary {
    pub period: Period,
    pub total_sales: f64,
    pub order_count: i64,
    pub average_order_amount: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    pub summary: SalesSummary,
    pub top_dishes: Vec<DishStat>,
    pub top_customers: Vec<TopCustomer>,
    pub daily_sales: Vec<DailySales>,
    pub category_sales: Vec<CategorySales>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_day_floors_to_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 15, 30, 45).unwrap();
        let start = Period::Day.start_bound(now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_period_week_floors_to_monday() {
        // 2025-09-10 是周三, 本周起点应为 09-08 周一
        let now = Utc.with_ymd_and_hms(2025, 9, 10, 12, 0, 0).unwrap();
        let start = Period::Week.start_bound(now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 9, 8, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_period_month_year_all() {
        let now = Utc.with_ymd_and_hms(2025, 9, 10, 12, 0, 0).unwrap();
        assert_eq!(
            Period::Month.start_bound(now).unwrap(),
            Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            Period::Year.start_bound(now).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
        assert!(Period::All.start_bound(now).is_none());
    }

    #[test]
    fn test_period_deserializes_lowercase() {
        let p: Period = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(p, Period::Month);
    }
}
