use crate::entities::{categories, dishes, restaurants};
use crate::error::{AppError, AppResult};
use crate::external::DeepSeekClient;
use crate::models::*;
use crate::services::access;
use crate::services::context_builder::ContextBuilder;
use crate::services::report_service::ReportService;
use sea_orm::{DatabaseConnection, EntityTrait};

/// 大模型不可用时的备选回答主题, 按优先级排列
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallbackTopic {
    Sales,
    PopularDishes,
    Customers,
    Advice,
    Orders,
    General,
}

const FALLBACK_RULES: &[(&[&str], FallbackTopic)] = &[
    (
        &["销售额", "营业额", "收入", "销售趋势", "销售统计"],
        FallbackTopic::Sales,
    ),
    (
        &["热门", "畅销", "卖得好", "菜品销量", "最受欢迎", "什么菜好"],
        FallbackTopic::PopularDishes,
    ),
    (
        &["顾客", "客户", "消费", "客人", "customer"],
        FallbackTopic::Customers,
    ),
    (
        &["提高", "提升", "改进", "经营建议", "建议", "推荐"],
        FallbackTopic::Advice,
    ),
    (&["订单", "order", "下单"], FallbackTopic::Orders),
];

/// 问题按规则表顺序匹配, 先命中先赢
pub fn match_topic(question: &str) -> FallbackTopic {
    let question = question.to_lowercase();
    for (keywords, topic) in FALLBACK_RULES {
        if keywords.iter().any(|k| question.contains(k)) {
            return *topic;
        }
    }
    FallbackTopic::General
}

#[derive(Clone)]
pub struct AdvisorService {
    pool: DatabaseConnection,
    client: DeepSeekClient,
    context_builder: ContextBuilder,
    reports: ReportService,
}

impl AdvisorService {
    pub fn new(
        pool: DatabaseConnection,
        client: DeepSeekClient,
        context_builder: ContextBuilder,
        reports: ReportService,
    ) -> Self {
        Self {
            pool,
            client,
            context_builder,
            reports,
        }
    }

    /// 商家经营顾问: 大模型优先, 失败时落到本地规则回答
    pub async fn ask(
        &self,
        restaurant_id: i64,
        user_id: i64,
        req: AdvisorRequest,
    ) -> AppResult<AdvisorResponse> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;

        let question = req.question.trim().to_string();
        if question.is_empty() {
            return Err(AppError::ValidationError("请输入问题".to_string()));
        }

        match self.ask_ai(restaurant_id, &question).await {
            Ok(answer) => Ok(AdvisorResponse {
                answer,
                used_ai: true,
            }),
            Err(e) => {
                log::warn!("AI advisor unavailable for restaurant {restaurant_id}: {e}");
                let answer = self.fallback_answer(restaurant_id, &question).await?;
                Ok(AdvisorResponse {
                    answer,
                    used_ai: false,
                })
            }
        }
    }

    /// 顾客菜品问答: 只给菜品公开信息, 不带经营数据
    pub async fn ask_dish(&self, dish_id: i64, req: DishAskRequest) -> AppResult<AdvisorResponse> {
        let question = req.question.trim().to_string();
        if question.is_empty() {
            return Err(AppError::ValidationError("请输入问题".to_string()));
        }

        let dish = dishes::Entity::find_by_id(dish_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("菜品不存在".to_string()))?;
        let category = categories::Entity::find_by_id(dish.category_id)
            .one(&self.pool)
            .await?;
        let restaurant = restaurants::Entity::find_by_id(dish.restaurant_id)
            .one(&self.pool)
            .await?;

        let category_name = category.map(|c| c.name).unwrap_or_default();
        let restaurant_name = restaurant.map(|r| r.name).unwrap_or_default();
        let description = dish.description.clone().unwrap_or_default();

        let context = format!(
            "菜品: {}\n价格: ¥{:.2}\n分类: {}\n描述: {}\n餐厅: {}",
            dish.name, dish.price, category_name, description, restaurant_name
        );
        let prompt = format!(
            "{context}\n\n顾客问: {question}\n请用友好、简洁的语言回答, 不要透露内部数据。"
        );

        match self.client.chat(&prompt).await {
            Ok(answer) => Ok(AdvisorResponse {
                answer,
                used_ai: true,
            }),
            Err(e) => {
                log::warn!("AI dish Q&A unavailable for dish {dish_id}: {e}");
                Ok(AdvisorResponse {
                    answer: dish_fallback_answer(&question, &dish, &category_name),
                    used_ai: false,
                })
            }
        }
    }

    async fn ask_ai(&self, restaurant_id: i64, question: &str) -> AppResult<String> {
        let context = self.context_builder.build(restaurant_id).await?;
        let context = self.context_builder.fit_to_budget(&context, question);
        let prompt = format!(
            "你是一名专业的餐厅经营顾问。以下是餐厅的经营数据:\n\n{context}\n\n\
             用户问题: {question}\n\n\
             请基于以上数据回答, 数据中没有的信息请明确说明未找到, 并给出可操作的建议。"
        );
        self.client.chat(&prompt).await
    }

    async fn fallback_answer(&self, restaurant_id: i64, question: &str) -> AppResult<String> {
        match match_topic(question) {
            FallbackTopic::Sales => self.sales_fallback(restaurant_id).await,
            FallbackTopic::PopularDishes => self.dishes_fallback(restaurant_id).await,
            FallbackTopic::Customers => self.customers_fallback(restaurant_id).await,
            FallbackTopic::Advice => Ok(ADVICE_FALLBACK.to_string()),
            FallbackTopic::Orders => Ok(ORDERS_FALLBACK.to_string()),
            FallbackTopic::General => Ok(GENERAL_FALLBACK.to_string()),
        }
    }

    async fn sales_fallback(&self, restaurant_id: i64) -> AppResult<String> {
        let summary = self
            .reports
            .sales_summary(restaurant_id, Period::All)
            .await?;
        let daily = self.reports.daily_sales(restaurant_id, 7).await?;

        let mut answer = String::from("📈 销售数据分析 (AI 服务暂不可用, 以下为本地统计):\n\n");
        answer.push_str(&format!(
            "累计销售额 ¥{:.2}, 共 {} 单, 平均客单价 ¥{:.2}\n\n近7天:\n",
            summary.total_sales, summary.order_count, summary.average_order_amount
        ));
        for day in daily {
            answer.push_str(&format!(
                "  {}: ¥{:.2} ({} 单)\n",
                day.date, day.total, day.order_count
            ));
        }
        Ok(answer)
    }

    async fn dishes_fallback(&self, restaurant_id: i64) -> AppResult<String> {
        let top = self
            .reports
            .top_dishes(restaurant_id, Period::All, 10)
            .await?;
        if top.is_empty() {
            return Ok("暂无菜品销售记录, 无法分析热门菜品。".to_string());
        }
        let mut answer = String::from("🍽️ 热门菜品排行 (AI 服务暂不可用, 以下为本地统计):\n\n");
        for (i, dish) in top.iter().enumerate() {
            answer.push_str(&format!(
                "{}. {}: 销量 {}, 营收 ¥{:.2}\n",
                i + 1,
                dish.dish_name,
                dish.total_quantity,
                dish.total_revenue
            ));
        }
        Ok(answer)
    }

    async fn customers_fallback(&self, restaurant_id: i64) -> AppResult<String> {
        let top = self
            .reports
            .top_customers(restaurant_id, Period::All, 10)
            .await?;
        if top.is_empty() {
            return Ok("暂无顾客消费记录。".to_string());
        }
        let mut answer = String::from("👥 顾客消费排行 (AI 服务暂不可用, 以下为本地统计):\n\n");
        for customer in top {
            answer.push_str(&format!(
                "{}: {} 单, 累计消费 ¥{:.2}\n",
                customer.username, customer.order_count, customer.total_spent
            ));
        }
        Ok(answer)
    }
}

fn dish_fallback_answer(question: &str, dish: &dishes::Model, category_name: &str) -> String {
    let question = question.to_lowercase();
    let description = dish.description.as_deref().unwrap_or("");

    if ["辣", "辛辣", "辣度"].iter().any(|k| question.contains(k)) {
        let spicy = if description.contains('辣') { "" } else { "不" };
        format!("关于'{}'的辣度: 根据菜品描述, 这道菜{spicy}是辣味的。", dish.name)
    } else if ["份量", "分量", "大小"].iter().any(|k| question.contains(k)) {
        format!(
            "关于'{}'的份量: 这道菜是标准份量, 适合1人食用。如果担心不够, 可以多点一份。",
            dish.name
        )
    } else if ["配料", "材料", "食材", "原料"]
        .iter()
        .any(|k| question.contains(k))
    {
        format!("关于'{}'的配料: 主要食材见菜品描述: {description}", dish.name)
    } else if ["推荐", "好吃", "招牌", "特色"]
        .iter()
        .any(|k| question.contains(k))
    {
        if dish.order_count > 0 {
            format!(
                "'{}'已被点过 {} 次, 是比较受欢迎的选择。",
                dish.name, dish.order_count
            )
        } else {
            format!("'{}'是新上架菜品, 欢迎尝鲜。", dish.name)
        }
    } else if ["时间", "制作", "等待", "多久"]
        .iter()
        .any(|k| question.contains(k))
    {
        format!(
            "关于'{}'的制作时间: 一般在20-30分钟左右, 具体视餐厅忙闲而定。",
            dish.name
        )
    } else {
        format!(
            "关于您对'{}'的问题: 这道菜属于{category_name}, 价格 ¥{:.2}。菜品描述: {description}\n如需更多信息请联系餐厅。",
            dish.name, dish.price
        )
    }
}

const ADVICE_FALLBACK: &str = "🤔 AI 服务暂不可用, 基于常规餐厅经营经验:\n\n\
1. 分析菜品销量, 下架滞销菜品, 加强热门菜品推广\n\
2. 推出优惠套餐或限时特价吸引新顾客\n\
3. 关注回头客, 鼓励老顾客重复消费\n\
4. 控制食材成本, 合理安排备货\n\n\
如需个性化建议, 请稍后重试 AI 服务。";

const ORDERS_FALLBACK: &str = "📊 AI 服务暂不可用。订单相关操作可在订单管理页完成:\n\
查看全部订单、按状态筛选、查看订单明细与备注。";

const GENERAL_FALLBACK: &str = "🤖 AI 服务暂时不可用, 但本地数据分析仍然可用。\n\n\
试试这样提问:\n\
- 销售相关: \"最近销售额如何?\"\n\
- 菜品相关: \"哪些菜品最受欢迎?\"\n\
- 顾客相关: \"哪些顾客消费最多?\"\n\
- 经营建议: \"如何提高营业额?\"";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_topic_by_keyword() {
        assert_eq!(match_topic("最近营业额怎么样"), FallbackTopic::Sales);
        assert_eq!(match_topic("哪些菜卖得好"), FallbackTopic::PopularDishes);
        assert_eq!(match_topic("顾客都喜欢什么"), FallbackTopic::Customers);
        assert_eq!(match_topic("有什么经营建议"), FallbackTopic::Advice);
        assert_eq!(match_topic("今天有几个订单"), FallbackTopic::Orders);
        assert_eq!(match_topic("你好"), FallbackTopic::General);
    }

    #[test]
    fn test_match_topic_priority_order() {
        // 同时命中销售与建议时, 规则表靠前的销售优先
        assert_eq!(match_topic("给点提升销售额的建议"), FallbackTopic::Sales);
    }
}
