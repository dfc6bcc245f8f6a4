use crate::entities::{categories, dishes, order_items};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::access;
use crate::utils::{PaginatedResponse, PaginationParams};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct DishService {
    pool: DatabaseConnection,
}

impl DishService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    // ---------- 分类 ----------

    pub async fn list_categories(&self, restaurant_id: i64) -> AppResult<Vec<CategoryResponse>> {
        access::ensure_restaurant(&self.pool, restaurant_id).await?;
        let categories = categories::Entity::find()
            .filter(categories::Column::RestaurantId.eq(restaurant_id))
            .order_by_asc(categories::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    pub async fn create_category(
        &self,
        restaurant_id: i64,
        user_id: i64,
        req: CreateCategoryRequest,
    ) -> AppResult<CategoryResponse> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;
        let name = req.name.trim().to_string();
        if name.is_empty() || name.chars().count() > 50 {
            return Err(AppError::ValidationError(
                "分类名称长度必须在1-50字符之间".to_string(),
            ));
        }
        self.ensure_category_name_free(restaurant_id, &name, None)
            .await?;

        let category = categories::ActiveModel {
            restaurant_id: Set(restaurant_id),
            name: Set(name),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(CategoryResponse::from(category))
    }

    pub async fn update_category(
        &self,
        restaurant_id: i64,
        category_id: i64,
        user_id: i64,
        req: UpdateCategoryRequest,
    ) -> AppResult<CategoryResponse> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;
        let category = self.find_category(restaurant_id, category_id).await?;

        let name = req.name.trim().to_string();
        if name.is_empty() || name.chars().count() > 50 {
            return Err(AppError::ValidationError(
                "分类名称长度必须在1-50字符之间".to_string(),
            ));
        }
        self.ensure_category_name_free(restaurant_id, &name, Some(category_id))
            .await?;

        let mut am = category.into_active_model();
        am.name = Set(name);
        let updated = am.update(&self.pool).await?;
        Ok(CategoryResponse::from(updated))
    }

    /// 分类下还有菜品时拒绝删除
    pub async fn delete_category(
        &self,
        restaurant_id: i64,
        category_id: i64,
        user_id: i64,
    ) -> AppResult<()> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;
        let category = self.find_category(restaurant_id, category_id).await?;

        let dish_count = dishes::Entity::find()
            .filter(dishes::Column::CategoryId.eq(category_id))
            .count(&self.pool)
            .await?;
        if dish_count > 0 {
            return Err(AppError::ValidationError(
                "该分类下还有菜品, 无法删除".to_string(),
            ));
        }

        categories::Entity::delete_by_id(category.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    // ---------- 菜品 ----------

    /// 商家视角的全部菜品, 含下架
    pub async fn list_dishes(
        &self,
        restaurant_id: i64,
        user_id: i64,
        params: PaginationParams,
    ) -> AppResult<PaginatedResponse<DishResponse>> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;
        let select = dishes::Entity::find().filter(dishes::Column::RestaurantId.eq(restaurant_id));
        let total = select.clone().count(&self.pool).await? as i64;
        let dishes = select
            .order_by_asc(dishes::Column::Id)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(
            dishes.into_iter().map(DishResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn get_dish(&self, dish_id: i64) -> AppResult<DishResponse> {
        let dish = dishes::Entity::find_by_id(dish_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("菜品不存在".to_string()))?;
        Ok(DishResponse::from(dish))
    }

    pub async fn create_dish(
        &self,
        restaurant_id: i64,
        user_id: i64,
        req: CreateDishRequest,
    ) -> AppResult<DishResponse> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;
        self.find_category(restaurant_id, req.category_id).await?;

        let name = req.name.trim().to_string();
        if name.is_empty() || name.chars().count() > 100 {
            return Err(AppError::ValidationError(
                "菜品名称长度必须在1-100字符之间".to_string(),
            ));
        }
        if req.price <= 0.0 {
            return Err(AppError::ValidationError("价格必须大于0".to_string()));
        }

        let dish = dishes::ActiveModel {
            restaurant_id: Set(restaurant_id),
            category_id: Set(req.category_id),
            name: Set(name),
            description: Set(req.description),
            price: Set(req.price),
            is_active: Set(true),
            order_count: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(DishResponse::from(dish))
    }

    pub async fn update_dish(
        &self,
        restaurant_id: i64,
        dish_id: i64,
        user_id: i64,
        req: UpdateDishRequest,
    ) -> AppResult<DishResponse> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;
        let dish = self.find_dish(restaurant_id, dish_id).await?;

        if let Some(price) = req.price
            && price <= 0.0
        {
            return Err(AppError::ValidationError("价格必须大于0".to_string()));
        }
        if let Some(category_id) = req.category_id {
            self.find_category(restaurant_id, category_id).await?;
        }

        let mut am = dish.into_active_model();
        if let Some(name) = req.name {
            let name = name.trim().to_string();
            if name.is_empty() || name.chars().count() > 100 {
                return Err(AppError::ValidationError(
                    "菜品名称长度必须在1-100字符之间".to_string(),
                ));
            }
            am.name = Set(name);
        }
        if let Some(description) = req.description {
            am.description = Set(Some(description));
        }
        if let Some(price) = req.price {
            am.price = Set(price);
        }
        if let Some(category_id) = req.category_id {
            am.category_id = Set(category_id);
        }
        if let Some(is_active) = req.is_active {
            am.is_active = Set(is_active);
        }
        let updated = am.update(&self.pool).await?;
        Ok(DishResponse::from(updated))
    }

    /// 上架/下架开关
    pub async fn toggle_dish(
        &self,
        restaurant_id: i64,
        dish_id: i64,
        user_id: i64,
    ) -> AppResult<DishResponse> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;
        let dish = self.find_dish(restaurant_id, dish_id).await?;

        let next = !dish.is_active;
        let mut am = dish.into_active_model();
        am.is_active = Set(next);
        let updated = am.update(&self.pool).await?;
        Ok(DishResponse::from(updated))
    }

    /// 已被下过单的菜品不允许删除, 保历史订单完整
    pub async fn delete_dish(
        &self,
        restaurant_id: i64,
        dish_id: i64,
        user_id: i64,
    ) -> AppResult<()> {
        access::ensure_owner(&self.pool, restaurant_id, user_id).await?;
        let dish = self.find_dish(restaurant_id, dish_id).await?;

        let referenced = order_items::Entity::find()
            .filter(order_items::Column::DishId.eq(dish_id))
            .count(&self.pool)
            .await?;
        if referenced > 0 {
            return Err(AppError::ValidationError(
                "该菜品已有历史订单, 请改为下架".to_string(),
            ));
        }

        dishes::Entity::delete_by_id(dish.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    /// 顾客菜单: 按分类分组, 只含在售菜品
    pub async fn get_menu(
        &self,
        restaurant_id: i64,
        category_id: Option<i64>,
    ) -> AppResult<Vec<MenuCategory>> {
        access::ensure_restaurant(&self.pool, restaurant_id).await?;

        let mut category_select = categories::Entity::find()
            .filter(categories::Column::RestaurantId.eq(restaurant_id));
        if let Some(category_id) = category_id {
            category_select = category_select.filter(categories::Column::Id.eq(category_id));
        }
        let categories = category_select
            .order_by_asc(categories::Column::Id)
            .all(&self.pool)
            .await?;
        let dishes = dishes::Entity::find()
            .filter(dishes::Column::RestaurantId.eq(restaurant_id))
            .filter(dishes::Column::IsActive.eq(true))
            .order_by_asc(dishes::Column::Id)
            .all(&self.pool)
            .await?;

        let mut menu = Vec::with_capacity(categories.len());
        for category in categories {
            let items: Vec<DishResponse> = dishes
                .iter()
                .filter(|d| d.category_id == category.id)
                .cloned()
                .map(DishResponse::from)
                .collect();
            menu.push(MenuCategory {
                category: CategoryResponse::from(category),
                dishes: items,
            });
        }
        Ok(menu)
    }

    async fn find_category(
        &self,
        restaurant_id: i64,
        category_id: i64,
    ) -> AppResult<categories::Model> {
        let category = categories::Entity::find_by_id(category_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("分类不存在".to_string()))?;
        if category.restaurant_id != restaurant_id {
            return Err(AppError::NotFound("分类不存在".to_string()));
        }
        Ok(category)
    }

    async fn find_dish(&self, restaurant_id: i64, dish_id: i64) -> AppResult<dishes::Model> {
        let dish = dishes::Entity::find_by_id(dish_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("菜品不存在".to_string()))?;
        if dish.restaurant_id != restaurant_id {
            return Err(AppError::NotFound("菜品不存在".to_string()));
        }
        Ok(dish)
    }

    async fn ensure_category_name_free(
        &self,
        restaurant_id: i64,
        name: &str,
        exclude_id: Option<i64>,
    ) -> AppResult<()> {
        if let Some(existing) = categories::Entity::find()
            .filter(categories::Column::RestaurantId.eq(restaurant_id))
            .filter(categories::Column::Name.eq(name.to_string()))
            .one(&self.pool)
            .await?
            && Some(existing.id) != exclude_id
        {
            return Err(AppError::ValidationError("分类名称已存在".to_string()));
        }
        Ok(())
    }
}
