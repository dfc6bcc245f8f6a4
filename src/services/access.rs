use crate::entities::restaurants;
use crate::error::{AppError, AppResult};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

/// 校验餐厅存在且归 user_id 所有, 返回餐厅记录
pub async fn ensure_owner<C: ConnectionTrait>(
    db: &C,
    restaurant_id: i64,
    user_id: i64,
) -> AppResult<restaurants::Model> {
    let restaurant = restaurants::Entity::find_by_id(restaurant_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("餐厅不存在".to_string()))?;

    if restaurant.owner_id != user_id {
        return Err(AppError::Forbidden("无权操作该餐厅".to_string()));
    }

    Ok(restaurant)
}

/// 仅校验餐厅存在
pub async fn ensure_restaurant<C: ConnectionTrait>(
    db: &C,
    restaurant_id: i64,
) -> AppResult<restaurants::Model> {
    restaurants::Entity::find_by_id(restaurant_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("餐厅不存在".to_string()))
}

/// 找到 user_id 名下的餐厅 (每个 owner 最多一家)
pub async fn find_owned_restaurant<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> AppResult<Option<restaurants::Model>> {
    Ok(restaurants::Entity::find()
        .filter(restaurants::Column::OwnerId.eq(user_id))
        .one(db)
        .await?)
}
