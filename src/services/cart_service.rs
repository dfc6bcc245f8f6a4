use crate::entities::dishes;
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 进程内购物车, 按用户 id 隔离
#[derive(Clone, Default)]
pub struct CartStore {
    carts: Arc<RwLock<HashMap<i64, HashMap<i64, CartLine>>>>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self, user_id: i64) -> Vec<CartLine> {
        let carts = self.carts.read().unwrap_or_else(|e| e.into_inner());
        let mut lines: Vec<CartLine> = carts
            .get(&user_id)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default();
        lines.sort_by_key(|l| l.dish_id);
        lines
    }

    /// 同一菜品累加数量, 价格保留首次加入时的快照
    pub fn add_line(&self, user_id: i64, line: CartLine, quantity: i64) {
        let mut carts = self.carts.write().unwrap_or_else(|e| e.into_inner());
        let cart = carts.entry(user_id).or_default();
        cart.entry(line.dish_id)
            .and_modify(|existing| existing.quantity += quantity)
            .or_insert_with(|| CartLine { quantity, ..line });
    }

    /// 覆盖数量, 数量 <= 0 时移除该行, 返回是否移除
    pub fn set_quantity(&self, user_id: i64, dish_id: i64, quantity: i64) -> AppResult<bool> {
        let mut carts = self.carts.write().unwrap_or_else(|e| e.into_inner());
        let cart = carts.entry(user_id).or_default();
        if !cart.contains_key(&dish_id) {
            return Err(AppError::NotFound("购物车中没有该菜品".to_string()));
        }
        if quantity <= 0 {
            cart.remove(&dish_id);
            return Ok(true);
        }
        if let Some(line) = cart.get_mut(&dish_id) {
            line.quantity = quantity;
        }
        Ok(false)
    }

    pub fn clear(&self, user_id: i64) {
        let mut carts = self.carts.write().unwrap_or_else(|e| e.into_inner());
        carts.remove(&user_id);
    }

    pub fn total_price(&self, user_id: i64) -> f64 {
        round2(
            self.lines(user_id)
                .iter()
                .map(|l| l.price * l.quantity as f64)
                .sum(),
        )
    }

    pub fn count(&self, user_id: i64) -> i64 {
        self.lines(user_id).iter().map(|l| l.quantity).sum()
    }
}

#[derive(Clone)]
pub struct CartService {
    pool: DatabaseConnection,
    store: CartStore,
}

impl CartService {
    pub fn new(pool: DatabaseConnection, store: CartStore) -> Self {
        Self { pool, store }
    }

    pub fn get_cart(&self, user_id: i64) -> CartResponse {
        CartResponse {
            items: self.store.lines(user_id),
            total_price: self.store.total_price(user_id),
            cart_count: self.store.count(user_id),
        }
    }

    pub async fn add_item(
        &self,
        user_id: i64,
        dish_id: i64,
        quantity: Option<i64>,
    ) -> AppResult<CartResponse> {
        let quantity = quantity.unwrap_or(1);
        if quantity <= 0 {
            return Err(AppError::ValidationError("数量必须大于0".to_string()));
        }

        let dish = dishes::Entity::find_by_id(dish_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("菜品不存在".to_string()))?;
        if !dish.is_active {
            return Err(AppError::ValidationError("该菜品已下架".to_string()));
        }

        self.store.add_line(
            user_id,
            CartLine {
                dish_id: dish.id,
                dish_name: dish.name,
                price: dish.price,
                quantity: 0,
                restaurant_id: dish.restaurant_id,
            },
            quantity,
        );
        Ok(self.get_cart(user_id))
    }

    pub fn update_item(
        &self,
        user_id: i64,
        dish_id: i64,
        quantity: i64,
    ) -> AppResult<UpdateCartItemResponse> {
        let removed = self.store.set_quantity(user_id, dish_id, quantity)?;
        Ok(UpdateCartItemResponse {
            removed,
            total_price: self.store.total_price(user_id),
            cart_count: self.store.count(user_id),
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(dish_id: i64, price: f64) -> CartLine {
        CartLine {
            dish_id,
            dish_name: format!("dish-{dish_id}"),
            price,
            quantity: 0,
            restaurant_id: 1,
        }
    }

    #[test]
    fn test_add_accumulates_quantity() {
        let store = CartStore::new();
        store.add_line(1, line(10, 20.0), 1);
        store.add_line(1, line(10, 20.0), 2);
        let lines = store.lines(1);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(store.total_price(1), 60.0);
        assert_eq!(store.count(1), 3);
    }

    #[test]
    fn test_set_quantity_replaces_and_removes() {
        let store = CartStore::new();
        store.add_line(1, line(10, 5.5), 4);
        assert!(!store.set_quantity(1, 10, 2).unwrap());
        assert_eq!(store.total_price(1), 11.0);

        assert!(store.set_quantity(1, 10, 0).unwrap());
        assert!(store.lines(1).is_empty());
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let store = CartStore::new();
        assert!(store.set_quantity(1, 99, 2).is_err());
    }

    #[test]
    fn test_carts_isolated_per_user() {
        let store = CartStore::new();
        store.add_line(1, line(10, 10.0), 1);
        store.add_line(2, line(10, 10.0), 5);
        assert_eq!(store.count(1), 1);
        assert_eq!(store.count(2), 5);
        store.clear(1);
        assert_eq!(store.count(1), 0);
        assert_eq!(store.count(2), 5);
    }
}
