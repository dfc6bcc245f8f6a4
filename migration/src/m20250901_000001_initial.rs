use sea_orm_migration::prelude::*;

/// 用户表 (顾客 / 餐厅老板)
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    IsActive,
    CreatedAt,
}

/// 餐厅表, total_sales 为冗余累计值
#[derive(DeriveIden)]
enum Restaurants {
    Table,
    Id,
    Name,
    Description,
    OwnerId,
    TotalSales,
    CreatedAt,
}

/// 菜品分类表
#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    RestaurantId,
    Name,
    CreatedAt,
}

/// 菜品表, order_count 为冗余累计销量
#[derive(DeriveIden)]
enum Dishes {
    Table,
    Id,
    RestaurantId,
    CategoryId,
    Name,
    Description,
    Price,
    IsActive,
    OrderCount,
    CreatedAt,
}

/// 订单表, total_amount 为下单时刻快照
#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    UserId,
    RestaurantId,
    TotalAmount,
    Status,
    Remarks,
    CreatedAt,
    PaidAt,
}

/// 订单项表, price_at_time 为价格快照
#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    DishId,
    Quantity,
    PriceAtTime,
}

/// 黑名单表, (restaurant_id, user_id) 唯一
#[derive(DeriveIden)]
enum Blacklist {
    Table,
    Id,
    RestaurantId,
    UserId,
    Reason,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string_len(64).not_null())
                    .col(ColumnDef::new(Users::Email).string_len(120).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(20)
                            .not_null()
                            .default("customer"),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Restaurants::Description).text())
                    .col(ColumnDef::new(Restaurants::OwnerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Restaurants::TotalSales)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Restaurants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurants_owner")
                            .from(Restaurants::Table, Restaurants::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_restaurants_name")
                    .table(Restaurants::Table)
                    .col(Restaurants::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 一个用户至多拥有一家餐厅
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurants_owner")
                    .table(Restaurants::Table)
                    .col(Restaurants::OwnerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::RestaurantId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Categories::Name).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_restaurant")
                            .from(Categories::Table, Categories::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Dishes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dishes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Dishes::RestaurantId).big_integer().not_null())
                    .col(ColumnDef::new(Dishes::CategoryId).big_integer().not_null())
                    .col(ColumnDef::new(Dishes::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Dishes::Description).text())
                    .col(ColumnDef::new(Dishes::Price).double().not_null())
                    .col(
                        ColumnDef::new(Dishes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Dishes::OrderCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Dishes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dishes_restaurant")
                            .from(Dishes::Table, Dishes::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dishes_category")
                            .from(Dishes::Table, Dishes::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dishes_restaurant")
                    .table(Dishes::Table)
                    .col(Dishes::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::RestaurantId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::TotalAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Orders::Remarks).text())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::PaidAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_restaurant")
                            .from(Orders::Table, Orders::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_restaurant_status")
                    .table(Orders::Table)
                    .col(Orders::RestaurantId)
                    .col(Orders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_user")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderItems::OrderId).big_integer().not_null())
                    .col(ColumnDef::new(OrderItems::DishId).big_integer().not_null())
                    .col(
                        ColumnDef::new(OrderItems::Quantity)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(OrderItems::PriceAtTime).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_dish")
                            .from(OrderItems::Table, OrderItems::DishId)
                            .to(Dishes::Table, Dishes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_order")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_dish")
                    .table(OrderItems::Table)
                    .col(OrderItems::DishId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Blacklist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blacklist::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Blacklist::RestaurantId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Blacklist::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Blacklist::Reason).text())
                    .col(
                        ColumnDef::new(Blacklist::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blacklist_restaurant")
                            .from(Blacklist::Table, Blacklist::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blacklist_user")
                            .from(Blacklist::Table, Blacklist::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blacklist_restaurant_user")
                    .table(Blacklist::Table)
                    .col(Blacklist::RestaurantId)
                    .col(Blacklist::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blacklist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Dishes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
