use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use diancan_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::DeepSeekClient,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 创建外部服务
    let deepseek_client =
        DeepSeekClient::new(config.deepseek.clone()).expect("Failed to build DeepSeek client");
    if !deepseek_client.is_configured() {
        log::warn!("DeepSeek API key not configured, advisor will use rule-based fallback");
    }

    // 进程内状态: 购物车与顾问上下文缓存
    let cart_store = CartStore::new();
    let context_cache = ContextCache::new(std::time::Duration::from_secs(
        config.advisor.context_ttl_secs,
    ));

    // 创建服务
    let auth_service = AuthService::new(
        pool.clone(),
        jwt_service.clone(),
        config.jwt.access_token_expires_in,
    );
    let restaurant_service = RestaurantService::new(pool.clone());
    let dish_service = DishService::new(pool.clone());
    let cart_service = CartService::new(pool.clone(), cart_store.clone());
    let order_service = OrderService::new(pool.clone(), cart_store.clone(), context_cache.clone());
    let report_service = ReportService::new(pool.clone());
    let customer_service = CustomerService::new(pool.clone());

    let context_builder = ContextBuilder::new(
        pool.clone(),
        report_service.clone(),
        context_cache.clone(),
        config.advisor.context_budget,
    );
    let advisor_service = AdvisorService::new(
        pool.clone(),
        deepseek_client,
        context_builder,
        report_service.clone(),
    );

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(restaurant_service.clone()))
            .app_data(web::Data::new(dish_service.clone()))
            .app_data(web::Data::new(cart_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .app_data(web::Data::new(customer_service.clone()))
            .app_data(web::Data::new(advisor_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::restaurant_config)
                    .configure(handlers::category_config)
                    .configure(handlers::dish_config)
                    .configure(handlers::cart_config)
                    .configure(handlers::order_config)
                    .configure(handlers::report_config)
                    .configure(handlers::customer_config)
                    .configure(handlers::advisor_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
