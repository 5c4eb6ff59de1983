use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reachdesk::config::{run_migrations, Config};
use reachdesk::middleware::{AdminTokenCodec, ErrorHandler, RequestId};
use reachdesk::modules::marketing_costs::MySqlMarketingCostRepository;
use reachdesk::modules::orders::MySqlOrderRepository;
use reachdesk::modules::promo_codes::MySqlPromoCodeRepository;
use reachdesk::{configure_app, AdminSettings, Services};

fn init_tracing(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("reachdesk={},actix_web=info", log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn startup_error(e: reachdesk::AppError) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(startup_error)?;
    init_tracing(&config.app.log_level, &config.app.log_format);
    config.validate().map_err(startup_error)?;

    tracing::info!("Starting reachdesk admin backend");
    tracing::info!("Environment: {}", config.app.env);

    let timezone = config.reporting.timezone().map_err(startup_error)?;

    // Create database connection pool
    let db_pool = config.database.create_pool().await.map_err(startup_error)?;
    run_migrations(&db_pool).await.map_err(startup_error)?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let services = Services::new(
        Arc::new(MySqlOrderRepository::new(db_pool.clone(), timezone)),
        Arc::new(MySqlMarketingCostRepository::new(db_pool.clone())),
        Arc::new(MySqlPromoCodeRepository::new(db_pool.clone())),
        timezone,
    );
    let admin = AdminSettings {
        tokens: AdminTokenCodec::new(&config.security.admin_token_secret),
        requests_per_minute: config.security.rate_limit_per_minute,
    };

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(ErrorHandler)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(db_pool.clone()))
            .configure(|cfg| configure_app(cfg, &services, &admin))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}
