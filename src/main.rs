//! Server entrypoint
//!
//! Configures and starts the HTTP server with all routes.

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Compress, web};
use dotenvy::dotenv;
use tracing::{info, warn};

use fieldtrack::api::api_routes;
use fieldtrack::api::services::{json_error_handler, query_error_handler};
use fieldtrack::config::{self, CorsConfig};
use fieldtrack::repository::RepositoryFactory;

/// Build CORS middleware from configuration
fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // 关闭时走浏览器默认同源策略
    if !cors_config.enabled {
        return Cors::default();
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
        .allowed_headers(vec!["Content-Type", "Accept"])
        .max_age(3600);

    if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    config::init_config();

    let config = config::get_config();

    // 初始化日志（RUST_LOG 优先于配置文件）
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if config.cors.enabled && config.cors.allowed_origins.iter().any(|o| o == "*") {
        warn!("CORS is wide open (allowed_origins = [\"*\"])");
    }

    // 存储 + 仓库
    let repo = RepositoryFactory::create().await?;

    // 上传目录
    tokio::fs::create_dir_all(&config.uploads.dir).await?;

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting fieldtrack at http://{}", bind_address);

    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);
        App::new()
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .wrap(cors)
            .wrap(Compress::default())
            .service(api_routes())
    })
    .workers(config.server.cpu_count)
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
