//! API 路由配置
//!
//! 按资源拆分路由模块，统一挂在 /api 下。

use actix_web::web;

use super::campaigns::{create_campaign, get_campaign, increment_views, list_campaigns};
use super::gps::{list_gps, log_gps};
use super::media::{list_media, upload_media};
use super::reports::{
    get_activity_timeline, get_campaign_report, get_dashboard, get_device_distribution,
    get_geographic_clusters,
};
use super::social::{list_social, log_social};

/// 活动路由 `/campaigns`
pub fn campaign_routes() -> actix_web::Scope {
    web::scope("/campaigns")
        .route("", web::post().to(create_campaign))
        .route("", web::get().to(list_campaigns))
        .route("/{id}", web::get().to(get_campaign))
        .route("/{id}/views", web::put().to(increment_views))
}

/// 媒体路由 `/media`
pub fn media_routes() -> actix_web::Scope {
    web::scope("/media")
        .route("", web::post().to(upload_media))
        .route("", web::get().to(list_media))
}

/// GPS 路由 `/gps`
pub fn gps_routes() -> actix_web::Scope {
    web::scope("/gps")
        .route("", web::post().to(log_gps))
        .route("", web::get().to(list_gps))
}

/// 社交链接路由 `/social`
pub fn social_routes() -> actix_web::Scope {
    web::scope("/social")
        .route("", web::post().to(log_social))
        .route("", web::get().to(list_social))
}

/// 报表路由 `/reports`
///
/// 每个报表一个资源：
/// - GET /reports/dashboard
/// - GET /reports/campaign?campaign_id=
/// - GET /reports/geographic?timeframe=
/// - GET /reports/devices
/// - GET /reports/timeline?period=&limit=
pub fn report_routes() -> actix_web::Scope {
    web::scope("/reports")
        .route("/dashboard", web::get().to(get_dashboard))
        .route("/campaign", web::get().to(get_campaign_report))
        .route("/geographic", web::get().to(get_geographic_clusters))
        .route("/devices", web::get().to(get_device_distribution))
        .route("/timeline", web::get().to(get_activity_timeline))
}

/// 完整 API：`/api/...`
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .service(campaign_routes())
        .service(media_routes())
        .service(gps_routes())
        .service(social_routes())
        .service(report_routes())
}
