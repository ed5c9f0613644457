//! GPS 上报端点
//!
//! - POST /gps：记录一条坐标 ping
//! - GET /gps：按活动取坐标记录

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RepoData;
use super::helpers::{error_from_fieldtrack, error_response, success_response};

#[derive(Debug, Clone, Deserialize)]
pub struct LogGpsRequest {
    pub campaign_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GpsListQuery {
    pub campaign_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GpsLoggedResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

fn valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// POST /api/gps - 记录坐标
pub async fn log_gps(body: web::Json<LogGpsRequest>, repo: RepoData) -> HttpResponse {
    let Some(campaign_id) = body.campaign_id else {
        return error_response(StatusCode::BAD_REQUEST, "campaign_id is required");
    };
    let (Some(latitude), Some(longitude)) = (body.latitude, body.longitude) else {
        return error_response(StatusCode::BAD_REQUEST, "latitude and longitude are required");
    };

    if !valid_coordinate(latitude, longitude) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid coordinates");
    }

    // 事件必须挂在已存在的活动上
    match repo.campaign(campaign_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Campaign not found"),
        Err(e) => return error_from_fieldtrack(&e),
    }

    match repo.append_gps(campaign_id, latitude, longitude).await {
        Ok(event) => success_response(GpsLoggedResponse {
            latitude: event.latitude,
            longitude: event.longitude,
            timestamp: event.captured_at,
        }),
        Err(e) => error_from_fieldtrack(&e),
    }
}

/// GET /api/gps?campaign_id= - 按活动取坐标记录（新→旧）
pub async fn list_gps(query: web::Query<GpsListQuery>, repo: RepoData) -> HttpResponse {
    let Some(campaign_id) = query.campaign_id else {
        return error_response(StatusCode::BAD_REQUEST, "campaign_id is required");
    };

    match repo.gps_events(campaign_id).await {
        Ok(events) => success_response(events),
        Err(e) => error_from_fieldtrack(&e),
    }
}
