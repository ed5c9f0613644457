//! 社交链接上报端点
//!
//! - POST /social：记录一条平台视频链接（平台白名单 + URL 形状校验）
//! - GET /social：按活动取链接，并附该活动的平台占比

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::dashboard::{PlatformShare, platform_shares};
use crate::repository::{Platform, SocialEvent};
use crate::utils::url_validator::validate_platform_url;

use super::RepoData;
use super::helpers::{error_from_fieldtrack, error_response, success_response};

#[derive(Debug, Clone, Deserialize)]
pub struct LogSocialRequest {
    pub campaign_id: Option<i64>,
    pub platform: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialListQuery {
    pub campaign_id: Option<i64>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialLoggedResponse {
    pub platform: Platform,
    pub video_url: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialListResponse {
    pub links: Vec<SocialEvent>,
    pub distribution: Vec<PlatformShare>,
}

/// POST /api/social - 记录社交链接
pub async fn log_social(body: web::Json<LogSocialRequest>, repo: RepoData) -> HttpResponse {
    let Some(campaign_id) = body.campaign_id else {
        return error_response(StatusCode::BAD_REQUEST, "campaign_id is required");
    };
    let Some(platform_raw) = body.platform.as_deref() else {
        return error_response(StatusCode::BAD_REQUEST, "platform is required");
    };
    let Some(video_url) = body.video_url.as_deref() else {
        return error_response(StatusCode::BAD_REQUEST, "video_url is required");
    };

    let platform = match platform_raw.parse::<Platform>() {
        Ok(platform) => platform,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid platform"),
    };

    if let Err(e) = validate_platform_url(platform, video_url) {
        return error_response(StatusCode::BAD_REQUEST, &e.to_string());
    }

    match repo.campaign(campaign_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Campaign not found"),
        Err(e) => return error_from_fieldtrack(&e),
    }

    match repo.append_social(campaign_id, platform, video_url).await {
        Ok(event) => success_response(SocialLoggedResponse {
            platform: event.platform,
            video_url: event.video_url,
            timestamp: event.captured_at,
        }),
        Err(e) => error_from_fieldtrack(&e),
    }
}

/// GET /api/social?campaign_id=&platform= - 链接列表 + 平台占比
pub async fn list_social(query: web::Query<SocialListQuery>, repo: RepoData) -> HttpResponse {
    let Some(campaign_id) = query.campaign_id else {
        return error_response(StatusCode::BAD_REQUEST, "campaign_id is required");
    };

    let platform = match query.platform.as_deref() {
        Some(raw) => match raw.parse::<Platform>() {
            Ok(platform) => Some(platform),
            Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid platform"),
        },
        None => None,
    };

    let links = match repo.social_events(campaign_id, platform).await {
        Ok(links) => links,
        Err(e) => return error_from_fieldtrack(&e),
    };

    // 占比永远按该活动全量链接算，不受 platform 过滤影响
    let distribution = match repo.platform_counts(Some(campaign_id)).await {
        Ok(counts) => platform_shares(counts),
        Err(e) => return error_from_fieldtrack(&e),
    };

    success_response(SocialListResponse {
        links,
        distribution,
    })
}
