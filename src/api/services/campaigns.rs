//! 活动生命周期端点
//!
//! - POST /campaigns：创建活动
//! - GET /campaigns：列表（带每关系独立计数）
//! - GET /campaigns/{id}：详情（带汇总计数）
//! - PUT /campaigns/{id}/views：浏览计数 +1，并记录访问设备

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analytics::rollup::{CampaignRollup, campaign_rollup};
use crate::repository::Campaign;
use crate::services::parse_user_agent;

use super::RepoData;
use super::helpers::{error_from_fieldtrack, error_response, success_response};

// ============ 请求/响应结构 ============

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: Option<String>,
}

/// 列表条目：活动字段 + 每关系计数
#[derive(Debug, Clone, Serialize)]
pub struct CampaignSummary {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub media_count: u64,
    pub gps_count: u64,
    pub social_links_count: u64,
}

/// 详情：活动字段 + 三流汇总
#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: Campaign,
    #[serde(flatten)]
    pub rollup: CampaignRollup,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewCountResponse {
    pub current_views: i64,
}

// ============ 端点 ============

/// POST /api/campaigns - 创建活动
pub async fn create_campaign(
    body: web::Json<CreateCampaignRequest>,
    repo: RepoData,
) -> HttpResponse {
    let name = match body.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return error_response(StatusCode::BAD_REQUEST, "Campaign name is required");
        }
    };

    match repo.create_campaign(&name).await {
        Ok(campaign) => {
            info!("Campaign created: {} ({})", campaign.name, campaign.id);
            success_response(campaign)
        }
        Err(e) => error_from_fieldtrack(&e),
    }
}

/// GET /api/campaigns - 活动列表
///
/// 每个关系各自 GROUP BY 出计数再拼装，避免一条多关系 JOIN。
pub async fn list_campaigns(repo: RepoData) -> HttpResponse {
    let campaigns = match repo.campaigns().await {
        Ok(campaigns) => campaigns,
        Err(e) => return error_from_fieldtrack(&e),
    };

    let (media_counts, gps_counts, social_counts) = match (
        repo.media_counts_by_campaign().await,
        repo.gps_counts_by_campaign().await,
        repo.social_counts_by_campaign().await,
    ) {
        (Ok(m), Ok(g), Ok(s)) => (m, g, s),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return error_from_fieldtrack(&e),
    };

    let summaries: Vec<CampaignSummary> = campaigns
        .into_iter()
        .map(|campaign| {
            let id = campaign.id;
            CampaignSummary {
                campaign,
                media_count: media_counts.get(&id).copied().unwrap_or(0),
                gps_count: gps_counts.get(&id).copied().unwrap_or(0),
                social_links_count: social_counts.get(&id).copied().unwrap_or(0),
            }
        })
        .collect();

    success_response(summaries)
}

/// GET /api/campaigns/{id} - 活动详情
pub async fn get_campaign(path: web::Path<i64>, repo: RepoData) -> HttpResponse {
    let campaign_id = path.into_inner();
    match campaign_rollup(repo.get_ref().as_ref(), campaign_id).await {
        Ok((campaign, rollup)) => success_response(CampaignDetail { campaign, rollup }),
        Err(e) => error_from_fieldtrack(&e),
    }
}

/// PUT /api/campaigns/{id}/views - 浏览计数 +1
///
/// 顺带从 User-Agent 记录一条设备日志；设备解析/写入失败不影响计数。
pub async fn increment_views(
    req: HttpRequest,
    path: web::Path<i64>,
    repo: RepoData,
) -> HttpResponse {
    let campaign_id = path.into_inner();

    let current_views = match repo.increment_views(campaign_id).await {
        Ok(Some(views)) => views,
        Ok(None) => {
            return error_response(StatusCode::NOT_FOUND, "Campaign not found");
        }
        Err(e) => return error_from_fieldtrack(&e),
    };

    if let Some(ua) = req
        .headers()
        .get("User-Agent")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(profile) = parse_user_agent(ua) {
            if let Err(e) = repo
                .append_device(&profile.device_details, &profile.browser_details)
                .await
            {
                warn!("Failed to record device log: {}", e);
            }
        }
    }

    success_response(ViewCountResponse { current_views })
}
