//! 分析报表端点
//!
//! 五个只读报表，全部即时从存储重算（无进程内缓存）：
//! - GET /reports/dashboard：仪表盘
//! - GET /reports/campaign：单活动汇总 + 分类细分
//! - GET /reports/geographic：地理网格聚类
//! - GET /reports/devices：设备/浏览器分布
//! - GET /reports/timeline：分桶活动时间线

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analytics::timeline::DEFAULT_BUCKET_LIMIT;
use crate::analytics::{Granularity, Timeframe, dashboard, distribution, geo, rollup, timeline};
use crate::repository::{MediaType, Platform};

use super::RepoData;
use super::campaigns::CampaignDetail;
use super::helpers::{api_result, error_from_fieldtrack, error_response, success_response};

// ============ 请求参数 ============

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignReportQuery {
    pub campaign_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeographicQuery {
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineQuery {
    pub period: Option<String>,
    pub limit: Option<String>,
}

// ============ 响应结构 ============

#[derive(Debug, Clone, Serialize)]
pub struct MediaTypeCount {
    pub media_type: MediaType,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformCount {
    pub platform: Platform,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignReport {
    pub campaign: CampaignDetail,
    pub media_breakdown: Vec<MediaTypeCount>,
    pub platform_breakdown: Vec<PlatformCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceUsage {
    pub device_details: String,
    pub browser_details: String,
    pub count: u64,
    pub percentage: f64,
}

// ============ 端点 ============

/// GET /api/reports/dashboard - 仪表盘汇总
pub async fn get_dashboard(repo: RepoData) -> HttpResponse {
    api_result(dashboard::build(repo.get_ref().as_ref(), Utc::now()).await)
}

/// GET /api/reports/campaign?campaign_id= - 单活动报表
pub async fn get_campaign_report(
    query: web::Query<CampaignReportQuery>,
    repo: RepoData,
) -> HttpResponse {
    let Some(raw_id) = query.campaign_id.as_deref() else {
        return error_response(StatusCode::BAD_REQUEST, "campaign_id is required");
    };
    let Ok(campaign_id) = raw_id.parse::<i64>() else {
        return error_response(StatusCode::BAD_REQUEST, "campaign_id must be an integer");
    };

    let (campaign, campaign_rollup) =
        match rollup::campaign_rollup(repo.get_ref().as_ref(), campaign_id).await {
            Ok(found) => found,
            Err(e) => return error_from_fieldtrack(&e),
        };

    let media_breakdown = match repo.media_type_counts(Some(campaign_id)).await {
        Ok(counts) => counts
            .into_iter()
            .map(|(media_type, count)| MediaTypeCount { media_type, count })
            .collect(),
        Err(e) => return error_from_fieldtrack(&e),
    };

    let platform_breakdown = match repo.platform_counts(Some(campaign_id)).await {
        Ok(counts) => counts
            .into_iter()
            .map(|(platform, count)| PlatformCount { platform, count })
            .collect(),
        Err(e) => return error_from_fieldtrack(&e),
    };

    success_response(CampaignReport {
        campaign: CampaignDetail {
            campaign,
            rollup: campaign_rollup,
        },
        media_breakdown,
        platform_breakdown,
    })
}

/// GET /api/reports/geographic?timeframe= - 地理聚类
pub async fn get_geographic_clusters(
    query: web::Query<GeographicQuery>,
    repo: RepoData,
) -> HttpResponse {
    let timeframe = match query.timeframe.as_deref() {
        Some(raw) => match raw.parse::<Timeframe>() {
            Ok(timeframe) => timeframe,
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "timeframe must be one of: 24h, 7d, 30d, all",
                );
            }
        },
        None => Timeframe::default(),
    };

    api_result(geo::clusters(repo.get_ref().as_ref(), timeframe, Utc::now()).await)
}

/// GET /api/reports/devices - 设备/浏览器分布
pub async fn get_device_distribution(repo: RepoData) -> HttpResponse {
    let rows = match repo.device_counts().await {
        Ok(rows) => rows,
        Err(e) => return error_from_fieldtrack(&e),
    };

    let total: u64 = rows.iter().map(|r| r.count).sum();
    let usage: Vec<DeviceUsage> = rows
        .into_iter()
        .map(|row| DeviceUsage {
            percentage: distribution::share(row.count, total),
            device_details: row.device_details,
            browser_details: row.browser_details,
            count: row.count,
        })
        .collect();

    success_response(usage)
}

/// GET /api/reports/timeline?period=&limit= - 活动时间线
pub async fn get_activity_timeline(
    query: web::Query<TimelineQuery>,
    repo: RepoData,
) -> HttpResponse {
    let granularity = match query.period.as_deref() {
        Some(raw) => match raw.parse::<Granularity>() {
            Ok(granularity) => granularity,
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "period must be one of: hourly, daily, weekly, monthly",
                );
            }
        },
        None => Granularity::default(),
    };

    let limit = match query.limit.as_deref() {
        Some(raw) => match raw.parse::<usize>() {
            // 上限固定 30 个桶
            Ok(limit) if limit >= 1 => limit.min(DEFAULT_BUCKET_LIMIT),
            _ => {
                return error_response(StatusCode::BAD_REQUEST, "limit must be a positive integer");
            }
        },
        None => DEFAULT_BUCKET_LIMIT,
    };

    api_result(timeline::timeline(repo.get_ref().as_ref(), granularity, limit).await)
}
