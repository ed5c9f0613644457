//! 仪表盘视图拼装
//!
//! 组合全局活动汇总、媒体汇总、平台占比和最近动态。
//! 最近动态是三类事件的原始时间序合并（每源先取各自 top-K 再归并），
//! 与分桶时间线无关。

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::EventKind;
use super::distribution;
use crate::errors::Result;
use crate::repository::{CampaignTotals, Platform, Repository};

/// 最近动态条数
pub const RECENT_FEED_LIMIT: usize = 10;

/// 全局媒体汇总：照片数 + 视频数（前/后摄合并）
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MediaTotals {
    pub total_photos: u64,
    pub total_videos: u64,
}

/// 平台占比
#[derive(Debug, Clone, Serialize)]
pub struct PlatformShare {
    pub platform: Platform,
    pub count: u64,
    pub percentage: f64,
}

/// 最近动态条目
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub details: String,
}

/// 仪表盘响应
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub campaigns: CampaignTotals,
    pub media: MediaTotals,
    pub platform_distribution: Vec<PlatformShare>,
    pub recent_activity: Vec<ActivityEntry>,
}

/// 拼装仪表盘；now 用于「24 小时内新建」窗口
pub async fn build(repo: &dyn Repository, now: DateTime<Utc>) -> Result<DashboardSummary> {
    let campaigns = repo.campaign_totals(now - Duration::hours(24)).await?;

    let mut media = MediaTotals::default();
    for (media_type, count) in repo.media_type_counts(None).await? {
        if media_type.is_video() {
            media.total_videos += count;
        } else {
            media.total_photos += count;
        }
    }

    let platform_distribution = platform_shares(repo.platform_counts(None).await?);
    let recent_activity = recent_feed(repo).await?;

    Ok(DashboardSummary {
        campaigns,
        media,
        platform_distribution,
        recent_activity,
    })
}

/// 平台计数 → 占比，计数降序
pub fn platform_shares(counts: Vec<(Platform, u64)>) -> Vec<PlatformShare> {
    let total: u64 = counts.iter().map(|(_, count)| count).sum();
    let mut shares: Vec<PlatformShare> = counts
        .into_iter()
        .map(|(platform, count)| PlatformShare {
            platform,
            count,
            percentage: distribution::share(count, total),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// 三源各取 top-K 后归并出全局最近 K 条
async fn recent_feed(repo: &dyn Repository) -> Result<Vec<ActivityEntry>> {
    let limit = RECENT_FEED_LIMIT as u64;
    let mut entries: Vec<ActivityEntry> = Vec::with_capacity(RECENT_FEED_LIMIT * 3);

    for event in repo.recent_media(limit).await? {
        entries.push(ActivityEntry {
            kind: EventKind::Media,
            timestamp: event.captured_at,
            details: event.media_type.as_str().to_string(),
        });
    }
    for event in repo.recent_gps(limit).await? {
        entries.push(ActivityEntry {
            kind: EventKind::Gps,
            timestamp: event.captured_at,
            details: format!("{},{}", event.latitude, event.longitude),
        });
    }
    for event in repo.recent_social(limit).await? {
        entries.push(ActivityEntry {
            kind: EventKind::Social,
            timestamp: event.captured_at,
            details: format!("{}: {}", event.platform, event.video_url),
        });
    }

    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries.truncate(RECENT_FEED_LIMIT);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_shares_ordered_and_normalized() {
        let shares = platform_shares(vec![
            (Platform::Youtube, 1),
            (Platform::Tiktok, 3),
            (Platform::Instagram, 0),
        ]);
        assert_eq!(shares[0].platform, Platform::Tiktok);
        assert_eq!(shares[0].percentage, 75.0);
        assert_eq!(shares[1].percentage, 25.0);
        assert_eq!(shares[2].percentage, 0.0);
    }

    #[test]
    fn platform_shares_empty_total() {
        let shares = platform_shares(vec![(Platform::Youtube, 0)]);
        assert_eq!(shares[0].percentage, 0.0);
    }
}
