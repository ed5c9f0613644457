//! 单活动汇总
//!
//! 每个事件流各做一次独立统计（COUNT + MAX captured_at），再拼装。
//! 把 campaign→media→gps→social 连成一个 JOIN 再数行，行数会按
//! 各关系基数的乘积膨胀——这里从接口上杜绝这种算法。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{FieldtrackError, Result};
use crate::repository::{Campaign, Repository};

/// 单活动三流汇总
#[derive(Debug, Clone, Serialize)]
pub struct CampaignRollup {
    pub media_count: u64,
    pub gps_count: u64,
    pub social_count: u64,
    /// 三条流里最新一条事件的时间；没有事件时缺省
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// 计算活动汇总；活动不存在返回 NotFound
pub async fn campaign_rollup(
    repo: &dyn Repository,
    campaign_id: i64,
) -> Result<(Campaign, CampaignRollup)> {
    let campaign = repo.campaign(campaign_id).await?.ok_or_else(|| {
        FieldtrackError::not_found(format!("Campaign {} not found", campaign_id))
    })?;

    // 每关系一次独立计数
    let media = repo.media_stats(campaign_id).await?;
    let gps = repo.gps_stats(campaign_id).await?;
    let social = repo.social_stats(campaign_id).await?;

    let last_activity_at = [media.last_at, gps.last_at, social.last_at]
        .into_iter()
        .flatten()
        .max();

    Ok((
        campaign,
        CampaignRollup {
            media_count: media.count,
            gps_count: gps.count,
            social_count: social.count,
            last_activity_at,
        },
    ))
}
