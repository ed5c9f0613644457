//! 分析引擎测试
//!
//! 覆盖 rollup、timeline、geo、dashboard 在内存仓库上的端到端语义，
//! 重点验证 fan-out 安全计数与跨类型 id 撞号。

use chrono::{Duration, TimeZone, Utc};

use fieldtrack::analytics::rollup::campaign_rollup;
use fieldtrack::analytics::{Granularity, Timeframe, dashboard, geo, timeline};
use fieldtrack::repository::{
    GpsEvent, MediaEvent, MediaType, MemoryRepository, Platform, Repository, SocialEvent,
};

// =============================================================================
// 构造辅助
// =============================================================================

async fn repo_with_campaign() -> (MemoryRepository, i64) {
    let repo = MemoryRepository::new();
    let campaign = repo.create_campaign("launch week").await.unwrap();
    (repo, campaign.id)
}

fn media(id: i64, campaign_id: i64, minutes_ago: i64) -> MediaEvent {
    MediaEvent {
        id,
        campaign_id,
        media_type: MediaType::Photo,
        file_path: format!("uploads/photos/{}.jpg", id),
        captured_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

fn gps(id: i64, campaign_id: i64, minutes_ago: i64) -> GpsEvent {
    GpsEvent {
        id,
        campaign_id,
        latitude: 52.52,
        longitude: 13.40,
        captured_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

fn social(id: i64, campaign_id: i64, minutes_ago: i64) -> SocialEvent {
    SocialEvent {
        id,
        campaign_id,
        platform: Platform::Tiktok,
        video_url: format!("https://www.tiktok.com/@user/video/{}", id),
        captured_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

// =============================================================================
// Rollup 测试
// =============================================================================

#[tokio::test]
async fn rollup_counts_each_relation_independently() {
    let (repo, id) = repo_with_campaign().await;

    // 1 条媒体、50 条 GPS、0 条社交：计数必须是 (1, 50, 0)，
    // 任何 JOIN 派生的算法会把媒体数放大成 50
    repo.seed_media(media(1, id, 10)).await;
    for i in 1..=50 {
        repo.seed_gps(gps(i, id, i)).await;
    }

    let (_, rollup) = campaign_rollup(&repo, id).await.unwrap();
    assert_eq!(rollup.media_count, 1);
    assert_eq!(rollup.gps_count, 50);
    assert_eq!(rollup.social_count, 0);
}

#[tokio::test]
async fn rollup_unknown_campaign_is_not_found() {
    let repo = MemoryRepository::new();
    let err = campaign_rollup(&repo, 999).await.unwrap_err();
    assert_eq!(
        err.http_status(),
        actix_web::http::StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn rollup_last_activity_spans_all_streams() {
    let (repo, id) = repo_with_campaign().await;

    repo.seed_media(media(1, id, 60)).await;
    repo.seed_gps(gps(1, id, 30)).await;
    // 社交事件最新，last_activity 必须取它
    let newest = social(1, id, 5);
    let newest_at = newest.captured_at;
    repo.seed_social(newest).await;

    let (_, rollup) = campaign_rollup(&repo, id).await.unwrap();
    assert_eq!(rollup.last_activity_at, Some(newest_at));
}

#[tokio::test]
async fn rollup_without_events_has_no_last_activity() {
    let (repo, id) = repo_with_campaign().await;
    let (_, rollup) = campaign_rollup(&repo, id).await.unwrap();
    assert_eq!(rollup.last_activity_at, None);
    assert_eq!(rollup.media_count, 0);
}

// =============================================================================
// Timeline 测试
// =============================================================================

#[tokio::test]
async fn timeline_counts_colliding_ids_per_type() {
    let (repo, id) = repo_with_campaign().await;
    let ts = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();

    // 三类事件都用 id=7，同一天的桶必须报 (1,1,1)
    let mut m = media(7, id, 0);
    m.captured_at = ts;
    repo.seed_media(m).await;
    let mut g = gps(7, id, 0);
    g.captured_at = ts;
    repo.seed_gps(g).await;
    let mut s = social(7, id, 0);
    s.captured_at = ts;
    repo.seed_social(s).await;

    let buckets = timeline::timeline(&repo, Granularity::Daily, 30)
        .await
        .unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].media_count, 1);
    assert_eq!(buckets[0].gps_count, 1);
    assert_eq!(buckets[0].social_count, 1);
}

#[tokio::test]
async fn timeline_keys_descend_and_sum_matches() {
    let (repo, id) = repo_with_campaign().await;
    for day in 1..=5 {
        let mut event = media(day as i64, id, 0);
        event.captured_at = Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap();
        repo.seed_media(event).await;
    }

    let buckets = timeline::timeline(&repo, Granularity::Daily, 30)
        .await
        .unwrap();
    assert_eq!(buckets.len(), 5);
    for pair in buckets.windows(2) {
        assert!(pair[0].bucket_key > pair[1].bucket_key);
    }
    let total: u64 = buckets.iter().map(|b| b.media_count).sum();
    assert_eq!(total, 5);
}

// =============================================================================
// Geo 测试
// =============================================================================

#[tokio::test]
async fn clusters_24h_excludes_old_pings() {
    let (repo, id) = repo_with_campaign().await;
    repo.seed_gps(gps(1, id, 10)).await;
    // 25 小时前的 ping 必须被 24h 窗口排除
    repo.seed_gps(gps(2, id, 25 * 60)).await;

    let clusters = geo::clusters(&repo, Timeframe::Last24h, Utc::now())
        .await
        .unwrap();
    let total: u64 = clusters.iter().map(|c| c.point_count).sum();
    assert_eq!(total, 1);

    let all = geo::clusters(&repo, Timeframe::All, Utc::now())
        .await
        .unwrap();
    let total_all: u64 = all.iter().map(|c| c.point_count).sum();
    assert_eq!(total_all, 2);
}

// =============================================================================
// Dashboard 测试
// =============================================================================

#[tokio::test]
async fn dashboard_composes_totals_and_shares() {
    let (repo, id) = repo_with_campaign().await;
    repo.increment_views(id).await.unwrap();
    repo.increment_views(id).await.unwrap();

    // 2 照片 + 1 前摄视频 + 1 后摄视频 → photos=2, videos=2
    repo.seed_media(media(1, id, 10)).await;
    repo.seed_media(media(2, id, 9)).await;
    let mut front = media(3, id, 8);
    front.media_type = MediaType::VideoFront;
    repo.seed_media(front).await;
    let mut rear = media(4, id, 7);
    rear.media_type = MediaType::VideoRear;
    repo.seed_media(rear).await;

    // 3 tiktok + 1 youtube → 75% / 25%
    for i in 1..=3 {
        repo.seed_social(social(i, id, i)).await;
    }
    let mut yt = social(4, id, 1);
    yt.platform = Platform::Youtube;
    yt.video_url = "https://youtu.be/abc123".to_string();
    repo.seed_social(yt).await;

    let summary = dashboard::build(&repo, Utc::now()).await.unwrap();

    assert_eq!(summary.campaigns.total_campaigns, 1);
    assert_eq!(summary.campaigns.new_campaigns, 1);
    assert_eq!(summary.campaigns.total_views, 2);
    assert_eq!(summary.media.total_photos, 2);
    assert_eq!(summary.media.total_videos, 2);

    assert_eq!(summary.platform_distribution[0].platform, Platform::Tiktok);
    assert_eq!(summary.platform_distribution[0].percentage, 75.0);
    assert_eq!(summary.platform_distribution[1].percentage, 25.0);
}

#[tokio::test]
async fn dashboard_recent_feed_is_capped_and_sorted() {
    let (repo, id) = repo_with_campaign().await;
    // 每类 6 条共 18 条，feed 必须只保留最新 10 条
    for i in 1..=6 {
        repo.seed_media(media(i, id, i)).await;
        repo.seed_gps(gps(i, id, i + 20)).await;
        repo.seed_social(social(i, id, i + 40)).await;
    }

    let summary = dashboard::build(&repo, Utc::now()).await.unwrap();
    assert_eq!(summary.recent_activity.len(), 10);
    for pair in summary.recent_activity.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
    // 最新的都是媒体（1..6 分钟前），其次是 GPS
    assert_eq!(
        summary.recent_activity[0].kind,
        fieldtrack::analytics::EventKind::Media
    );
}

#[tokio::test]
async fn dashboard_empty_store_is_all_zero() {
    let repo = MemoryRepository::new();
    let summary = dashboard::build(&repo, Utc::now()).await.unwrap();
    assert_eq!(summary.campaigns.total_campaigns, 0);
    assert_eq!(summary.media.total_photos, 0);
    assert!(summary.platform_distribution.is_empty());
    assert!(summary.recent_activity.is_empty());
}
