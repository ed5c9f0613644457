//! SeaORM 仓库测试（SQLite）
//!
//! 在临时 sqlite 库上验证迁移、追加与各个单关系聚合查询。

use chrono::{Duration, Utc};
use tempfile::TempDir;

use fieldtrack::analytics::EventKind;
use fieldtrack::repository::{MediaType, Platform, Repository, SeaOrmRepository};
use fieldtrack::storage::SeaOrmStorage;

async fn create_temp_repo() -> (SeaOrmRepository, TempDir) {
    let td = TempDir::new().unwrap();
    let p = td.path().join("test.db");
    let u = format!("sqlite://{}?mode=rwc", p.display());
    let storage = SeaOrmStorage::new(&u, "sqlite").await.unwrap();
    (SeaOrmRepository::new(storage), td)
}

// =============================================================================
// 活动
// =============================================================================

#[tokio::test]
async fn campaign_lifecycle() {
    let (repo, _td) = create_temp_repo().await;

    let created = repo.create_campaign("river walk").await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.current_views, 0);

    let fetched = repo.campaign(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "river walk");

    assert_eq!(repo.campaign(created.id + 99).await.unwrap(), None);

    assert_eq!(repo.increment_views(created.id).await.unwrap(), Some(1));
    assert_eq!(repo.increment_views(created.id).await.unwrap(), Some(2));
    assert_eq!(repo.increment_views(created.id + 99).await.unwrap(), None);

    let listed = repo.campaigns().await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn campaign_totals_windows_new_campaigns() {
    let (repo, _td) = create_temp_repo().await;
    let a = repo.create_campaign("a").await.unwrap();
    repo.create_campaign("b").await.unwrap();
    repo.increment_views(a.id).await.unwrap();

    let totals = repo
        .campaign_totals(Utc::now() - Duration::hours(24))
        .await
        .unwrap();
    assert_eq!(totals.total_campaigns, 2);
    assert_eq!(totals.new_campaigns, 2);
    assert_eq!(totals.total_views, 1);

    // 未来时刻作下界 → 没有「新建」活动
    let totals = repo
        .campaign_totals(Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(totals.new_campaigns, 0);
}

// =============================================================================
// 事件追加与单关系聚合
// =============================================================================

#[tokio::test]
async fn per_relation_stats_do_not_fan_out() {
    let (repo, _td) = create_temp_repo().await;
    let campaign = repo.create_campaign("fanout check").await.unwrap();

    repo.append_media(campaign.id, MediaType::Photo, "uploads/photos/a.jpg")
        .await
        .unwrap();
    for _ in 0..3 {
        repo.append_gps(campaign.id, 52.52, 13.40).await.unwrap();
    }

    // 1 媒体 × 3 GPS：独立计数必须是 (1, 3, 0)
    let media = repo.media_stats(campaign.id).await.unwrap();
    let gps = repo.gps_stats(campaign.id).await.unwrap();
    let social = repo.social_stats(campaign.id).await.unwrap();
    assert_eq!(media.count, 1);
    assert_eq!(gps.count, 3);
    assert_eq!(social.count, 0);
    assert!(media.last_at.is_some());
    assert_eq!(social.last_at, None);
}

#[tokio::test]
async fn grouped_counts_by_key() {
    let (repo, _td) = create_temp_repo().await;
    let campaign = repo.create_campaign("groups").await.unwrap();

    repo.append_media(campaign.id, MediaType::Photo, "p1.jpg")
        .await
        .unwrap();
    repo.append_media(campaign.id, MediaType::Photo, "p2.jpg")
        .await
        .unwrap();
    repo.append_media(campaign.id, MediaType::VideoFront, "v1.mp4")
        .await
        .unwrap();

    let counts = repo.media_type_counts(Some(campaign.id)).await.unwrap();
    let photo = counts
        .iter()
        .find(|(t, _)| *t == MediaType::Photo)
        .unwrap()
        .1;
    let video_front = counts
        .iter()
        .find(|(t, _)| *t == MediaType::VideoFront)
        .unwrap()
        .1;
    assert_eq!(photo, 2);
    assert_eq!(video_front, 1);

    repo.append_social(
        campaign.id,
        Platform::Tiktok,
        "https://www.tiktok.com/@u/video/1",
    )
    .await
    .unwrap();
    let platforms = repo.platform_counts(None).await.unwrap();
    assert_eq!(platforms, vec![(Platform::Tiktok, 1)]);

    let by_campaign = repo.media_counts_by_campaign().await.unwrap();
    assert_eq!(by_campaign.get(&campaign.id), Some(&3));
}

#[tokio::test]
async fn device_counts_group_and_order() {
    let (repo, _td) = create_temp_repo().await;

    repo.append_device("pc / Windows 10", "Chrome 120")
        .await
        .unwrap();
    repo.append_device("pc / Windows 10", "Chrome 120")
        .await
        .unwrap();
    repo.append_device("smartphone / iOS", "Safari 17")
        .await
        .unwrap();

    let rows = repo.device_counts().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[0].browser_details, "Chrome 120");
}

// =============================================================================
// 读取与时间线输入
// =============================================================================

#[tokio::test]
async fn typed_reads_filter_and_order() {
    let (repo, _td) = create_temp_repo().await;
    let campaign = repo.create_campaign("reads").await.unwrap();

    repo.append_media(campaign.id, MediaType::Photo, "p.jpg")
        .await
        .unwrap();
    repo.append_media(campaign.id, MediaType::VideoRear, "v.mp4")
        .await
        .unwrap();

    let all = repo.media_events(campaign.id, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let photos = repo
        .media_events(campaign.id, Some(MediaType::Photo))
        .await
        .unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].media_type, MediaType::Photo);

    let stamps = repo.event_stamps(EventKind::Media).await.unwrap();
    assert_eq!(stamps.len(), 2);

    repo.append_gps(campaign.id, 1.0, 2.0).await.unwrap();
    let since_future = repo
        .gps_events_since(Some(Utc::now() + Duration::hours(1)))
        .await
        .unwrap();
    assert!(since_future.is_empty());
    let unbounded = repo.gps_events_since(None).await.unwrap();
    assert_eq!(unbounded.len(), 1);

    let recent = repo.recent_media(1).await.unwrap();
    assert_eq!(recent.len(), 1);
}
