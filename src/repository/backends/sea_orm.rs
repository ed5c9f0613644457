//! SeaORM 仓库实现
//!
//! 所有聚合都是单关系查询：每个事件表各自 COUNT / MAX / GROUP BY，
//! 绝不把 campaign→media→gps→social 拼成一个 JOIN 再数行数。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, ExprTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

use crate::analytics::{EventKind, EventStamp};
use crate::errors::{FieldtrackError, Result};
use crate::storage::SeaOrmStorage;

use super::super::Repository;
use super::super::models::{
    Campaign, CampaignTotals, DeviceUsageRow, GpsEvent, MediaEvent, MediaType, Platform,
    SocialEvent, StreamStats,
};
use migration::entities::{campaign, device_log, gps_log, media_log, social_link};

// ============ 查询结果行 ============

/// 单流聚合行（COUNT + MAX captured_at）
#[derive(Debug, FromQueryResult)]
struct StatsRow {
    count: i64,
    last_at: Option<DateTime<Utc>>,
}

/// 按活动分组的计数行
#[derive(Debug, FromQueryResult)]
struct CampaignCountRow {
    campaign_id: i64,
    count: i64,
}

/// 按字符串键分组的计数行（media_type / platform）
#[derive(Debug, FromQueryResult)]
struct KeyCountRow {
    key: String,
    count: i64,
}

/// 设备/浏览器分组计数行
#[derive(Debug, FromQueryResult)]
struct DeviceCountRow {
    device_details: String,
    browser_details: String,
    count: i64,
}

/// 时间线所需的 (id, captured_at) 行
#[derive(Debug, FromQueryResult)]
struct StampRow {
    id: i64,
    captured_at: DateTime<Utc>,
}

// ============ 模型转换 ============

fn campaign_to_domain(m: campaign::Model) -> Campaign {
    Campaign {
        id: m.id,
        name: m.name,
        created_at: m.created_at,
        current_views: m.current_views,
    }
}

fn media_to_domain(m: media_log::Model) -> Result<MediaEvent> {
    let media_type = m
        .media_type
        .parse::<MediaType>()
        .map_err(FieldtrackError::database_operation)?;
    Ok(MediaEvent {
        id: m.id,
        campaign_id: m.campaign_id,
        media_type,
        file_path: m.file_path,
        captured_at: m.captured_at,
    })
}

fn gps_to_domain(m: gps_log::Model) -> GpsEvent {
    GpsEvent {
        id: m.id,
        campaign_id: m.campaign_id,
        latitude: m.latitude,
        longitude: m.longitude,
        captured_at: m.captured_at,
    }
}

fn social_to_domain(m: social_link::Model) -> Result<SocialEvent> {
    let platform = m
        .platform
        .parse::<Platform>()
        .map_err(FieldtrackError::database_operation)?;
    Ok(SocialEvent {
        id: m.id,
        campaign_id: m.campaign_id,
        platform,
        video_url: m.video_url,
        captured_at: m.captured_at,
    })
}

// ============ 仓库实现 ============

pub struct SeaOrmRepository {
    storage: SeaOrmStorage,
}

impl SeaOrmRepository {
    pub fn new(storage: SeaOrmStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &SeaOrmStorage {
        &self.storage
    }

    fn db(&self) -> &sea_orm::DatabaseConnection {
        self.storage.get_db()
    }
}

#[async_trait::async_trait]
impl Repository for SeaOrmRepository {
    async fn create_campaign(&self, name: &str) -> Result<Campaign> {
        let model = campaign::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
            current_views: Set(0),
            ..Default::default()
        };
        let inserted = model.insert(self.db()).await?;
        Ok(campaign_to_domain(inserted))
    }

    async fn campaign(&self, id: i64) -> Result<Option<Campaign>> {
        let found = campaign::Entity::find_by_id(id).one(self.db()).await?;
        Ok(found.map(campaign_to_domain))
    }

    async fn campaigns(&self) -> Result<Vec<Campaign>> {
        let rows = campaign::Entity::find()
            .order_by_desc(campaign::Column::CreatedAt)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(campaign_to_domain).collect())
    }

    async fn increment_views(&self, id: i64) -> Result<Option<i64>> {
        let updated = campaign::Entity::update_many()
            .col_expr(
                campaign::Column::CurrentViews,
                Expr::col(campaign::Column::CurrentViews).add(1),
            )
            .filter(campaign::Column::Id.eq(id))
            .exec(self.db())
            .await?;

        if updated.rows_affected == 0 {
            return Ok(None);
        }

        let current = campaign::Entity::find_by_id(id).one(self.db()).await?;
        Ok(current.map(|c| c.current_views))
    }

    async fn campaign_totals(&self, newer_than: DateTime<Utc>) -> Result<CampaignTotals> {
        let total_campaigns = campaign::Entity::find().count(self.db()).await?;
        let new_campaigns = campaign::Entity::find()
            .filter(campaign::Column::CreatedAt.gte(newer_than))
            .count(self.db())
            .await?;

        // SUM 的返回类型跨后端不一致（postgres 上是 numeric），
        // 只取列后在应用侧求和
        let views: Vec<i64> = campaign::Entity::find()
            .select_only()
            .column(campaign::Column::CurrentViews)
            .into_tuple()
            .all(self.db())
            .await?;

        Ok(CampaignTotals {
            total_campaigns,
            new_campaigns,
            total_views: views.into_iter().sum(),
        })
    }

    async fn append_media(
        &self,
        campaign_id: i64,
        media_type: MediaType,
        file_path: &str,
    ) -> Result<MediaEvent> {
        let model = media_log::ActiveModel {
            campaign_id: Set(campaign_id),
            media_type: Set(media_type.as_str().to_string()),
            file_path: Set(file_path.to_string()),
            captured_at: Set(Utc::now()),
            ..Default::default()
        };
        media_to_domain(model.insert(self.db()).await?)
    }

    async fn append_gps(
        &self,
        campaign_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<GpsEvent> {
        let model = gps_log::ActiveModel {
            campaign_id: Set(campaign_id),
            latitude: Set(latitude),
            longitude: Set(longitude),
            captured_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(gps_to_domain(model.insert(self.db()).await?))
    }

    async fn append_social(
        &self,
        campaign_id: i64,
        platform: Platform,
        video_url: &str,
    ) -> Result<SocialEvent> {
        let model = social_link::ActiveModel {
            campaign_id: Set(campaign_id),
            platform: Set(platform.as_str().to_string()),
            video_url: Set(video_url.to_string()),
            captured_at: Set(Utc::now()),
            ..Default::default()
        };
        social_to_domain(model.insert(self.db()).await?)
    }

    async fn append_device(&self, device_details: &str, browser_details: &str) -> Result<()> {
        let model = device_log::ActiveModel {
            device_details: Set(device_details.to_string()),
            browser_details: Set(browser_details.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model.insert(self.db()).await?;
        Ok(())
    }

    async fn media_events(
        &self,
        campaign_id: i64,
        media_type: Option<MediaType>,
    ) -> Result<Vec<MediaEvent>> {
        let mut query = media_log::Entity::find()
            .filter(media_log::Column::CampaignId.eq(campaign_id))
            .order_by_desc(media_log::Column::CapturedAt);
        if let Some(media_type) = media_type {
            query = query.filter(media_log::Column::MediaType.eq(media_type.as_str()));
        }
        let rows = query.all(self.db()).await?;
        rows.into_iter().map(media_to_domain).collect()
    }

    async fn gps_events(&self, campaign_id: i64) -> Result<Vec<GpsEvent>> {
        let rows = gps_log::Entity::find()
            .filter(gps_log::Column::CampaignId.eq(campaign_id))
            .order_by_desc(gps_log::Column::CapturedAt)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(gps_to_domain).collect())
    }

    async fn gps_events_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<GpsEvent>> {
        let mut query = gps_log::Entity::find();
        if let Some(since) = since {
            query = query.filter(gps_log::Column::CapturedAt.gte(since));
        }
        let rows = query.all(self.db()).await?;
        Ok(rows.into_iter().map(gps_to_domain).collect())
    }

    async fn social_events(
        &self,
        campaign_id: i64,
        platform: Option<Platform>,
    ) -> Result<Vec<SocialEvent>> {
        let mut query = social_link::Entity::find()
            .filter(social_link::Column::CampaignId.eq(campaign_id))
            .order_by_desc(social_link::Column::CapturedAt);
        if let Some(platform) = platform {
            query = query.filter(social_link::Column::Platform.eq(platform.as_str()));
        }
        let rows = query.all(self.db()).await?;
        rows.into_iter().map(social_to_domain).collect()
    }

    async fn media_stats(&self, campaign_id: i64) -> Result<StreamStats> {
        let row = media_log::Entity::find()
            .select_only()
            .column_as(media_log::Column::Id.count(), "count")
            .column_as(media_log::Column::CapturedAt.max(), "last_at")
            .filter(media_log::Column::CampaignId.eq(campaign_id))
            .into_model::<StatsRow>()
            .one(self.db())
            .await?;
        Ok(stats_from_row(row))
    }

    async fn gps_stats(&self, campaign_id: i64) -> Result<StreamStats> {
        let row = gps_log::Entity::find()
            .select_only()
            .column_as(gps_log::Column::Id.count(), "count")
            .column_as(gps_log::Column::CapturedAt.max(), "last_at")
            .filter(gps_log::Column::CampaignId.eq(campaign_id))
            .into_model::<StatsRow>()
            .one(self.db())
            .await?;
        Ok(stats_from_row(row))
    }

    async fn social_stats(&self, campaign_id: i64) -> Result<StreamStats> {
        let row = social_link::Entity::find()
            .select_only()
            .column_as(social_link::Column::Id.count(), "count")
            .column_as(social_link::Column::CapturedAt.max(), "last_at")
            .filter(social_link::Column::CampaignId.eq(campaign_id))
            .into_model::<StatsRow>()
            .one(self.db())
            .await?;
        Ok(stats_from_row(row))
    }

    async fn media_counts_by_campaign(&self) -> Result<HashMap<i64, u64>> {
        let rows = media_log::Entity::find()
            .select_only()
            .column(media_log::Column::CampaignId)
            .column_as(media_log::Column::Id.count(), "count")
            .group_by(media_log::Column::CampaignId)
            .into_model::<CampaignCountRow>()
            .all(self.db())
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.campaign_id, r.count as u64))
            .collect())
    }

    async fn gps_counts_by_campaign(&self) -> Result<HashMap<i64, u64>> {
        let rows = gps_log::Entity::find()
            .select_only()
            .column(gps_log::Column::CampaignId)
            .column_as(gps_log::Column::Id.count(), "count")
            .group_by(gps_log::Column::CampaignId)
            .into_model::<CampaignCountRow>()
            .all(self.db())
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.campaign_id, r.count as u64))
            .collect())
    }

    async fn social_counts_by_campaign(&self) -> Result<HashMap<i64, u64>> {
        let rows = social_link::Entity::find()
            .select_only()
            .column(social_link::Column::CampaignId)
            .column_as(social_link::Column::Id.count(), "count")
            .group_by(social_link::Column::CampaignId)
            .into_model::<CampaignCountRow>()
            .all(self.db())
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.campaign_id, r.count as u64))
            .collect())
    }

    async fn media_type_counts(&self, campaign_id: Option<i64>) -> Result<Vec<(MediaType, u64)>> {
        let mut query = media_log::Entity::find()
            .select_only()
            .column_as(media_log::Column::MediaType, "key")
            .column_as(media_log::Column::Id.count(), "count")
            .group_by(media_log::Column::MediaType);
        if let Some(campaign_id) = campaign_id {
            query = query.filter(media_log::Column::CampaignId.eq(campaign_id));
        }
        let rows = query.into_model::<KeyCountRow>().all(self.db()).await?;

        rows.into_iter()
            .map(|r| {
                let media_type = r
                    .key
                    .parse::<MediaType>()
                    .map_err(FieldtrackError::database_operation)?;
                Ok((media_type, r.count as u64))
            })
            .collect()
    }

    async fn platform_counts(&self, campaign_id: Option<i64>) -> Result<Vec<(Platform, u64)>> {
        let mut query = social_link::Entity::find()
            .select_only()
            .column_as(social_link::Column::Platform, "key")
            .column_as(social_link::Column::Id.count(), "count")
            .group_by(social_link::Column::Platform);
        if let Some(campaign_id) = campaign_id {
            query = query.filter(social_link::Column::CampaignId.eq(campaign_id));
        }
        let rows = query.into_model::<KeyCountRow>().all(self.db()).await?;

        rows.into_iter()
            .map(|r| {
                let platform = r
                    .key
                    .parse::<Platform>()
                    .map_err(FieldtrackError::database_operation)?;
                Ok((platform, r.count as u64))
            })
            .collect()
    }

    async fn device_counts(&self) -> Result<Vec<DeviceUsageRow>> {
        let rows = device_log::Entity::find()
            .select_only()
            .column(device_log::Column::DeviceDetails)
            .column(device_log::Column::BrowserDetails)
            .column_as(device_log::Column::Id.count(), "count")
            .group_by(device_log::Column::DeviceDetails)
            .group_by(device_log::Column::BrowserDetails)
            .order_by_desc(Expr::cust("count"))
            .into_model::<DeviceCountRow>()
            .all(self.db())
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| DeviceUsageRow {
                device_details: r.device_details,
                browser_details: r.browser_details,
                count: r.count as u64,
            })
            .collect())
    }

    async fn event_stamps(&self, kind: EventKind) -> Result<Vec<EventStamp>> {
        let rows = match kind {
            EventKind::Media => {
                media_log::Entity::find()
                    .select_only()
                    .column(media_log::Column::Id)
                    .column(media_log::Column::CapturedAt)
                    .into_model::<StampRow>()
                    .all(self.db())
                    .await?
            }
            EventKind::Gps => {
                gps_log::Entity::find()
                    .select_only()
                    .column(gps_log::Column::Id)
                    .column(gps_log::Column::CapturedAt)
                    .into_model::<StampRow>()
                    .all(self.db())
                    .await?
            }
            EventKind::Social => {
                social_link::Entity::find()
                    .select_only()
                    .column(social_link::Column::Id)
                    .column(social_link::Column::CapturedAt)
                    .into_model::<StampRow>()
                    .all(self.db())
                    .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|r| EventStamp {
                id: r.id,
                captured_at: r.captured_at,
            })
            .collect())
    }

    async fn recent_media(&self, limit: u64) -> Result<Vec<MediaEvent>> {
        let rows = media_log::Entity::find()
            .order_by_desc(media_log::Column::CapturedAt)
            .limit(limit)
            .all(self.db())
            .await?;
        rows.into_iter().map(media_to_domain).collect()
    }

    async fn recent_gps(&self, limit: u64) -> Result<Vec<GpsEvent>> {
        let rows = gps_log::Entity::find()
            .order_by_desc(gps_log::Column::CapturedAt)
            .limit(limit)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(gps_to_domain).collect())
    }

    async fn recent_social(&self, limit: u64) -> Result<Vec<SocialEvent>> {
        let rows = social_link::Entity::find()
            .order_by_desc(social_link::Column::CapturedAt)
            .limit(limit)
            .all(self.db())
            .await?;
        rows.into_iter().map(social_to_domain).collect()
    }
}

fn stats_from_row(row: Option<StatsRow>) -> StreamStats {
    match row {
        Some(row) => StreamStats {
            count: row.count as u64,
            last_at: row.last_at,
        },
        None => StreamStats::default(),
    }
}
