//! 仓库层：带类型的读写接口
//!
//! 聚合引擎只通过这里的 trait 访问外部存储；测试可注入内存实现。
//! 每个关系的计数都是独立操作，接口上就排除了多关系 JOIN 的
//! fan-out 误计。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::error;

use crate::analytics::{EventKind, EventStamp};
use crate::errors::{FieldtrackError, Result};
use crate::storage::SeaOrmStorage;

pub mod backends;
pub mod models;

pub use backends::memory::MemoryRepository;
pub use backends::sea_orm::SeaOrmRepository;
pub use models::{
    Campaign, CampaignTotals, DeviceUsageRow, GpsEvent, MediaEvent, MediaType, Platform,
    SocialEvent, StreamStats,
};

#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---- 活动 ----
    async fn create_campaign(&self, name: &str) -> Result<Campaign>;
    async fn campaign(&self, id: i64) -> Result<Option<Campaign>>;
    async fn campaigns(&self) -> Result<Vec<Campaign>>;
    /// 浏览计数 +1，返回新值；活动不存在时返回 None
    async fn increment_views(&self, id: i64) -> Result<Option<i64>>;
    /// 全局活动汇总；new_campaigns 统计 created_at >= newer_than 的活动
    async fn campaign_totals(&self, newer_than: DateTime<Utc>) -> Result<CampaignTotals>;

    // ---- 事件追加（只增不改） ----
    async fn append_media(
        &self,
        campaign_id: i64,
        media_type: MediaType,
        file_path: &str,
    ) -> Result<MediaEvent>;
    async fn append_gps(&self, campaign_id: i64, latitude: f64, longitude: f64)
    -> Result<GpsEvent>;
    async fn append_social(
        &self,
        campaign_id: i64,
        platform: Platform,
        video_url: &str,
    ) -> Result<SocialEvent>;
    async fn append_device(&self, device_details: &str, browser_details: &str) -> Result<()>;

    // ---- 带类型的读取 ----
    async fn media_events(
        &self,
        campaign_id: i64,
        media_type: Option<MediaType>,
    ) -> Result<Vec<MediaEvent>>;
    async fn gps_events(&self, campaign_id: i64) -> Result<Vec<GpsEvent>>;
    /// since 为 None 时不设下界
    async fn gps_events_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<GpsEvent>>;
    async fn social_events(
        &self,
        campaign_id: i64,
        platform: Option<Platform>,
    ) -> Result<Vec<SocialEvent>>;

    // ---- 每关系独立聚合 ----
    async fn media_stats(&self, campaign_id: i64) -> Result<StreamStats>;
    async fn gps_stats(&self, campaign_id: i64) -> Result<StreamStats>;
    async fn social_stats(&self, campaign_id: i64) -> Result<StreamStats>;
    async fn media_counts_by_campaign(&self) -> Result<HashMap<i64, u64>>;
    async fn gps_counts_by_campaign(&self) -> Result<HashMap<i64, u64>>;
    async fn social_counts_by_campaign(&self) -> Result<HashMap<i64, u64>>;
    /// campaign_id 为 None 时统计全部
    async fn media_type_counts(&self, campaign_id: Option<i64>) -> Result<Vec<(MediaType, u64)>>;
    async fn platform_counts(&self, campaign_id: Option<i64>) -> Result<Vec<(Platform, u64)>>;
    async fn device_counts(&self) -> Result<Vec<DeviceUsageRow>>;

    // ---- 时间线 / 最近动态 ----
    async fn event_stamps(&self, kind: EventKind) -> Result<Vec<EventStamp>>;
    async fn recent_media(&self, limit: u64) -> Result<Vec<MediaEvent>>;
    async fn recent_gps(&self, limit: u64) -> Result<Vec<GpsEvent>>;
    async fn recent_social(&self, limit: u64) -> Result<Vec<SocialEvent>>;
}

pub struct RepositoryFactory;

impl RepositoryFactory {
    pub async fn create() -> Result<Arc<dyn Repository>> {
        let config = crate::config::get_config();
        let backend = &config.database.backend;
        let database_url = &config.database.database_url;

        match backend.as_str() {
            "sqlite" | "mysql" | "postgres" | "mariadb" => {
                let storage = SeaOrmStorage::new(database_url, backend).await?;
                Ok(Arc::new(SeaOrmRepository::new(storage)) as Arc<dyn Repository>)
            }
            "memory" => Ok(Arc::new(MemoryRepository::new()) as Arc<dyn Repository>),
            _ => {
                error!("Unknown repository backend: {}", backend);
                Err(FieldtrackError::database_config(format!(
                    "Unknown repository backend: {}. Supported: sqlite, mysql, postgres, mariadb, memory",
                    backend
                )))
            }
        }
    }
}
