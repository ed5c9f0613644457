//! 内存仓库实现
//!
//! 无持久化的轻量后端，主要用于测试注入和本地试跑。
//! 语义与 SeaORM 实现一致：追加只增、id 在各自事件类型内自增唯一、
//! 聚合全部按单关系独立计算。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::analytics::{EventKind, EventStamp};
use crate::errors::Result;

use super::super::Repository;
use super::super::models::{
    Campaign, CampaignTotals, DeviceUsageRow, GpsEvent, MediaEvent, MediaType, Platform,
    SocialEvent, StreamStats,
};

#[derive(Debug, Clone)]
struct DeviceRow {
    device_details: String,
    browser_details: String,
}

#[derive(Default)]
struct Inner {
    campaigns: Vec<Campaign>,
    media: Vec<MediaEvent>,
    gps: Vec<GpsEvent>,
    social: Vec<SocialEvent>,
    devices: Vec<DeviceRow>,
    next_campaign_id: i64,
    next_media_id: i64,
    next_gps_id: i64,
    next_social_id: i64,
}

pub struct MemoryRepository {
    inner: RwLock<Inner>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// 测试注入：绕过追加路径直接塞入带指定时间戳的事件
impl MemoryRepository {
    pub async fn seed_media(&self, event: MediaEvent) {
        let mut inner = self.inner.write().await;
        inner.next_media_id = inner.next_media_id.max(event.id);
        inner.media.push(event);
    }

    pub async fn seed_gps(&self, event: GpsEvent) {
        let mut inner = self.inner.write().await;
        inner.next_gps_id = inner.next_gps_id.max(event.id);
        inner.gps.push(event);
    }

    pub async fn seed_social(&self, event: SocialEvent) {
        let mut inner = self.inner.write().await;
        inner.next_social_id = inner.next_social_id.max(event.id);
        inner.social.push(event);
    }
}

fn counts_by_campaign<T>(events: &[T], campaign_id: impl Fn(&T) -> i64) -> HashMap<i64, u64> {
    let mut counts: HashMap<i64, u64> = HashMap::new();
    for event in events {
        *counts.entry(campaign_id(event)).or_insert(0) += 1;
    }
    counts
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    async fn create_campaign(&self, name: &str) -> Result<Campaign> {
        let mut inner = self.inner.write().await;
        inner.next_campaign_id += 1;
        let campaign = Campaign {
            id: inner.next_campaign_id,
            name: name.to_string(),
            created_at: Utc::now(),
            current_views: 0,
        };
        inner.campaigns.push(campaign.clone());
        Ok(campaign)
    }

    async fn campaign(&self, id: i64) -> Result<Option<Campaign>> {
        let inner = self.inner.read().await;
        Ok(inner.campaigns.iter().find(|c| c.id == id).cloned())
    }

    async fn campaigns(&self) -> Result<Vec<Campaign>> {
        let inner = self.inner.read().await;
        let mut campaigns = inner.campaigns.clone();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(campaigns)
    }

    async fn increment_views(&self, id: i64) -> Result<Option<i64>> {
        let mut inner = self.inner.write().await;
        match inner.campaigns.iter_mut().find(|c| c.id == id) {
            Some(campaign) => {
                campaign.current_views += 1;
                Ok(Some(campaign.current_views))
            }
            None => Ok(None),
        }
    }

    async fn campaign_totals(&self, newer_than: DateTime<Utc>) -> Result<CampaignTotals> {
        let inner = self.inner.read().await;
        Ok(CampaignTotals {
            total_campaigns: inner.campaigns.len() as u64,
            new_campaigns: inner
                .campaigns
                .iter()
                .filter(|c| c.created_at >= newer_than)
                .count() as u64,
            total_views: inner.campaigns.iter().map(|c| c.current_views).sum(),
        })
    }

    async fn append_media(
        &self,
        campaign_id: i64,
        media_type: MediaType,
        file_path: &str,
    ) -> Result<MediaEvent> {
        let mut inner = self.inner.write().await;
        inner.next_media_id += 1;
        let event = MediaEvent {
            id: inner.next_media_id,
            campaign_id,
            media_type,
            file_path: file_path.to_string(),
            captured_at: Utc::now(),
        };
        inner.media.push(event.clone());
        Ok(event)
    }

    async fn append_gps(
        &self,
        campaign_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<GpsEvent> {
        let mut inner = self.inner.write().await;
        inner.next_gps_id += 1;
        let event = GpsEvent {
            id: inner.next_gps_id,
            campaign_id,
            latitude,
            longitude,
            captured_at: Utc::now(),
        };
        inner.gps.push(event.clone());
        Ok(event)
    }

    async fn append_social(
        &self,
        campaign_id: i64,
        platform: Platform,
        video_url: &str,
    ) -> Result<SocialEvent> {
        let mut inner = self.inner.write().await;
        inner.next_social_id += 1;
        let event = SocialEvent {
            id: inner.next_social_id,
            campaign_id,
            platform,
            video_url: video_url.to_string(),
            captured_at: Utc::now(),
        };
        inner.social.push(event.clone());
        Ok(event)
    }

    async fn append_device(&self, device_details: &str, browser_details: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.devices.push(DeviceRow {
            device_details: device_details.to_string(),
            browser_details: browser_details.to_string(),
        });
        Ok(())
    }

    async fn media_events(
        &self,
        campaign_id: i64,
        media_type: Option<MediaType>,
    ) -> Result<Vec<MediaEvent>> {
        let inner = self.inner.read().await;
        let mut events: Vec<MediaEvent> = inner
            .media
            .iter()
            .filter(|e| e.campaign_id == campaign_id)
            .filter(|e| media_type.is_none_or(|t| e.media_type == t))
            .cloned()
            .collect();
        events.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        Ok(events)
    }

    async fn gps_events(&self, campaign_id: i64) -> Result<Vec<GpsEvent>> {
        let inner = self.inner.read().await;
        let mut events: Vec<GpsEvent> = inner
            .gps
            .iter()
            .filter(|e| e.campaign_id == campaign_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        Ok(events)
    }

    async fn gps_events_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<GpsEvent>> {
        let inner = self.inner.read().await;
        Ok(inner
            .gps
            .iter()
            .filter(|e| since.is_none_or(|s| e.captured_at >= s))
            .cloned()
            .collect())
    }

    async fn social_events(
        &self,
        campaign_id: i64,
        platform: Option<Platform>,
    ) -> Result<Vec<SocialEvent>> {
        let inner = self.inner.read().await;
        let mut events: Vec<SocialEvent> = inner
            .social
            .iter()
            .filter(|e| e.campaign_id == campaign_id)
            .filter(|e| platform.is_none_or(|p| e.platform == p))
            .cloned()
            .collect();
        events.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        Ok(events)
    }

    async fn media_stats(&self, campaign_id: i64) -> Result<StreamStats> {
        let inner = self.inner.read().await;
        let events: Vec<&MediaEvent> = inner
            .media
            .iter()
            .filter(|e| e.campaign_id == campaign_id)
            .collect();
        Ok(StreamStats {
            count: events.len() as u64,
            last_at: events.iter().map(|e| e.captured_at).max(),
        })
    }

    async fn gps_stats(&self, campaign_id: i64) -> Result<StreamStats> {
        let inner = self.inner.read().await;
        let events: Vec<&GpsEvent> = inner
            .gps
            .iter()
            .filter(|e| e.campaign_id == campaign_id)
            .collect();
        Ok(StreamStats {
            count: events.len() as u64,
            last_at: events.iter().map(|e| e.captured_at).max(),
        })
    }

    async fn social_stats(&self, campaign_id: i64) -> Result<StreamStats> {
        let inner = self.inner.read().await;
        let events: Vec<&SocialEvent> = inner
            .social
            .iter()
            .filter(|e| e.campaign_id == campaign_id)
            .collect();
        Ok(StreamStats {
            count: events.len() as u64,
            last_at: events.iter().map(|e| e.captured_at).max(),
        })
    }

    async fn media_counts_by_campaign(&self) -> Result<HashMap<i64, u64>> {
        let inner = self.inner.read().await;
        Ok(counts_by_campaign(&inner.media, |e| e.campaign_id))
    }

    async fn gps_counts_by_campaign(&self) -> Result<HashMap<i64, u64>> {
        let inner = self.inner.read().await;
        Ok(counts_by_campaign(&inner.gps, |e| e.campaign_id))
    }

    async fn social_counts_by_campaign(&self) -> Result<HashMap<i64, u64>> {
        let inner = self.inner.read().await;
        Ok(counts_by_campaign(&inner.social, |e| e.campaign_id))
    }

    async fn media_type_counts(&self, campaign_id: Option<i64>) -> Result<Vec<(MediaType, u64)>> {
        let inner = self.inner.read().await;
        let mut counts: HashMap<MediaType, u64> = HashMap::new();
        for event in inner
            .media
            .iter()
            .filter(|e| campaign_id.is_none_or(|id| e.campaign_id == id))
        {
            *counts.entry(event.media_type).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn platform_counts(&self, campaign_id: Option<i64>) -> Result<Vec<(Platform, u64)>> {
        let inner = self.inner.read().await;
        let mut counts: HashMap<Platform, u64> = HashMap::new();
        for event in inner
            .social
            .iter()
            .filter(|e| campaign_id.is_none_or(|id| e.campaign_id == id))
        {
            *counts.entry(event.platform).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn device_counts(&self) -> Result<Vec<DeviceUsageRow>> {
        let inner = self.inner.read().await;
        let mut counts: HashMap<(String, String), u64> = HashMap::new();
        for row in &inner.devices {
            *counts
                .entry((row.device_details.clone(), row.browser_details.clone()))
                .or_insert(0) += 1;
        }
        let mut rows: Vec<DeviceUsageRow> = counts
            .into_iter()
            .map(|((device_details, browser_details), count)| DeviceUsageRow {
                device_details,
                browser_details,
                count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(rows)
    }

    async fn event_stamps(&self, kind: EventKind) -> Result<Vec<EventStamp>> {
        let inner = self.inner.read().await;
        let stamps = match kind {
            EventKind::Media => inner
                .media
                .iter()
                .map(|e| EventStamp {
                    id: e.id,
                    captured_at: e.captured_at,
                })
                .collect(),
            EventKind::Gps => inner
                .gps
                .iter()
                .map(|e| EventStamp {
                    id: e.id,
                    captured_at: e.captured_at,
                })
                .collect(),
            EventKind::Social => inner
                .social
                .iter()
                .map(|e| EventStamp {
                    id: e.id,
                    captured_at: e.captured_at,
                })
                .collect(),
        };
        Ok(stamps)
    }

    async fn recent_media(&self, limit: u64) -> Result<Vec<MediaEvent>> {
        let inner = self.inner.read().await;
        let mut events = inner.media.clone();
        events.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        events.truncate(limit as usize);
        Ok(events)
    }

    async fn recent_gps(&self, limit: u64) -> Result<Vec<GpsEvent>> {
        let inner = self.inner.read().await;
        let mut events = inner.gps.clone();
        events.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        events.truncate(limit as usize);
        Ok(events)
    }

    async fn recent_social(&self, limit: u64) -> Result<Vec<SocialEvent>> {
        let inner = self.inner.read().await;
        let mut events = inner.social.clone();
        events.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        events.truncate(limit as usize);
        Ok(events)
    }
}
