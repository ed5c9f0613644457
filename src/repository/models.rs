//! 仓库层领域模型
//!
//! 实体表存储字符串列；枚举在这一层解析（入库前已校验）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 追踪会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub current_views: i64,
}

/// 全局活动汇总（dashboard 用）
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CampaignTotals {
    pub total_campaigns: u64,
    pub new_campaigns: u64,
    pub total_views: i64,
}

/// 媒体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Photo,
    VideoFront,
    VideoRear,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::VideoFront => "video_front",
            Self::VideoRear => "video_rear",
        }
    }

    /// video_front 和 video_rear 统计时归为视频
    pub fn is_video(&self) -> bool {
        matches!(self, Self::VideoFront | Self::VideoRear)
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(Self::Photo),
            "video_front" => Ok(Self::VideoFront),
            "video_rear" => Ok(Self::VideoRear),
            _ => Err(format!("Unknown media type: {}", s)),
        }
    }
}

/// 社交平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Tiktok,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Instagram => "instagram",
            Self::Tiktok => "tiktok",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "youtube" => Ok(Self::Youtube),
            "instagram" => Ok(Self::Instagram),
            "tiktok" => Ok(Self::Tiktok),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

/// 拍摄的媒体事件
#[derive(Debug, Clone, Serialize)]
pub struct MediaEvent {
    pub id: i64,
    pub campaign_id: i64,
    pub media_type: MediaType,
    pub file_path: String,
    pub captured_at: DateTime<Utc>,
}

/// GPS 坐标事件
#[derive(Debug, Clone, Serialize)]
pub struct GpsEvent {
    pub id: i64,
    pub campaign_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: DateTime<Utc>,
}

/// 社交链接事件
#[derive(Debug, Clone, Serialize)]
pub struct SocialEvent {
    pub id: i64,
    pub campaign_id: i64,
    pub platform: Platform,
    pub video_url: String,
    pub captured_at: DateTime<Utc>,
}

/// 单事件流的独立统计：计数 + 最后活动时间
///
/// 每个流单独一次计数，绝不通过多关系 JOIN 推导（fan-out 风险）。
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamStats {
    pub count: u64,
    pub last_at: Option<DateTime<Utc>>,
}

/// 设备/浏览器分组计数
#[derive(Debug, Clone)]
pub struct DeviceUsageRow {
    pub device_details: String,
    pub browser_details: String,
    pub count: u64,
}
