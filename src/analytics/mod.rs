//! 分析聚合引擎
//!
//! 把三个独立增长的事件日志（媒体、GPS、社交链接）转成一致的
//! 横截面/时间截面视图：
//! - `rollup`：单活动 fan-out 安全的独立计数
//! - `bucket`：时间戳 → 规范分桶键
//! - `timeline`：三流合并的分桶时间线
//! - `geo`：坐标网格聚类
//! - `distribution`：分组计数 → 百分比
//! - `dashboard`：顶层仪表盘视图
//!
//! 所有组件无状态：每次调用都是当前事件日志快照的纯函数。

pub mod bucket;
pub mod dashboard;
pub mod distribution;
pub mod geo;
pub mod rollup;
pub mod timeline;

pub use bucket::Granularity;
pub use geo::Timeframe;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 事件类型标签
///
/// id 只在各自事件类型内唯一；跨类型判等永远用 (类型, id) 二元组。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Media,
    Gps,
    Social,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Gps => "gps",
            Self::Social => "social",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 时间线聚合所需的最小事件视图：类型内 id + 时间戳
#[derive(Debug, Clone, Copy)]
pub struct EventStamp {
    pub id: i64,
    pub captured_at: DateTime<Utc>,
}
