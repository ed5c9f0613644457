//! 地理网格聚类
//!
//! 经纬度各自四舍五入到两位小数（赤道附近约 1.1 km 网格），
//! 舍入结果相同的 ping 归入同一格。格子边界的舍入歧义按近似接受；
//! 极地/反经线附近的网格畸变不在处理范围内。

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::errors::Result;
use crate::repository::{GpsEvent, Repository};

/// 聚类时间窗
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    #[default]
    Last24h,
    Last7d,
    Last30d,
    All,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last24h => "24h",
            Self::Last7d => "7d",
            Self::Last30d => "30d",
            Self::All => "all",
        }
    }

    /// captured_at 下界；All 不设下界
    pub fn lower_bound(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Last24h => Some(now - Duration::hours(24)),
            Self::Last7d => Some(now - Duration::days(7)),
            Self::Last30d => Some(now - Duration::days(30)),
            Self::All => None,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "24h" => Ok(Self::Last24h),
            "7d" => Ok(Self::Last7d),
            "30d" => Ok(Self::Last30d),
            "all" => Ok(Self::All),
            _ => Err(format!("Unknown timeframe: {}", s)),
        }
    }
}

/// 一个网格聚类
#[derive(Debug, Clone, Serialize)]
pub struct GeoCluster {
    /// 格子坐标（舍入后的值）
    pub latitude: f64,
    pub longitude: f64,
    pub point_count: u64,
    /// 格内最近一条 ping 所属的活动
    pub campaign_id: i64,
    pub last_captured_at: DateTime<Utc>,
}

/// 两位小数网格键
fn cell_key(latitude: f64, longitude: f64) -> (i64, i64) {
    (
        (latitude * 100.0).round() as i64,
        (longitude * 100.0).round() as i64,
    )
}

/// 把原始 ping 聚成网格；输出按 last_captured_at 降序
pub fn cluster_pings(pings: &[GpsEvent]) -> Vec<GeoCluster> {
    use std::collections::HashMap;

    struct Cell {
        point_count: u64,
        campaign_id: i64,
        last_captured_at: DateTime<Utc>,
    }

    let mut cells: HashMap<(i64, i64), Cell> = HashMap::new();
    for ping in pings {
        let key = cell_key(ping.latitude, ping.longitude);
        match cells.get_mut(&key) {
            Some(cell) => {
                cell.point_count += 1;
                if ping.captured_at > cell.last_captured_at {
                    cell.last_captured_at = ping.captured_at;
                    cell.campaign_id = ping.campaign_id;
                }
            }
            None => {
                cells.insert(
                    key,
                    Cell {
                        point_count: 1,
                        campaign_id: ping.campaign_id,
                        last_captured_at: ping.captured_at,
                    },
                );
            }
        }
    }

    let mut clusters: Vec<GeoCluster> = cells
        .into_iter()
        .map(|((lat_key, lon_key), cell)| GeoCluster {
            latitude: lat_key as f64 / 100.0,
            longitude: lon_key as f64 / 100.0,
            point_count: cell.point_count,
            campaign_id: cell.campaign_id,
            last_captured_at: cell.last_captured_at,
        })
        .collect();

    clusters.sort_by(|a, b| b.last_captured_at.cmp(&a.last_captured_at));
    clusters
}

/// 按时间窗取 ping 并聚类
pub async fn clusters(
    repo: &dyn Repository,
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> Result<Vec<GeoCluster>> {
    let pings = repo.gps_events_since(timeframe.lower_bound(now)).await?;
    Ok(cluster_pings(&pings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ping(id: i64, lat: f64, lon: f64, minutes_ago: i64) -> GpsEvent {
        GpsEvent {
            id,
            campaign_id: 1,
            latitude: lat,
            longitude: lon,
            captured_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn nearby_pings_share_a_cell() {
        // 12.345 和 12.349 都舍入到 12.35（45.678/45.681 → 45.68）
        let pings = vec![ping(1, 12.345, 45.678, 5), ping(2, 12.349, 45.681, 3)];
        let clusters = cluster_pings(&pings);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].point_count, 2);
        assert_eq!(clusters[0].latitude, 12.35);
        assert_eq!(clusters[0].longitude, 45.68);
    }

    #[test]
    fn distant_pings_split_cells() {
        let pings = vec![ping(1, 12.34, 45.67, 5), ping(2, 12.36, 45.67, 3)];
        let clusters = cluster_pings(&pings);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn clusters_ordered_by_recency() {
        let pings = vec![
            ping(1, 10.0, 10.0, 60),
            ping(2, 20.0, 20.0, 5),
            ping(3, 30.0, 30.0, 30),
        ];
        let clusters = cluster_pings(&pings);
        assert_eq!(clusters[0].latitude, 20.0);
        assert_eq!(clusters[1].latitude, 30.0);
        assert_eq!(clusters[2].latitude, 10.0);
    }

    #[test]
    fn cell_tracks_latest_campaign() {
        let mut early = ping(1, 10.0, 10.0, 60);
        early.campaign_id = 1;
        let mut late = ping(2, 10.001, 10.001, 5);
        late.campaign_id = 2;

        let clusters = cluster_pings(&[early, late]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].campaign_id, 2);
    }

    #[test]
    fn timeframe_lower_bounds() {
        let now = Utc::now();
        assert_eq!(
            Timeframe::Last24h.lower_bound(now),
            Some(now - Duration::hours(24))
        );
        assert_eq!(Timeframe::All.lower_bound(now), None);
        assert!("week".parse::<Timeframe>().is_err());
    }
}
