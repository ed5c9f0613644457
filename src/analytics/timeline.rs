//! 活动时间线合并
//!
//! 三条事件流打上类型标签，经 TimeBucketer 分桶后合并成一条
//! 按类型区分的时间线。桶内按 (类型, id) 去重计数——id 只在各自
//! 类型内唯一，跨类型撞号绝不能合并身份或重复计数。
//!
//! 窗口内没有事件的桶直接省略（稀疏输出），需要稠密序列的调用方
//! 自行补零。产出是有限、可重建的惰性序列，不是实时订阅。

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::bucket::Granularity;
use super::{EventKind, EventStamp};
use crate::errors::Result;
use crate::repository::Repository;

/// 时间线默认/最大桶数
pub const DEFAULT_BUCKET_LIMIT: usize = 30;

/// 一个时间桶的三类计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBucket {
    pub bucket_key: String,
    pub media_count: u64,
    pub gps_count: u64,
    pub social_count: u64,
}

#[derive(Default)]
struct BucketSets {
    media: HashSet<i64>,
    gps: HashSet<i64>,
    social: HashSet<i64>,
}

impl BucketSets {
    fn insert(&mut self, kind: EventKind, id: i64) {
        // 按类型分集合去重，(类型, id) 才是事件身份
        match kind {
            EventKind::Media => self.media.insert(id),
            EventKind::Gps => self.gps.insert(id),
            EventKind::Social => self.social.insert(id),
        };
    }
}

/// 合并三条打好标签的事件流，产出按桶键降序的惰性序列
pub fn merge_streams(
    granularity: Granularity,
    limit: usize,
    media: &[EventStamp],
    gps: &[EventStamp],
    social: &[EventStamp],
) -> impl Iterator<Item = TimelineBucket> {
    let mut buckets: BTreeMap<String, BucketSets> = BTreeMap::new();

    let streams = [
        (EventKind::Media, media),
        (EventKind::Gps, gps),
        (EventKind::Social, social),
    ];
    for (kind, stamps) in streams {
        for stamp in stamps {
            let key = granularity.bucket_key(stamp.captured_at);
            buckets.entry(key).or_default().insert(kind, stamp.id);
        }
    }

    // BTreeMap 升序，反向迭代即桶键降序 == 时间降序
    buckets
        .into_iter()
        .rev()
        .take(limit)
        .map(|(bucket_key, sets)| TimelineBucket {
            bucket_key,
            media_count: sets.media.len() as u64,
            gps_count: sets.gps.len() as u64,
            social_count: sets.social.len() as u64,
        })
}

/// 从仓库取三条流的 (id, captured_at) 并合并
pub async fn timeline(
    repo: &dyn Repository,
    granularity: Granularity,
    limit: usize,
) -> Result<Vec<TimelineBucket>> {
    let media = repo.event_stamps(EventKind::Media).await?;
    let gps = repo.event_stamps(EventKind::Gps).await?;
    let social = repo.event_stamps(EventKind::Social).await?;

    Ok(merge_streams(granularity, limit, &media, &gps, &social).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn stamp(id: i64, y: i32, mo: u32, d: u32, h: u32) -> EventStamp {
        EventStamp {
            id,
            captured_at: Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap(),
        }
    }

    #[test]
    fn colliding_ids_count_per_type() {
        // 三条流共用 id=1，同一天必须报 (1,1,1) 而不是 1
        let media = vec![stamp(1, 2026, 3, 5, 9)];
        let gps = vec![stamp(1, 2026, 3, 5, 10)];
        let social = vec![stamp(1, 2026, 3, 5, 11)];

        let buckets: Vec<_> =
            merge_streams(Granularity::Daily, 30, &media, &gps, &social).collect();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].media_count, 1);
        assert_eq!(buckets[0].gps_count, 1);
        assert_eq!(buckets[0].social_count, 1);
    }

    #[test]
    fn keys_strictly_decreasing() {
        let media = vec![
            stamp(1, 2026, 3, 1, 9),
            stamp(2, 2026, 3, 2, 9),
            stamp(3, 2026, 3, 3, 9),
        ];
        let buckets: Vec<_> = merge_streams(Granularity::Daily, 30, &media, &[], &[]).collect();
        for pair in buckets.windows(2) {
            assert!(pair[0].bucket_key > pair[1].bucket_key);
        }
    }

    #[test]
    fn empty_buckets_are_omitted() {
        // 3 月 1 日与 3 月 5 日之间的空白天不补零
        let media = vec![stamp(1, 2026, 3, 1, 9), stamp(2, 2026, 3, 5, 9)];
        let buckets: Vec<_> = merge_streams(Granularity::Daily, 30, &media, &[], &[]).collect();
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn limit_caps_and_keeps_newest() {
        let media: Vec<_> = (1..=10).map(|d| stamp(d as i64, 2026, 3, d, 9)).collect();
        let buckets: Vec<_> = merge_streams(Granularity::Daily, 3, &media, &[], &[]).collect();
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].bucket_key, "2026-03-10");
        assert_eq!(buckets[2].bucket_key, "2026-03-08");
    }

    #[test]
    fn window_counts_sum_to_event_totals() {
        let media = vec![stamp(1, 2026, 3, 1, 8), stamp(2, 2026, 3, 1, 9)];
        let gps = vec![
            stamp(1, 2026, 3, 1, 8),
            stamp(2, 2026, 3, 2, 9),
            stamp(3, 2026, 3, 2, 10),
        ];
        let buckets: Vec<_> = merge_streams(Granularity::Daily, 30, &media, &gps, &[]).collect();

        let media_total: u64 = buckets.iter().map(|b| b.media_count).sum();
        let gps_total: u64 = buckets.iter().map(|b| b.gps_count).sum();
        assert_eq!(media_total, 2);
        assert_eq!(gps_total, 3);
    }

    #[test]
    fn weekly_buckets_merge_whole_week() {
        // 2026-03-02（周一）和 2026-03-04（周三）同周
        let media = vec![stamp(1, 2026, 3, 2, 9), stamp(2, 2026, 3, 4, 9)];
        let buckets: Vec<_> = merge_streams(Granularity::Weekly, 30, &media, &[], &[]).collect();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].media_count, 2);
    }
}
