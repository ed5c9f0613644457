//! 时间分桶
//!
//! 把时间戳 + 粒度映射成规范分桶键。纯函数枚举映射，替代按粒度
//! 拼接 SQL 片段的做法，可脱离存储单测。
//!
//! 所有截断一律使用 UTC。键是零填充的格式化字符串，字典序即时间序，
//! 时间线按键降序排序就等于按时间降序。

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 分桶粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// 计算规范分桶键
    ///
    /// - hourly：截断到小时，`YYYY-MM-DD HH:00`
    /// - daily：截断到自然日，`YYYY-MM-DD`
    /// - weekly：截断到该 ISO 周的周一（周一偏移 0 … 周日偏移 6）
    /// - monthly：截断到当月一号，`YYYY-MM-01`
    pub fn bucket_key(&self, ts: DateTime<Utc>) -> String {
        match self {
            Self::Hourly => ts.format("%Y-%m-%d %H:00").to_string(),
            Self::Daily => ts.format("%Y-%m-%d").to_string(),
            Self::Weekly => {
                let offset = ts.weekday().num_days_from_monday() as i64;
                let monday = ts.date_naive() - Duration::days(offset);
                monday.format("%Y-%m-%d").to_string()
            }
            Self::Monthly => ts.format("%Y-%m-01").to_string(),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown period: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn hourly_truncates_to_hour() {
        assert_eq!(
            Granularity::Hourly.bucket_key(ts(2026, 3, 5, 14, 37)),
            "2026-03-05 14:00"
        );
    }

    #[test]
    fn daily_truncates_to_day() {
        assert_eq!(
            Granularity::Daily.bucket_key(ts(2026, 3, 5, 23, 59)),
            "2026-03-05"
        );
    }

    #[test]
    fn weekly_maps_to_iso_monday() {
        // 2026-03-04 是周三，该周周一是 2026-03-02
        let wednesday = ts(2026, 3, 4, 10, 0);
        let monday = ts(2026, 3, 2, 0, 0);
        assert_eq!(
            Granularity::Weekly.bucket_key(wednesday),
            Granularity::Weekly.bucket_key(monday)
        );
        assert_eq!(Granularity::Weekly.bucket_key(wednesday), "2026-03-02");

        // 下周一进入新桶
        let next_monday = ts(2026, 3, 9, 0, 0);
        assert_ne!(
            Granularity::Weekly.bucket_key(wednesday),
            Granularity::Weekly.bucket_key(next_monday)
        );
    }

    #[test]
    fn weekly_sunday_belongs_to_same_week() {
        // 周日偏移 6 天，仍落在本周周一的桶
        let sunday = ts(2026, 3, 8, 22, 0);
        assert_eq!(Granularity::Weekly.bucket_key(sunday), "2026-03-02");
    }

    #[test]
    fn monthly_truncates_to_first_day() {
        assert_eq!(
            Granularity::Monthly.bucket_key(ts(2026, 3, 31, 12, 0)),
            "2026-03-01"
        );
    }

    #[test]
    fn keys_sort_chronologically() {
        let earlier = ts(2026, 3, 5, 9, 0);
        let later = ts(2026, 11, 23, 9, 0);
        for granularity in [
            Granularity::Hourly,
            Granularity::Daily,
            Granularity::Weekly,
            Granularity::Monthly,
        ] {
            assert!(granularity.bucket_key(earlier) < granularity.bucket_key(later));
        }
    }

    #[test]
    fn parse_rejects_unknown_period() {
        assert!("yearly".parse::<Granularity>().is_err());
        assert_eq!("weekly".parse::<Granularity>().unwrap(), Granularity::Weekly);
    }
}
