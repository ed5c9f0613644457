//! 百分比归一化
//!
//! 分组计数 → 占比（count × 100 / total，固定两位小数）。
//! total 为 0 时所有组占比定义为 0，避免除零报错。

use std::collections::HashMap;
use std::hash::Hash;

/// 单组占比，保留两位小数
pub fn share(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 * 100.0 / total as f64;
    (raw * 100.0).round() / 100.0
}

/// 整组计数归一化；total 取该映射内计数之和
pub fn distribute<K: Eq + Hash + Clone>(counts: &HashMap<K, u64>) -> HashMap<K, f64> {
    let total: u64 = counts.values().sum();
    counts
        .iter()
        .map(|(key, count)| (key.clone(), share(*count, total)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_split() {
        let counts = HashMap::from([("a", 3u64), ("b", 1u64)]);
        let shares = distribute(&counts);
        assert_eq!(shares["a"], 75.0);
        assert_eq!(shares["b"], 25.0);
    }

    #[test]
    fn empty_input_is_empty() {
        let counts: HashMap<&str, u64> = HashMap::new();
        assert!(distribute(&counts).is_empty());
    }

    #[test]
    fn zero_total_yields_zero_shares() {
        let counts = HashMap::from([("a", 0u64), ("b", 0u64)]);
        let shares = distribute(&counts);
        assert_eq!(shares["a"], 0.0);
        assert_eq!(shares["b"], 0.0);
    }

    #[test]
    fn shares_sum_to_100_within_epsilon() {
        // 1/3 切分无法精确到两位小数，总和允许 ±0.5 偏差
        let counts = HashMap::from([("a", 1u64), ("b", 1u64), ("c", 1u64)]);
        let total: f64 = distribute(&counts).values().sum();
        assert!((total - 100.0).abs() <= 0.5, "sum was {}", total);
    }

    #[test]
    fn share_rounds_to_two_decimals() {
        assert_eq!(share(1, 3), 33.33);
        assert_eq!(share(2, 3), 66.67);
    }
}
