//! 순위 산출 -- 상위 N개 뷰와 임계값 알림 뷰
//!
//! 정렬 기준은 횟수 내림차순, 동률이면 키의 바이트 사전순 오름차순입니다.
//! 카운터 내부의 순회 순서와 관계없이 항상 같은 결과를 냅니다.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::findings::FrequencyCounter;

/// 순위 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
}

impl RankedEntry {
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

fn rank_order(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key))
}

fn entries(counter: &FrequencyCounter) -> Vec<RankedEntry> {
    counter
        .iter()
        .map(|(key, count)| RankedEntry::new(key, count))
        .collect()
}

/// 상위 `n`개 항목을 반환합니다.
///
/// `n`이 키 수보다 크면 전체를 반환하고, `n == 0`이면 빈 목록입니다.
pub fn top_n(counter: &FrequencyCounter, n: usize) -> Vec<RankedEntry> {
    if n == 0 {
        return Vec::new();
    }

    let mut ranked = entries(counter);
    if ranked.len() > n {
        // 전체 정렬 대신 상위 n개만 분리
        ranked.select_nth_unstable_by(n - 1, rank_order);
        ranked.truncate(n);
    }
    ranked.sort_unstable_by(rank_order);
    ranked
}

/// 횟수가 `threshold` 이상인 모든 항목을 반환합니다.
///
/// `threshold == 0`은 알림 비활성화이며 빈 목록을 반환합니다.
pub fn over_threshold(counter: &FrequencyCounter, threshold: u64) -> Vec<RankedEntry> {
    if threshold == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<RankedEntry> = counter
        .iter()
        .filter(|&(_, count)| count >= threshold)
        .map(|(key, count)| RankedEntry::new(key, count))
        .collect();
    ranked.sort_unstable_by(rank_order);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5개 IP가 3회, 1개 IP가 7회
    fn scenario_counter() -> FrequencyCounter {
        [
            ("10.0.0.4", 3),
            ("10.0.0.2", 3),
            ("192.168.0.9", 7),
            ("10.0.0.5", 3),
            ("10.0.0.1", 3),
            ("10.0.0.3", 3),
        ]
        .into_iter()
        .collect()
    }

    fn keys(entries: &[RankedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn top_n_orders_by_count_then_key() {
        let top = top_n(&scenario_counter(), 3);
        assert_eq!(keys(&top), vec!["192.168.0.9", "10.0.0.1", "10.0.0.2"]);
        assert_eq!(top[0].count, 7);
        assert_eq!(top[1].count, 3);
    }

    #[test]
    fn top_n_larger_than_keys_returns_all() {
        let top = top_n(&scenario_counter(), 100);
        assert_eq!(top.len(), 6);
        assert_eq!(
            keys(&top),
            vec![
                "192.168.0.9",
                "10.0.0.1",
                "10.0.0.2",
                "10.0.0.3",
                "10.0.0.4",
                "10.0.0.5"
            ]
        );
    }

    #[test]
    fn top_n_zero_is_empty() {
        assert!(top_n(&scenario_counter(), 0).is_empty());
    }

    #[test]
    fn top_n_empty_counter() {
        assert!(top_n(&FrequencyCounter::new(), 5).is_empty());
    }

    #[test]
    fn top_n_is_deterministic() {
        let counter = scenario_counter();
        for n in 1..=6 {
            assert_eq!(top_n(&counter, n), top_n(&counter, n));
            assert_eq!(top_n(&counter, n), top_n(&counter, 6)[..n].to_vec());
        }
    }

    #[test]
    fn ties_use_byte_order() {
        let counter: FrequencyCounter =
            [("b", 1), ("a", 1), ("B", 1), ("(unknown)", 1)].into_iter().collect();
        let top = top_n(&counter, 4);
        assert_eq!(keys(&top), vec!["(unknown)", "B", "a", "b"]);
    }

    #[test]
    fn over_threshold_is_inclusive() {
        let alerts = over_threshold(&scenario_counter(), 3);
        assert_eq!(alerts.len(), 6);
        assert_eq!(alerts[0], RankedEntry::new("192.168.0.9", 7));
        assert_eq!(alerts[1], RankedEntry::new("10.0.0.1", 3));
        assert_eq!(alerts[5], RankedEntry::new("10.0.0.5", 3));

        let alerts = over_threshold(&scenario_counter(), 4);
        assert_eq!(keys(&alerts), vec!["192.168.0.9"]);
    }

    #[test]
    fn over_threshold_zero_is_disabled() {
        assert!(over_threshold(&scenario_counter(), 0).is_empty());
    }

    #[test]
    fn over_threshold_one_returns_every_key() {
        assert_eq!(over_threshold(&scenario_counter(), 1).len(), 6);
    }

    #[test]
    fn over_threshold_above_max_is_empty() {
        assert!(over_threshold(&scenario_counter(), 8).is_empty());
    }
}
