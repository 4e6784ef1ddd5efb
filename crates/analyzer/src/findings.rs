//! 집계 상태 -- 카테고리별 합계와 키별 빈도 카운터
//!
//! [`Findings`]는 분석 실행 하나가 소유하는 누적기입니다.
//! 라인을 소비하는 동안에만 변경되고, 이후에는 읽기 전용으로 사용됩니다.
//!
//! 분류된 라인은 해당 카테고리의 카운터마다 정확히 한 번씩 증가시킵니다.
//! 필드를 추출하지 못하면 [`UNKNOWN_KEY`] 키로 기록하므로,
//! 각 카운터 값의 합은 항상 카테고리 합계와 같습니다.
//!
//! 누적은 교환/결합 법칙을 만족하므로 [`Findings::merge`]로
//! 독립적으로 집계한 결과를 합칠 수 있습니다.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use crate::classify::{AuthEvent, EventKind, classify};

/// 필드를 추출하지 못했을 때 사용하는 센티널 키
pub const UNKNOWN_KEY: &str = "(unknown)";

/// 키별 발생 횟수
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyCounter {
    counts: HashMap<String, u64>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 키의 횟수를 1 증가시킵니다.
    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    /// 키의 횟수를 `n`만큼 증가시킵니다.
    pub fn add(&mut self, key: &str, n: u64) {
        // 기존 키는 할당 없이 갱신
        if let Some(count) = self.counts.get_mut(key) {
            *count += n;
        } else {
            self.counts.insert(key.to_owned(), n);
        }
    }

    /// 추출 결과를 기록합니다. `None`이면 [`UNKNOWN_KEY`]로 기록합니다.
    pub fn record(&mut self, key: Option<&str>) {
        self.increment(key.unwrap_or(UNKNOWN_KEY));
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// 모든 키 횟수의 합
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// 서로 다른 키의 수
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// (키, 횟수) 순회. 순서는 보장되지 않습니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// 다른 카운터의 횟수를 키별로 더합니다.
    pub fn merge(&mut self, other: FrequencyCounter) {
        for (key, n) in other.counts {
            match self.counts.entry(key) {
                Entry::Occupied(mut e) => *e.get_mut() += n,
                Entry::Vacant(e) => {
                    e.insert(n);
                }
            }
        }
    }
}

impl<K: AsRef<str>> FromIterator<(K, u64)> for FrequencyCounter {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut counter = Self::new();
        for (key, n) in iter {
            counter.add(key.as_ref(), n);
        }
        counter
    }
}

/// 카운터의 키가 나타내는 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyField {
    Ip,
    Username,
}

impl KeyField {
    /// JSON 출력에서 쓰는 필드 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::Username => "username",
        }
    }
}

/// 추적하는 다섯 개의 카운터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    FailedByIp,
    FailedByUser,
    AcceptedByIp,
    AcceptedByUser,
    SudoFailedByUser,
}

impl CounterKind {
    /// 보고서 출력 순서
    pub const ALL: [CounterKind; 5] = [
        Self::FailedByIp,
        Self::FailedByUser,
        Self::AcceptedByIp,
        Self::AcceptedByUser,
        Self::SudoFailedByUser,
    ];

    pub fn key_field(self) -> KeyField {
        match self {
            Self::FailedByIp | Self::AcceptedByIp => KeyField::Ip,
            Self::FailedByUser | Self::AcceptedByUser | Self::SudoFailedByUser => {
                KeyField::Username
            }
        }
    }

    /// 이 카운터가 속한 이벤트 카테고리
    pub fn event_kind(self) -> EventKind {
        match self {
            Self::FailedByIp | Self::FailedByUser => EventKind::SshFailedLogin,
            Self::AcceptedByIp | Self::AcceptedByUser => EventKind::SshSuccessfulLogin,
            Self::SudoFailedByUser => EventKind::SudoAuthFailure,
        }
    }
}

/// 분석 실행 하나의 집계 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    total_lines: u64,
    ssh_failed_total: u64,
    ssh_failed_by_ip: FrequencyCounter,
    ssh_failed_by_user: FrequencyCounter,
    ssh_accepted_total: u64,
    ssh_accepted_by_ip: FrequencyCounter,
    ssh_accepted_by_user: FrequencyCounter,
    sudo_authfail_total: u64,
    sudo_authfail_by_user: FrequencyCounter,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 라인 목록을 모두 소비한 결과를 만듭니다.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut findings = Self::new();
        for line in lines {
            findings.consume(line.as_ref());
        }
        findings
    }

    /// 라인 하나를 분류하고 누적합니다. 분류되지 않은 라인은 라인 수에만 반영됩니다.
    pub fn consume(&mut self, line: &str) {
        self.total_lines += 1;
        if let Some(event) = classify(line) {
            self.record(&event);
        }
    }

    /// 분류된 이벤트를 누적합니다. 라인 수는 [`consume`](Self::consume)이 셉니다.
    fn record(&mut self, event: &AuthEvent<'_>) {
        match *event {
            AuthEvent::SshFailedLogin { username, ip } => {
                self.ssh_failed_total += 1;
                self.ssh_failed_by_ip.record(ip);
                self.ssh_failed_by_user.record(username);
            }
            AuthEvent::SshSuccessfulLogin { username, ip } => {
                self.ssh_accepted_total += 1;
                self.ssh_accepted_by_ip.record(ip);
                self.ssh_accepted_by_user.record(username);
            }
            AuthEvent::SudoAuthFailure { username } => {
                self.sudo_authfail_total += 1;
                self.sudo_authfail_by_user.record(username);
            }
        }
    }

    /// 다른 집계 결과를 합칩니다.
    pub fn merge(&mut self, other: Findings) {
        self.total_lines += other.total_lines;
        self.ssh_failed_total += other.ssh_failed_total;
        self.ssh_failed_by_ip.merge(other.ssh_failed_by_ip);
        self.ssh_failed_by_user.merge(other.ssh_failed_by_user);
        self.ssh_accepted_total += other.ssh_accepted_total;
        self.ssh_accepted_by_ip.merge(other.ssh_accepted_by_ip);
        self.ssh_accepted_by_user.merge(other.ssh_accepted_by_user);
        self.sudo_authfail_total += other.sudo_authfail_total;
        self.sudo_authfail_by_user.merge(other.sudo_authfail_by_user);
    }

    pub fn total_lines(&self) -> u64 {
        self.total_lines
    }

    pub fn ssh_failed_total(&self) -> u64 {
        self.ssh_failed_total
    }

    pub fn ssh_accepted_total(&self) -> u64 {
        self.ssh_accepted_total
    }

    pub fn sudo_authfail_total(&self) -> u64 {
        self.sudo_authfail_total
    }

    /// 카테고리 합계. [`EventKind::None`]은 분류되지 않은 라인 수입니다.
    pub fn total_for(&self, kind: EventKind) -> u64 {
        match kind {
            EventKind::SshFailedLogin => self.ssh_failed_total,
            EventKind::SshSuccessfulLogin => self.ssh_accepted_total,
            EventKind::SudoAuthFailure => self.sudo_authfail_total,
            EventKind::None => self.total_lines.saturating_sub(
                self.ssh_failed_total + self.ssh_accepted_total + self.sudo_authfail_total,
            ),
        }
    }

    pub fn counter(&self, kind: CounterKind) -> &FrequencyCounter {
        match kind {
            CounterKind::FailedByIp => &self.ssh_failed_by_ip,
            CounterKind::FailedByUser => &self.ssh_failed_by_user,
            CounterKind::AcceptedByIp => &self.ssh_accepted_by_ip,
            CounterKind::AcceptedByUser => &self.ssh_accepted_by_user,
            CounterKind::SudoFailedByUser => &self.sudo_authfail_by_user,
        }
    }

    /// 모든 카운터에서 센티널 키로 기록된 횟수의 합
    pub fn unknown_fields(&self) -> u64 {
        CounterKind::ALL
            .iter()
            .map(|&kind| self.counter(kind).get(UNKNOWN_KEY))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAILED: &str = "sshd[1]: Failed password for root from 10.0.0.1 port 22 ssh2";
    const FAILED_INVALID: &str = "sshd[1]: Failed password for invalid user admin from 10.0.0.5 port 22";
    const ACCEPTED: &str = "sshd[2]: Accepted password for alice from 192.168.1.1 port 22 ssh2";
    const SUDO: &str = "sudo: pam_unix(sudo:auth): authentication failure; logname=bob uid=1000; user=bob";
    const NOISE: &str = "CRON[3]: pam_unix(cron:session): session closed for user root";

    fn assert_totals_consistent(f: &Findings) {
        for kind in CounterKind::ALL {
            assert_eq!(
                f.counter(kind).total(),
                f.total_for(kind.event_kind()),
                "{kind:?}"
            );
        }
    }

    #[test]
    fn counter_record_uses_sentinel() {
        let mut c = FrequencyCounter::new();
        c.record(Some("a"));
        c.record(None);
        c.record(None);
        assert_eq!(c.get("a"), 1);
        assert_eq!(c.get(UNKNOWN_KEY), 2);
        assert_eq!(c.total(), 3);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn counter_missing_key_is_zero() {
        let c = FrequencyCounter::new();
        assert_eq!(c.get("nope"), 0);
        assert!(c.is_empty());
    }

    #[test]
    fn counter_merge_adds_keywise() {
        let mut a: FrequencyCounter = [("x", 2), ("y", 1)].into_iter().collect();
        let b: FrequencyCounter = [("y", 4), ("z", 3)].into_iter().collect();
        a.merge(b);
        assert_eq!(a.get("x"), 2);
        assert_eq!(a.get("y"), 5);
        assert_eq!(a.get("z"), 3);
    }

    #[test]
    fn from_iter_sums_duplicate_keys() {
        let c: FrequencyCounter = vec![("k".to_owned(), 1), ("k".to_owned(), 2)]
            .into_iter()
            .collect();
        assert_eq!(c.get("k"), 3);
    }

    #[test]
    fn consume_counts_every_line() {
        let f = Findings::from_lines([FAILED, "", NOISE, ACCEPTED, SUDO]);
        assert_eq!(f.total_lines(), 5);
        assert_eq!(f.ssh_failed_total(), 1);
        assert_eq!(f.ssh_accepted_total(), 1);
        assert_eq!(f.sudo_authfail_total(), 1);
        assert_eq!(f.total_for(EventKind::None), 2);
        assert_totals_consistent(&f);
    }

    #[test]
    fn consume_records_extracted_keys() {
        let f = Findings::from_lines([FAILED, FAILED_INVALID, FAILED]);
        assert_eq!(f.counter(CounterKind::FailedByIp).get("10.0.0.1"), 2);
        assert_eq!(f.counter(CounterKind::FailedByIp).get("10.0.0.5"), 1);
        assert_eq!(f.counter(CounterKind::FailedByUser).get("root"), 2);
        assert_eq!(f.counter(CounterKind::FailedByUser).get("admin"), 1);
    }

    #[test]
    fn missing_fields_go_to_sentinel() {
        let f = Findings::from_lines([
            "sshd: Failed password for",
            "sshd: Accepted password for carol",
            "sudo: authentication failure",
        ]);
        assert_eq!(f.counter(CounterKind::FailedByIp).get(UNKNOWN_KEY), 1);
        assert_eq!(f.counter(CounterKind::FailedByUser).get(UNKNOWN_KEY), 1);
        assert_eq!(f.counter(CounterKind::AcceptedByIp).get(UNKNOWN_KEY), 1);
        assert_eq!(f.counter(CounterKind::AcceptedByUser).get(UNKNOWN_KEY), 1);
        assert_eq!(f.counter(CounterKind::SudoFailedByUser).get(UNKNOWN_KEY), 1);
        assert_eq!(f.unknown_fields(), 5);
        assert_totals_consistent(&f);
    }

    #[test]
    fn sudo_has_no_ip_counter() {
        let f = Findings::from_lines([SUDO]);
        assert!(f.counter(CounterKind::FailedByIp).is_empty());
        assert!(f.counter(CounterKind::AcceptedByIp).is_empty());
        assert_eq!(f.counter(CounterKind::SudoFailedByUser).get("bob"), 1);
    }

    #[test]
    fn merge_equals_sequential() {
        let lines = [FAILED, ACCEPTED, NOISE, SUDO, FAILED_INVALID, "", FAILED];
        let sequential = Findings::from_lines(lines);

        let mut merged = Findings::from_lines(&lines[4..]);
        merged.merge(Findings::from_lines(&lines[..2]));
        merged.merge(Findings::from_lines(&lines[2..4]));

        assert_eq!(merged, sequential);
        assert_totals_consistent(&merged);
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let original = Findings::from_lines([FAILED, SUDO]);
        let mut merged = original.clone();
        merged.merge(Findings::new());
        assert_eq!(merged, original);
    }

    #[test]
    fn counter_kind_mapping() {
        assert_eq!(CounterKind::FailedByIp.key_field(), KeyField::Ip);
        assert_eq!(CounterKind::SudoFailedByUser.key_field(), KeyField::Username);
        assert_eq!(
            CounterKind::AcceptedByUser.event_kind(),
            EventKind::SshSuccessfulLogin
        );
        assert_eq!(KeyField::Ip.as_str(), "ip");
        assert_eq!(KeyField::Username.as_str(), "username");
    }

    #[test]
    fn unclassified_total_never_underflows() {
        // 라인 수 없이 이벤트만 누적된 상태
        let mut findings = Findings::new();
        let event = classify(FAILED).unwrap();
        findings.record(&event);

        assert_eq!(findings.total_lines(), 0);
        assert_eq!(findings.ssh_failed_total(), 1);
        assert_eq!(findings.total_for(EventKind::None), 0);
    }

    #[test]
    fn consume_counts_line_before_event() {
        let mut findings = Findings::new();
        findings.consume(FAILED);
        findings.consume("unrelated");
        assert_eq!(findings.total_lines(), 2);
        assert_eq!(findings.total_for(EventKind::None), 1);
        assert_totals_consistent(&findings);
    }
}
