//! 보고서 모델 -- 렌더러에 넘기는 불변 스냅샷
//!
//! [`Report`]는 [`Findings`]의 합계와 카운터별 순위 뷰, 알림 뷰를 담습니다.
//! 실행당 한 번 생성되며 이후 변경되지 않습니다.
//!
//! JSON 직렬화 필드 이름은 외부 호환 계약입니다. 순위 항목은
//! `{"ip": ..., "count": ...}` 또는 `{"username": ..., "count": ...}` 형태로 출력됩니다.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::findings::{CounterKind, Findings, KeyField};
use crate::rank::{RankedEntry, over_threshold, top_n};

/// 보고서 생성 옵션
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// 순위 뷰 크기
    pub top: usize,
    /// 알림 임계값 (0이면 비활성화)
    pub alert_threshold: u64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top: 10,
            alert_threshold: 0,
        }
    }
}

impl ReportOptions {
    pub fn from_core(core: &authlens_core::config::ReportConfig) -> Self {
        Self {
            top: core.top,
            alert_threshold: core.alert_threshold,
        }
    }
}

/// 키 필드 이름이 붙은 순위 목록
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedView {
    field: KeyField,
    entries: Vec<RankedEntry>,
}

impl RankedView {
    pub fn new(field: KeyField, entries: Vec<RankedEntry>) -> Self {
        Self { field, entries }
    }

    pub fn field(&self) -> KeyField {
        self.field
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct KeyedEntry<'a> {
    field: KeyField,
    entry: &'a RankedEntry,
}

impl Serialize for KeyedEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.field.as_str(), &self.entry.key)?;
        map.serialize_entry("count", &self.entry.count)?;
        map.end()
    }
}

impl Serialize for RankedView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            seq.serialize_element(&KeyedEntry {
                field: self.field,
                entry,
            })?;
        }
        seq.end()
    }
}

/// 임계값 알림 섹션
///
/// `threshold == 0`이면 알림이 비활성화된 것이며 모든 목록이 비어 있습니다.
/// 렌더러는 [`is_enabled`](Self::is_enabled)로 "비활성화"와
/// "활성화되었지만 초과 항목 없음"을 구분해야 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertSection {
    threshold: u64,
    ssh_failed_by_ip: RankedView,
    ssh_failed_by_user: RankedView,
    ssh_accepted_by_ip: RankedView,
    ssh_accepted_by_user: RankedView,
    sudo_authfail_by_user: RankedView,
}

impl AlertSection {
    pub fn build(findings: &Findings, threshold: u64) -> Self {
        let view = |kind: CounterKind| {
            RankedView::new(
                kind.key_field(),
                over_threshold(findings.counter(kind), threshold),
            )
        };
        Self {
            threshold,
            ssh_failed_by_ip: view(CounterKind::FailedByIp),
            ssh_failed_by_user: view(CounterKind::FailedByUser),
            ssh_accepted_by_ip: view(CounterKind::AcceptedByIp),
            ssh_accepted_by_user: view(CounterKind::AcceptedByUser),
            sudo_authfail_by_user: view(CounterKind::SudoFailedByUser),
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn is_enabled(&self) -> bool {
        self.threshold > 0
    }

    /// 임계값을 넘은 항목이 하나도 없는지 여부
    pub fn is_clear(&self) -> bool {
        CounterKind::ALL.iter().all(|&kind| self.view(kind).is_empty())
    }

    pub fn view(&self, kind: CounterKind) -> &RankedView {
        match kind {
            CounterKind::FailedByIp => &self.ssh_failed_by_ip,
            CounterKind::FailedByUser => &self.ssh_failed_by_user,
            CounterKind::AcceptedByIp => &self.ssh_accepted_by_ip,
            CounterKind::AcceptedByUser => &self.ssh_accepted_by_user,
            CounterKind::SudoFailedByUser => &self.sudo_authfail_by_user,
        }
    }
}

/// 분석 보고서
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(skip)]
    source: String,
    #[serde(skip)]
    top: usize,
    total_lines: u64,
    ssh_failed_total: u64,
    ssh_accepted_total: u64,
    sudo_authfail_total: u64,
    top_ssh_failed_ips: RankedView,
    top_ssh_failed_usernames: RankedView,
    top_ssh_success_ips: RankedView,
    top_ssh_success_usernames: RankedView,
    top_sudo_usernames: RankedView,
    alerts: AlertSection,
}

impl Report {
    /// 집계 결과에서 보고서를 생성합니다. `source`는 입력 파일 이름입니다.
    pub fn build(findings: &Findings, options: &ReportOptions, source: impl Into<String>) -> Self {
        let view = |kind: CounterKind| {
            RankedView::new(kind.key_field(), top_n(findings.counter(kind), options.top))
        };
        Self {
            source: source.into(),
            top: options.top,
            total_lines: findings.total_lines(),
            ssh_failed_total: findings.ssh_failed_total(),
            ssh_accepted_total: findings.ssh_accepted_total(),
            sudo_authfail_total: findings.sudo_authfail_total(),
            top_ssh_failed_ips: view(CounterKind::FailedByIp),
            top_ssh_failed_usernames: view(CounterKind::FailedByUser),
            top_ssh_success_ips: view(CounterKind::AcceptedByIp),
            top_ssh_success_usernames: view(CounterKind::AcceptedByUser),
            top_sudo_usernames: view(CounterKind::SudoFailedByUser),
            alerts: AlertSection::build(findings, options.alert_threshold),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn top(&self) -> usize {
        self.top
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

    pub fn top_view(&self, kind: CounterKind) -> &RankedView {
        match kind {
            CounterKind::FailedByIp => &self.top_ssh_failed_ips,
            CounterKind::FailedByUser => &self.top_ssh_failed_usernames,
            CounterKind::AcceptedByIp => &self.top_ssh_success_ips,
            CounterKind::AcceptedByUser => &self.top_ssh_success_usernames,
            CounterKind::SudoFailedByUser => &self.top_sudo_usernames,
        }
    }

    pub fn alerts(&self) -> &AlertSection {
        &self.alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_findings() -> Findings {
        Findings::from_lines([
            "sshd: Failed password for root from 10.0.0.1 port 22",
            "sshd: Failed password for root from 10.0.0.1 port 22",
            "sshd: Failed password for invalid user admin from 10.0.0.2 port 22",
            "sshd: Accepted password for alice from 10.0.0.3 port 22",
            "sudo: pam_unix(sudo:auth): authentication failure; user=bob",
            "unrelated",
        ])
    }

    #[test]
    fn build_copies_totals() {
        let report = Report::build(&sample_findings(), &ReportOptions::default(), "auth.log");
        assert_eq!(report.source(), "auth.log");
        assert_eq!(report.top(), 10);
        assert_eq!(report.total_lines(), 6);
        assert_eq!(report.ssh_failed_total(), 3);
        assert_eq!(report.ssh_accepted_total(), 1);
        assert_eq!(report.sudo_authfail_total(), 1);
    }

    #[test]
    fn top_views_respect_limit() {
        let options = ReportOptions {
            top: 1,
            alert_threshold: 0,
        };
        let report = Report::build(&sample_findings(), &options, "auth.log");
        let view = report.top_view(CounterKind::FailedByIp);
        assert_eq!(view.field(), KeyField::Ip);
        assert_eq!(view.entries(), &[RankedEntry::new("10.0.0.1", 2)]);
    }

    #[test]
    fn alerts_disabled_by_default() {
        let report = Report::build(&sample_findings(), &ReportOptions::default(), "x");
        assert!(!report.alerts().is_enabled());
        assert!(report.alerts().is_clear());
    }

    #[test]
    fn alerts_enabled_with_threshold() {
        let options = ReportOptions {
            top: 10,
            alert_threshold: 2,
        };
        let report = Report::build(&sample_findings(), &options, "x");
        let alerts = report.alerts();
        assert!(alerts.is_enabled());
        assert!(!alerts.is_clear());
        assert_eq!(
            alerts.view(CounterKind::FailedByIp).entries(),
            &[RankedEntry::new("10.0.0.1", 2)]
        );
        assert_eq!(
            alerts.view(CounterKind::FailedByUser).entries(),
            &[RankedEntry::new("root", 2)]
        );
        assert!(alerts.view(CounterKind::SudoFailedByUser).is_empty());
    }

    #[test]
    fn alerts_enabled_but_clear() {
        let options = ReportOptions {
            top: 10,
            alert_threshold: 50,
        };
        let report = Report::build(&sample_findings(), &options, "x");
        assert!(report.alerts().is_enabled());
        assert!(report.alerts().is_clear());
    }

    #[test]
    fn json_shape() {
        let options = ReportOptions {
            top: 10,
            alert_threshold: 2,
        };
        let report = Report::build(&sample_findings(), &options, "auth.log");
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["total_lines"], 6);
        assert_eq!(value["ssh_failed_total"], 3);
        assert_eq!(value["top_ssh_failed_ips"][0]["ip"], "10.0.0.1");
        assert_eq!(value["top_ssh_failed_ips"][0]["count"], 2);
        assert_eq!(value["top_ssh_failed_usernames"][0]["username"], "root");
        assert_eq!(value["top_ssh_success_ips"][0]["ip"], "10.0.0.3");
        assert_eq!(value["top_ssh_success_usernames"][0]["username"], "alice");
        assert_eq!(value["top_sudo_usernames"][0]["username"], "bob");
        assert_eq!(value["alerts"]["threshold"], 2);
        assert_eq!(value["alerts"]["ssh_failed_by_ip"][0]["ip"], "10.0.0.1");
        assert_eq!(value["alerts"]["sudo_authfail_by_user"], serde_json::json!([]));
        // 내부 필드는 출력하지 않음
        assert!(value.get("source").is_none());
        assert!(value.get("top").is_none());
    }

    #[test]
    fn json_disabled_alerts_have_zero_threshold() {
        let report = Report::build(&sample_findings(), &ReportOptions::default(), "x");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["alerts"]["threshold"], 0);
        assert_eq!(value["alerts"]["ssh_failed_by_ip"], serde_json::json!([]));
    }

    #[test]
    fn json_escapes_control_characters() {
        let findings = Findings::from_lines(["sudo: authentication failure; user=a\"b\\c\x01"]);
        let report = Report::build(&findings, &ReportOptions::default(), "x");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""username":"a\"b\\c\u0001""#));
    }

    #[test]
    fn json_entry_key_order() {
        let findings = Findings::from_lines(["sshd: Failed password for root from 1.1.1.1 port 22"]);
        let report = Report::build(&findings, &ReportOptions::default(), "x");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#"[{"ip":"1.1.1.1","count":1}]"#));
        assert!(json.starts_with(r#"{"total_lines":1,"ssh_failed_total":1,"#));
    }
}
