//! 메트릭 상수 및 설명 등록
//!
//! 분석기가 발행하는 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 레코더가 설치되지 않은 경우 `metrics` 매크로는 아무 동작도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `authlens_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(authlens_core::metrics::LINES_PROCESSED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 이벤트 종류 레이블 키 (ssh_failed, ssh_accepted, sudo_authfail)
pub const LABEL_KIND: &str = "kind";

/// 처리 모드 레이블 키 (sequential, parallel)
pub const LABEL_MODE: &str = "mode";

// ─── Analyzer 메트릭 ────────────────────────────────────────────────

/// Analyzer: 처리된 전체 라인 수 (counter)
pub const LINES_PROCESSED_TOTAL: &str = "authlens_lines_processed_total";

/// Analyzer: 분류된 보안 이벤트 수 (counter, label: kind)
pub const EVENTS_TOTAL: &str = "authlens_events_total";

/// Analyzer: 필드 추출 실패로 센티널 키에 기록된 수 (counter)
pub const UNKNOWN_FIELDS_TOTAL: &str = "authlens_unknown_fields_total";

/// Analyzer: 완료된 분석 실행 수 (counter, label: mode)
pub const RUNS_TOTAL: &str = "authlens_runs_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 분석 시작 전에 한 번 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        LINES_PROCESSED_TOTAL,
        "Total number of log lines consumed by the analyzer"
    );
    describe_counter!(
        EVENTS_TOTAL,
        "Total number of classified security events by kind"
    );
    describe_counter!(
        UNKNOWN_FIELDS_TOTAL,
        "Total number of fields recorded under the (unknown) sentinel key"
    );
    describe_counter!(RUNS_TOTAL, "Total number of completed analysis runs");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_share_prefix() {
        for name in [
            LINES_PROCESSED_TOTAL,
            EVENTS_TOTAL,
            UNKNOWN_FIELDS_TOTAL,
            RUNS_TOTAL,
        ] {
            assert!(name.starts_with("authlens_"), "{name} lacks prefix");
            assert!(name.ends_with("_total"), "{name} is not a counter name");
        }
    }

    #[test]
    fn describe_all_without_recorder_is_noop() {
        describe_all();
    }
}
