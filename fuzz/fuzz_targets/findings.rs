#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use authlens_analyzer::{CounterKind, Findings, Report, ReportOptions};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 분석 대상 라인
    lines: Vec<String>,
    /// 병합 분할 지점
    split: usize,
    top: u8,
    alert_threshold: u8,
}

fuzz_target!(|input: FuzzInput| {
    let split = input.split % (input.lines.len() + 1);
    let sequential = Findings::from_lines(&input.lines);

    let mut merged = Findings::from_lines(&input.lines[split..]);
    merged.merge(Findings::from_lines(&input.lines[..split]));
    assert_eq!(merged, sequential);

    for kind in CounterKind::ALL {
        assert_eq!(
            sequential.counter(kind).total(),
            sequential.total_for(kind.event_kind())
        );
    }

    let options = ReportOptions {
        top: usize::from(input.top).max(1),
        alert_threshold: u64::from(input.alert_threshold),
    };
    let report = Report::build(&sequential, &options, "fuzz.log");
    let json = serde_json::to_string(&report).expect("report should serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("report JSON should parse");
    assert_eq!(value["total_lines"].as_u64(), Some(sequential.total_lines()));
});
