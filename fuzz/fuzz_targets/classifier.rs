#![no_main]

use authlens_analyzer::classify::classify_and_extract;
use authlens_analyzer::EventKind;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    let (kind, fields) = classify_and_extract(&line);

    // 추출된 값은 항상 비어 있지 않은 원본 라인의 부분 문자열
    for value in [fields.username, fields.ip].into_iter().flatten() {
        assert!(!value.is_empty());
        assert!(line.contains(value));
    }
    if kind == EventKind::None {
        assert!(fields.username.is_none() && fields.ip.is_none());
    }
});
