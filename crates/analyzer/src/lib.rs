#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`classify`]: 우선순위 규칙 기반 라인 분류 및 앵커 문구 필드 추출
//! - [`findings`]: 카테고리 합계와 빈도 카운터 (병합 가능)
//! - [`rank`]: 결정적 top-N / 임계값 순위 산출
//! - [`report`]: 렌더러용 불변 보고서 모델
//! - [`analyzer`]: 파일/리더 입력의 순차 또는 병렬 집계
//! - [`config`]: 분석기 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! LogAnalyzer -> classify -> Findings -> top_n / over_threshold -> Report
//!     |             |           |                                   |
//!  line reader   RULES     "(unknown)" sentinel              JSON / pretty
//! ```

pub mod analyzer;
pub mod classify;
pub mod config;
pub mod error;
pub mod findings;
pub mod rank;
pub mod report;

// --- 주요 타입 re-export ---

// 분석기
pub use analyzer::LogAnalyzer;

// 설정
pub use config::AnalyzerConfig;

// 에러
pub use error::AnalyzerError;

// 분류기
pub use classify::{AuthEvent, EventKind, ExtractedFields, classify, classify_and_extract};

// 집계
pub use findings::{CounterKind, Findings, FrequencyCounter, KeyField, UNKNOWN_KEY};

// 순위
pub use rank::{RankedEntry, over_threshold, top_n};

// 보고서
pub use report::{AlertSection, RankedView, Report, ReportOptions};
