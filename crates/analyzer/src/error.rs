//! 분석기 에러 타입
//!
//! [`AnalyzerError`]는 입력 파일 열기/읽기, 병렬 워커, 설정 검증 실패를 표현합니다.
//! 라인 단위의 필드 추출 실패는 에러가 아니며 센티널 키로 기록됩니다.
//! `From<AnalyzerError> for AuthlensError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use authlens_core::error::{AnalysisError, AuthlensError, ConfigError};

/// 분석기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// 입력 파일을 열 수 없음
    #[error("could not open file: {path}: {source}")]
    Input {
        /// 입력 경로
        path: String,
        /// 원인 I/O 에러
        source: std::io::Error,
    },

    /// 입력을 읽는 중 실패
    #[error("failed to read {path}: {source}")]
    Read {
        /// 입력 경로 또는 이름
        path: String,
        /// 원인 I/O 에러
        source: std::io::Error,
    },

    /// 집계 워커 태스크 실패 (패닉 또는 취소)
    #[error("aggregation worker failed: {0}")]
    Worker(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl From<AnalyzerError> for AuthlensError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Config { field, reason } => {
                AuthlensError::Config(ConfigError::InvalidValue { field, reason })
            }
            AnalyzerError::Worker(reason) => AuthlensError::Analysis(AnalysisError::Worker(reason)),
            other => AuthlensError::Analysis(AnalysisError::Input(other.to_string())),
        }
    }
}
