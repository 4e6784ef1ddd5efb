//! 분석기 설정
//!
//! [`AnalyzerConfig`]는 core의 [`AnalysisConfig`](authlens_core::config::AnalysisConfig)에서
//! 파생되며, 순차/병렬 집계 방식을 결정합니다.
//!
//! # 사용 예시
//! ```ignore
//! use authlens_core::config::AuthlensConfig;
//! use authlens_analyzer::config::AnalyzerConfig;
//!
//! let core_config = AuthlensConfig::default();
//! let config = AnalyzerConfig::from_core(&core_config.analysis);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;

/// 분석기 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// 동시에 실행되는 집계 워커 수 (1이면 순차 처리)
    pub workers: usize,
    /// 워커 하나에 넘기는 청크당 라인 수
    pub chunk_lines: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            chunk_lines: 8192,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_core(core: &authlens_core::config::AnalysisConfig) -> Self {
        Self {
            workers: core.workers,
            chunk_lines: core.chunk_lines,
        }
    }

    /// 병렬 집계를 사용하는지 여부
    pub fn is_parallel(&self) -> bool {
        self.workers > 1
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.workers == 0 {
            return Err(AnalyzerError::Config {
                field: "workers".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        if self.chunk_lines == 0 {
            return Err(AnalyzerError::Config {
                field: "chunk_lines".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sequential() {
        let config = AnalyzerConfig::default();
        assert!(!config.is_parallel());
        config.validate().unwrap();
    }

    #[test]
    fn from_core_copies_fields() {
        let core = authlens_core::config::AnalysisConfig {
            workers: 4,
            chunk_lines: 100,
        };
        let config = AnalyzerConfig::from_core(&core);
        assert_eq!(config.workers, 4);
        assert_eq!(config.chunk_lines, 100);
        assert!(config.is_parallel());
    }

    #[test]
    fn validate_rejects_zero_values() {
        let config = AnalyzerConfig {
            workers: 0,
            chunk_lines: 10,
        };
        assert!(config.validate().unwrap_err().to_string().contains("workers"));

        let config = AnalyzerConfig {
            workers: 2,
            chunk_lines: 0,
        };
        assert!(config.validate().unwrap_err().to_string().contains("chunk_lines"));
    }
}
