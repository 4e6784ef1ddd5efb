//! 설정 관리 -- authlens.toml 파싱 및 런타임 설정
//!
//! [`AuthlensConfig`]는 분석기와 CLI가 공유하는 최상위 설정 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`AUTHLENS_REPORT_TOP=20` 형식)
//! 3. 설정 파일 (`authlens.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), authlens_core::error::AuthlensError> {
//! use authlens_core::config::AuthlensConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = AuthlensConfig::load("authlens.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = AuthlensConfig::parse("[report]\ntop = 5")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AuthlensError, ConfigError};

/// 유효한 로그 레벨
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 유효한 로그 형식
const VALID_LOG_FORMATS: [&str; 2] = ["json", "pretty"];

/// 유효한 리포트 출력 형식
const VALID_REPORT_FORMATS: [&str; 2] = ["pretty", "json"];

/// authlens 통합 설정
///
/// `authlens.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthlensConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 리포트 설정
    #[serde(default)]
    pub report: ReportConfig,
    /// 분석 엔진 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AuthlensConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용한 뒤 검증합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AuthlensError> {
        Self::load_or_default(Some(path.as_ref())).await
    }

    /// 설정 파일이 주어지면 로드하고, 없으면 기본값에 환경변수만 적용한 뒤 검증합니다.
    ///
    /// 파싱할 수 없는 환경변수 값은 무시되며 `warn!`으로 기록됩니다.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, AuthlensError> {
        let (config, ignored) = Self::resolve(path).await?;
        for var in &ignored {
            var.warn();
        }
        config.validate()?;
        Ok(config)
    }

    /// 파일(또는 기본값)과 환경변수를 병합하되 검증은 하지 않습니다.
    ///
    /// CLI 인자처럼 더 높은 우선순위의 값을 덮어쓴 뒤 호출자가
    /// [`validate`](Self::validate)를 한 번 호출해야 합니다.
    /// 무시된 환경변수는 로깅이 준비된 뒤 기록할 수 있도록 반환합니다.
    pub async fn resolve(
        path: Option<&Path>,
    ) -> Result<(Self, Vec<IgnoredEnvVar>), AuthlensError> {
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        let ignored = config.apply_env_overrides();
        Ok((config, ignored))
    }

    /// TOML 파일에서 설정을 파싱합니다 (환경변수 오버라이드와 검증 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AuthlensError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AuthlensError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                AuthlensError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, AuthlensError> {
        toml::from_str(toml_str).map_err(|e| {
            AuthlensError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `AUTHLENS_{SECTION}_{FIELD}`
    /// 예: `AUTHLENS_REPORT_ALERT_THRESHOLD=5`
    ///
    /// 숫자로 파싱할 수 없는 값은 적용하지 않고 반환 목록에 담습니다.
    pub fn apply_env_overrides(&mut self) -> Vec<IgnoredEnvVar> {
        let mut ignored = Vec::new();

        // General
        override_string(&mut self.general.log_level, "AUTHLENS_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "AUTHLENS_GENERAL_LOG_FORMAT");

        // Report
        override_string(&mut self.report.format, "AUTHLENS_REPORT_FORMAT");
        override_parsed(&mut self.report.top, "AUTHLENS_REPORT_TOP", &mut ignored);
        override_parsed(
            &mut self.report.alert_threshold,
            "AUTHLENS_REPORT_ALERT_THRESHOLD",
            &mut ignored,
        );

        // Analysis
        override_parsed(
            &mut self.analysis.workers,
            "AUTHLENS_ANALYSIS_WORKERS",
            &mut ignored,
        );
        override_parsed(
            &mut self.analysis.chunk_lines,
            "AUTHLENS_ANALYSIS_CHUNK_LINES",
            &mut ignored,
        );

        ignored
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AuthlensError> {
        if !VALID_LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", VALID_LOG_LEVELS.join(", ")),
            }
            .into());
        }

        if !VALID_LOG_FORMATS.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", VALID_LOG_FORMATS.join(", ")),
            }
            .into());
        }

        if !VALID_REPORT_FORMATS.contains(&self.report.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "report.format".to_owned(),
                reason: format!("must be one of: {}", VALID_REPORT_FORMATS.join(", ")),
            }
            .into());
        }

        if self.report.top == 0 {
            return Err(ConfigError::InvalidValue {
                field: "report.top".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.analysis.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.workers".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.analysis.chunk_lines == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.chunk_lines".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            // 리포트가 stdout을 차지하므로 기본은 경고 이상만 출력
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 리포트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 출력 형식 (pretty, json)
    pub format: String,
    /// 순위 목록 크기
    pub top: usize,
    /// 알림 임계값 (0 = 비활성화)
    pub alert_threshold: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "pretty".to_owned(),
            top: 10,
            alert_threshold: 0,
        }
    }
}

/// 분석 엔진 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 집계 워커 수 (1 = 순차 처리)
    pub workers: usize,
    /// 워커 하나가 처리하는 청크당 라인 수
    pub chunk_lines: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            chunk_lines: 8192,
        }
    }
}

/// 파싱에 실패해 적용되지 않은 환경변수
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredEnvVar {
    pub key: &'static str,
    pub value: String,
}

impl IgnoredEnvVar {
    /// 무시된 값을 경고로 기록합니다.
    pub fn warn(&self) {
        warn!(
            env_key = self.key,
            value = self.value.as_str(),
            "failed to parse env var, ignoring"
        );
    }
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_parsed<T: FromStr>(
    target: &mut T,
    env_key: &'static str,
    ignored: &mut Vec<IgnoredEnvVar>,
) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => ignored.push(IgnoredEnvVar {
                key: env_key,
                value: val,
            }),
        }
    }
}
