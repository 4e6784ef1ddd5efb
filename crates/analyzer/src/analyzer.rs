//! 로그 분석기 -- 입력을 라인 단위로 읽어 집계합니다.
//!
//! [`LogAnalyzer`]는 파일이나 임의의 비동기 리더를 한 번 순회하며
//! [`Findings`]를 만듭니다.
//!
//! # 처리 모드
//! - 순차 (`workers == 1`): 라인마다 바로 분류/누적합니다.
//! - 병렬 (`workers > 1`): `chunk_lines`개씩 묶은 청크를 blocking 워커에 넘기고,
//!   각 워커의 독립 `Findings`를 완료 순서대로 병합합니다.
//!   동시에 실행되는 워커는 최대 `workers`개입니다.
//!
//! # 라인 규칙
//! - `\n`으로 구분하며, 바로 앞의 `\r` 하나는 제거합니다 (CRLF).
//! - 마지막 라인에 개행이 없어도 한 라인으로 셉니다.
//! - UTF-8이 아닌 바이트는 U+FFFD로 대체합니다.

use std::borrow::Cow;
use std::path::Path;

use metrics::counter;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, info};

use authlens_core::metrics::{
    EVENTS_TOTAL, LABEL_KIND, LABEL_MODE, LINES_PROCESSED_TOTAL, RUNS_TOTAL,
    UNKNOWN_FIELDS_TOTAL,
};

use crate::classify::EventKind;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::findings::Findings;

/// 인증 로그 분석기
pub struct LogAnalyzer {
    config: AnalyzerConfig,
}

impl LogAnalyzer {
    /// 설정을 검증하고 분석기를 생성합니다.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// 파일을 열어 분석합니다.
    pub async fn analyze_path(&self, path: &Path) -> Result<Findings, AnalyzerError> {
        let path_name = path.display().to_string();
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| AnalyzerError::Input {
                path: path_name.clone(),
                source,
            })?;

        info!(path = %path_name, workers = self.config.workers, "analyzing auth log");
        self.analyze_reader(BufReader::new(file), &path_name).await
    }

    /// 비동기 리더에서 라인을 읽어 분석합니다.
    ///
    /// `source`는 에러 메시지와 로그에 쓰이는 입력 이름입니다.
    pub async fn analyze_reader<R>(&self, reader: R, source: &str) -> Result<Findings, AnalyzerError>
    where
        R: AsyncBufRead + Unpin,
    {
        let findings = if self.config.is_parallel() {
            self.analyze_parallel(reader, source).await?
        } else {
            analyze_sequential(reader, source).await?
        };

        record_metrics(&findings, self.config.is_parallel());
        debug!(
            source,
            total_lines = findings.total_lines(),
            ssh_failed = findings.ssh_failed_total(),
            ssh_accepted = findings.ssh_accepted_total(),
            sudo_authfail = findings.sudo_authfail_total(),
            unknown_fields = findings.unknown_fields(),
            "analysis complete"
        );
        Ok(findings)
    }

    async fn analyze_parallel<R>(&self, mut reader: R, source: &str) -> Result<Findings, AnalyzerError>
    where
        R: AsyncBufRead + Unpin,
    {
        let chunk_lines = self.config.chunk_lines;
        let mut findings = Findings::new();
        let mut workers: JoinSet<Findings> = JoinSet::new();
        let mut chunk: Vec<String> = Vec::with_capacity(chunk_lines);
        let mut buf = Vec::new();
        let mut chunks = 0usize;

        while read_line(&mut reader, &mut buf, source).await? {
            chunk.push(decode_line(&buf).into_owned());
            if chunk.len() == chunk_lines {
                // 워커 수 상한을 넘지 않도록 하나가 끝날 때까지 대기
                while workers.len() >= self.config.workers {
                    merge_next(&mut workers, &mut findings).await?;
                }
                let batch = std::mem::replace(&mut chunk, Vec::with_capacity(chunk_lines));
                workers.spawn_blocking(move || Findings::from_lines(batch));
                chunks += 1;
            }
        }

        if !chunk.is_empty() {
            findings.merge(Findings::from_lines(chunk));
        }
        while !workers.is_empty() {
            merge_next(&mut workers, &mut findings).await?;
        }

        debug!(source, chunks, "parallel aggregation merged");
        Ok(findings)
    }
}

async fn analyze_sequential<R>(mut reader: R, source: &str) -> Result<Findings, AnalyzerError>
where
    R: AsyncBufRead + Unpin,
{
    let mut findings = Findings::new();
    let mut buf = Vec::new();
    while read_line(&mut reader, &mut buf, source).await? {
        findings.consume(&decode_line(&buf));
    }
    Ok(findings)
}

/// 다음 라인을 `buf`에 읽습니다. 입력이 끝나면 `false`를 반환합니다.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>, source: &str) -> Result<bool, AnalyzerError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let n = reader
        .read_until(b'\n', buf)
        .await
        .map_err(|source_err| AnalyzerError::Read {
            path: source.to_owned(),
            source: source_err,
        })?;
    Ok(n > 0)
}

/// 라인 종결자(`\n`, `\r\n`)를 제거하고 UTF-8로 해석합니다.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}

async fn merge_next(workers: &mut JoinSet<Findings>, findings: &mut Findings) -> Result<(), AnalyzerError> {
    if let Some(joined) = workers.join_next().await {
        let partial = joined.map_err(|e| AnalyzerError::Worker(e.to_string()))?;
        findings.merge(partial);
    }
    Ok(())
}

fn record_metrics(findings: &Findings, parallel: bool) {
    let mode = if parallel { "parallel" } else { "sequential" };
    counter!(LINES_PROCESSED_TOTAL).increment(findings.total_lines());
    for kind in [
        EventKind::SshFailedLogin,
        EventKind::SshSuccessfulLogin,
        EventKind::SudoAuthFailure,
    ] {
        counter!(EVENTS_TOTAL, LABEL_KIND => kind.as_str()).increment(findings.total_for(kind));
    }
    counter!(UNKNOWN_FIELDS_TOTAL).increment(findings.unknown_fields());
    counter!(RUNS_TOTAL, LABEL_MODE => mode).increment(1);
}
