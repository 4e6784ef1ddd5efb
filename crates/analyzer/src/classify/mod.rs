//! 라인 분류 모듈 -- 보안 이벤트 판별 및 필드 추출
//!
//! [`RULES`]는 우선순위 순서대로 정렬된 분류 규칙 목록입니다.
//! 각 규칙은 마커 문구(모두 포함되어야 함)와 필드 추출기의 쌍이며,
//! 첫 번째로 매칭된 규칙의 결과를 반환하고 이후 규칙은 평가하지 않습니다.
//!
//! # 분류 규칙 (평가 순서)
//! 1. `sshd` + `Failed password for` → [`EventKind::SshFailedLogin`]
//! 2. `sshd` + `Accepted password for ` → [`EventKind::SshSuccessfulLogin`]
//! 3. `sudo` + `authentication failure` → [`EventKind::SudoAuthFailure`]
//!
//! # 사용 예시
//! ```
//! use authlens_analyzer::classify::{classify_and_extract, EventKind};
//!
//! let (kind, fields) =
//!     classify_and_extract("sshd: Accepted password for root from 192.168.1.1 port 22");
//! assert_eq!(kind, EventKind::SshSuccessfulLogin);
//! assert_eq!(fields.username, Some("root"));
//! assert_eq!(fields.ip, Some("192.168.1.1"));
//! ```

pub mod extract;

use serde::Serialize;

use extract::{ACCEPTED_PASSWORD_ANCHOR, ip_after_from, ssh_failed_user, sudo_user, user_after_phrase};

/// 라인 하나에 할당되는 이벤트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// sshd 비밀번호 인증 실패
    SshFailedLogin,
    /// sshd 비밀번호 인증 성공
    SshSuccessfulLogin,
    /// sudo 인증 실패
    SudoAuthFailure,
    /// 어떤 규칙에도 해당하지 않음
    None,
}

impl EventKind {
    /// 메트릭 레이블 등에 쓰는 짧은 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SshFailedLogin => "ssh_failed",
            Self::SshSuccessfulLogin => "ssh_accepted",
            Self::SudoAuthFailure => "sudo_authfail",
            Self::None => "none",
        }
    }
}

/// 라인에서 추출한 필드
///
/// 원본 라인을 빌려 쓰므로 분류 과정에서 할당이 발생하지 않습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractedFields<'a> {
    pub username: Option<&'a str>,
    pub ip: Option<&'a str>,
}

/// 분류된 인증 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent<'a> {
    SshFailedLogin {
        username: Option<&'a str>,
        ip: Option<&'a str>,
    },
    SshSuccessfulLogin {
        username: Option<&'a str>,
        ip: Option<&'a str>,
    },
    SudoAuthFailure {
        username: Option<&'a str>,
    },
}

impl<'a> AuthEvent<'a> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SshFailedLogin { .. } => EventKind::SshFailedLogin,
            Self::SshSuccessfulLogin { .. } => EventKind::SshSuccessfulLogin,
            Self::SudoAuthFailure { .. } => EventKind::SudoAuthFailure,
        }
    }

    pub fn fields(&self) -> ExtractedFields<'a> {
        match *self {
            Self::SshFailedLogin { username, ip } | Self::SshSuccessfulLogin { username, ip } => {
                ExtractedFields { username, ip }
            }
            Self::SudoAuthFailure { username } => ExtractedFields { username, ip: None },
        }
    }
}

/// 분류 규칙 -- 마커 문구 목록과 필드 추출기
pub struct ClassifierRule {
    /// 이 규칙이 생성하는 이벤트 종류
    pub kind: EventKind,
    /// 라인에 모두 포함되어야 하는 마커 문구
    pub markers: &'static [&'static str],
    extract: for<'a> fn(&'a str) -> AuthEvent<'a>,
}

impl ClassifierRule {
    /// 라인이 이 규칙의 모든 마커를 포함하는지 확인합니다.
    pub fn matches(&self, line: &str) -> bool {
        self.markers.iter().all(|marker| line.contains(marker))
    }

    /// 매칭되면 필드를 추출한 이벤트를 반환합니다.
    pub fn apply<'a>(&self, line: &'a str) -> Option<AuthEvent<'a>> {
        self.matches(line).then(|| (self.extract)(line))
    }
}

/// 우선순위 순서의 분류 규칙
pub const RULES: [ClassifierRule; 3] = [
    ClassifierRule {
        kind: EventKind::SshFailedLogin,
        markers: &["sshd", "Failed password for"],
        extract: extract_ssh_failed,
    },
    ClassifierRule {
        kind: EventKind::SshSuccessfulLogin,
        markers: &["sshd", ACCEPTED_PASSWORD_ANCHOR],
        extract: extract_ssh_accepted,
    },
    ClassifierRule {
        kind: EventKind::SudoAuthFailure,
        markers: &["sudo", "authentication failure"],
        extract: extract_sudo_failure,
    },
];

fn extract_ssh_failed(line: &str) -> AuthEvent<'_> {
    AuthEvent::SshFailedLogin {
        username: ssh_failed_user(line),
        ip: ip_after_from(line),
    }
}

fn extract_ssh_accepted(line: &str) -> AuthEvent<'_> {
    AuthEvent::SshSuccessfulLogin {
        username: user_after_phrase(line, ACCEPTED_PASSWORD_ANCHOR),
        ip: ip_after_from(line),
    }
}

fn extract_sudo_failure(line: &str) -> AuthEvent<'_> {
    AuthEvent::SudoAuthFailure {
        username: sudo_user(line),
    }
}

/// 라인을 분류합니다. 어떤 규칙에도 해당하지 않으면 `None`입니다.
pub fn classify(line: &str) -> Option<AuthEvent<'_>> {
    RULES.iter().find_map(|rule| rule.apply(line))
}

/// 라인을 분류하고 (종류, 추출 필드) 쌍으로 반환합니다.
pub fn classify_and_extract(line: &str) -> (EventKind, ExtractedFields<'_>) {
    match classify(line) {
        Some(event) => (event.kind(), event.fields()),
        None => (EventKind::None, ExtractedFields::default()),
    }
}
