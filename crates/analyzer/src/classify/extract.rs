//! 앵커 문구 기반 필드 추출기
//!
//! 정규식 없이 부분 문자열 탐색과 공백 스캔만으로 IP/사용자명을 추출합니다.
//! 모든 추출기는 실패 시 에러 대신 `None`을 반환합니다.
//!
//! IP 추출기는 라인 끝까지를 값으로 허용하지만, 사용자명 추출기는
//! 뒤따르는 공백이 없으면 실패합니다. 이 비대칭은 의도된 동작입니다.

/// IP 앞에 오는 앵커
const FROM_ANCHOR: &str = " from ";

/// 실패 로그인 사용자명 앞의 앵커
pub(crate) const FAILED_PASSWORD_ANCHOR: &str = "Failed password for ";

/// 존재하지 않는 계정 시도 시 사용자명 앞에 붙는 문구
const INVALID_USER_PREFIX: &str = "invalid user ";

/// 성공 로그인 사용자명 앞의 앵커
pub(crate) const ACCEPTED_PASSWORD_ANCHOR: &str = "Accepted password for ";

/// sudo PAM 메시지의 사용자 필드
const SUDO_USER_ANCHOR: &str = "user=";

/// sudo 사용자명을 끝내는 구분자
const SUDO_USER_DELIMITERS: [char; 5] = [' ', ';', '\r', '\n', '\t'];

/// C 로케일 `isspace`와 같은 공백 판정 (수직 탭 포함)
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// 양끝 공백을 제거하고, 비어 있으면 `None`을 반환합니다.
fn non_empty_trimmed(s: &str) -> Option<&str> {
    let trimmed = s.trim_matches(is_space);
    (!trimmed.is_empty()).then_some(trimmed)
}

/// 첫 번째 `" from "` 뒤의 비공백 문자열을 IP로 추출합니다.
///
/// 다음 공백이 없으면 라인 끝까지를 사용합니다.
pub fn ip_after_from(line: &str) -> Option<&str> {
    let pos = line.find(FROM_ANCHOR)?;
    let rest = &line[pos + FROM_ANCHOR.len()..];
    let end = rest.find(' ').unwrap_or(rest.len());
    non_empty_trimmed(&rest[..end])
}

/// `phrase` 바로 뒤부터 다음 공백 전까지를 사용자명으로 추출합니다.
///
/// 뒤따르는 공백이 없으면 `None`입니다.
pub fn user_after_phrase<'a>(line: &'a str, phrase: &str) -> Option<&'a str> {
    let pos = line.find(phrase)?;
    token_before_space(&line[pos + phrase.len()..])
}

/// `"Failed password for "` 뒤의 사용자명을 추출합니다.
///
/// `"invalid user "` 접두 문구가 있으면 건너뜁니다.
pub fn ssh_failed_user(line: &str) -> Option<&str> {
    let pos = line.find(FAILED_PASSWORD_ANCHOR)?;
    let rest = &line[pos + FAILED_PASSWORD_ANCHOR.len()..];
    let rest = rest.strip_prefix(INVALID_USER_PREFIX).unwrap_or(rest);
    token_before_space(rest)
}

/// `user=` 뒤의 사용자명을 추출합니다.
///
/// 공백, `;`, CR, LF, TAB 중 처음 나오는 구분자 또는 라인 끝에서 끊습니다.
pub fn sudo_user(line: &str) -> Option<&str> {
    let pos = line.find(SUDO_USER_ANCHOR)?;
    let rest = &line[pos + SUDO_USER_ANCHOR.len()..];
    let end = rest.find(SUDO_USER_DELIMITERS).unwrap_or(rest.len());
    non_empty_trimmed(&rest[..end])
}

fn token_before_space(rest: &str) -> Option<&str> {
    let end = rest.find(' ')?;
    non_empty_trimmed(&rest[..end])
}
