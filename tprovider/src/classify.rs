//! Keyword and status-code classification of model boundary failures.
//!
//! ```rust
//! use tprovider::{ProviderErrorKind, classify_failure};
//!
//! assert_eq!(classify_failure(None, "Unauthorized"), ProviderErrorKind::Authentication);
//! assert_eq!(classify_failure(Some(429), "slow down"), ProviderErrorKind::RateLimited);
//! assert_eq!(classify_failure(None, "boom"), ProviderErrorKind::Other);
//! ```

use std::time::Duration;

use crate::ProviderErrorKind;

const AUTHENTICATION_KEYWORDS: &[&str] = &[
    "api key",
    "invalid key",
    "unauthorized",
    "authentication",
    "api_key",
    "invalid_api_key",
    "401",
    "forbidden",
];

const RATE_LIMIT_KEYWORDS: &[&str] = &[
    "rate limit",
    "rate_limit",
    "too many requests",
    "429",
    "quota exceeded",
    "quota_exceeded",
];

const CONNECTION_KEYWORDS: &[&str] = &[
    "connection",
    "timeout",
    "network",
    "unreachable",
    "dns",
    "ssl",
    "certificate",
];

const DEVELOPER_INSTRUCTION_DISABLED: &str = "developer instruction is not enabled";

/// Maps a boundary failure to an error kind.
///
/// Status codes win over message text. Messages are matched case-insensitively
/// in order: system-prompt rejection, authentication, rate limit, connection.
pub fn classify_failure(status: Option<u16>, message: &str) -> ProviderErrorKind {
    if let Some(kind) = status.and_then(classify_status) {
        return kind;
    }

    let lowered = message.to_lowercase();
    if is_system_prompt_rejection(&lowered) {
        return ProviderErrorKind::SystemPromptUnsupported;
    }

    if contains_any(&lowered, AUTHENTICATION_KEYWORDS) {
        return ProviderErrorKind::Authentication;
    }

    if contains_any(&lowered, RATE_LIMIT_KEYWORDS) {
        return ProviderErrorKind::RateLimited;
    }

    if contains_any(&lowered, CONNECTION_KEYWORDS) {
        return ProviderErrorKind::Connection;
    }

    ProviderErrorKind::Other
}

fn classify_status(status: u16) -> Option<ProviderErrorKind> {
    match status {
        401 | 403 => Some(ProviderErrorKind::Authentication),
        429 => Some(ProviderErrorKind::RateLimited),
        408 | 502 | 503 | 504 => Some(ProviderErrorKind::Connection),
        _ => None,
    }
}

/// Whether a boundary rejected the separate system instruction.
pub fn is_system_prompt_rejection(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains(DEVELOPER_INSTRUCTION_DISABLED)
        || (lowered.contains("system") && lowered.contains("not supported"))
}

/// Extracts a `retry after N` / `retry-after: N` hint, in seconds.
pub fn parse_retry_after(message: &str) -> Option<Duration> {
    let lowered = message.to_lowercase();
    let start = ["retry after", "retry-after", "retry_after"]
        .iter()
        .find_map(|marker| lowered.find(marker).map(|index| index + marker.len()))?;

    let digits: String = lowered[start..]
        .trim_start_matches(|c: char| c == ':' || c == '=' || c.is_whitespace())
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    digits.parse::<u64>().ok().map(Duration::from_secs)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
