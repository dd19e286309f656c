//! Redaction for values that end up in logs or `Debug` output.

use std::fmt;
use url::Url;

const REDACTED: &str = "[REDACTED]";

/// Query parameters whose values never reach the logs
const SENSITIVE_PARAMS: [&str; 6] = ["token", "key", "secret", "password", "api_key", "t"];

/// Wrapper for sensitive data that redacts on display
#[derive(Clone)]
pub struct Redacted<T>(T);

impl<T> Redacted<T> {
    /// Create a new redacted value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Get the inner value (use sparingly)
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Redact a token, keeping its `xox?-` family prefix for debugging
pub fn redact_token(token: &str) -> String {
    match token.get(..5) {
        Some(prefix) if token.len() > 8 && prefix.starts_with("xox") => {
            format!("{}{}", prefix, REDACTED)
        }
        _ => REDACTED.to_string(),
    }
}

/// Redact a URL, hiding credentials and sensitive query parameters
pub fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    if url.password().is_some() {
        let _ = url.set_password(Some(REDACTED));
    }

    if url.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if SENSITIVE_PARAMS
                    .iter()
                    .any(|sensitive| key.eq_ignore_ascii_case(sensitive))
                {
                    REDACTED.to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.to_string()
}
