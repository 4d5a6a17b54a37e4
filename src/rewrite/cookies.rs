//! `Set-Cookie` rewriting for cross-host delivery.
//!
//! Origin cookies are scoped to the origin's domain and often marked
//! `SameSite`/`Secure` for it. The browser only ever sees the public host, so
//! those attributes are removed textually and `Secure` is re-added when the
//! public host is https.

use std::sync::LazyLock;

use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use regex::Regex;

static DOMAIN_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i);\s*domain=[^;]+").expect("valid domain pattern"));
static SECURE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i);\s*secure\b").expect("valid secure pattern"));
static SAMESITE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i);\s*samesite=[^;]+").expect("valid samesite pattern"));

/// Raw `Set-Cookie` data as received from the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetCookieSource<'a> {
    /// One entry per cookie.
    List(Vec<&'a str>),
    /// Several cookies folded into one comma-separated string.
    Combined(&'a str),
}

impl<'a> SetCookieSource<'a> {
    /// Read the source from origin headers. Non-UTF-8 fields are skipped.
    pub fn from_headers(headers: &'a HeaderMap) -> Option<Self> {
        let values: Vec<&str> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();

        match values.len() {
            0 => None,
            1 => Some(Self::Combined(values[0])),
            _ => Some(Self::List(values)),
        }
    }

    /// Individual cookie strings.
    pub fn cookies(&self) -> Vec<&'a str> {
        match self {
            Self::List(values) => values.clone(),
            Self::Combined(raw) => split_combined(raw),
        }
    }
}

/// Split a combined `Set-Cookie` string into cookies.
///
/// A comma separates two cookies only when the next non-whitespace token
/// (up to `;` or whitespace) contains `=`. The comma inside
/// `Expires=Wed, 21 Oct 2015 07:28:00 GMT` is followed by `21` and is kept.
pub fn split_combined(raw: &str) -> Vec<&str> {
    let mut cookies = Vec::new();
    let mut start = 0;

    for (idx, _) in raw.match_indices(',') {
        let token = raw[idx + 1..]
            .trim_start()
            .split(|c: char| c == ';' || c.is_whitespace())
            .next()
            .unwrap_or_default();

        if token.contains('=') {
            cookies.push(&raw[start..idx]);
            start = idx + 1;
        }
    }
    cookies.push(&raw[start..]);

    cookies
}

/// Remove `Domain`, `Secure` and `SameSite` attributes from a cookie.
pub fn strip_cross_host_attributes(cookie: &str) -> String {
    let cookie = DOMAIN_ATTR.replace_all(cookie, "");
    let cookie = SECURE_ATTR.replace_all(&cookie, "");
    SAMESITE_ATTR.replace_all(&cookie, "").into_owned()
}

/// Rewrite one cookie, or `None` when the entry is blank.
pub fn rewrite_cookie(cookie: &str, secure: bool) -> Option<String> {
    if cookie.trim().is_empty() {
        return None;
    }

    let cleaned = strip_cross_host_attributes(cookie);
    let cleaned = cleaned.trim();
    if secure {
        Some(format!("{cleaned}; Secure"))
    } else {
        Some(cleaned.to_string())
    }
}

/// Replace the `Set-Cookie` entries of `out` with the rewritten cookies from `origin`.
pub fn rewrite_set_cookies(origin: &HeaderMap, out: &mut HeaderMap, secure: bool) {
    let Some(source) = SetCookieSource::from_headers(origin) else {
        return;
    };

    out.remove(SET_COOKIE);

    for cookie in source.cookies() {
        let Some(rewritten) = rewrite_cookie(cookie, secure) else {
            continue;
        };

        match HeaderValue::from_str(&rewritten) {
            Ok(value) => {
                out.append(SET_COOKIE, value);
            }
            Err(_) => {
                tracing::warn!(cookie = %rewritten, "Dropping unrepresentable Set-Cookie");
            }
        }
    }
}
