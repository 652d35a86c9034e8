//! Host normalization.

use std::borrow::Cow;
use url::Url;

/// Reduces a URL or bare host to the form allowlist domains are stored in.
///
/// Strips the scheme, credentials, port, path, query, fragment, a trailing
/// root dot and a leading `www.`, and lower-cases the result. Returns `None`
/// when no host can be extracted.
#[must_use]
pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if has_scheme(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("http://{}", trimmed.trim_start_matches('/')))
    };

    let parsed = Url::parse(&candidate).ok()?;
    let host = parsed.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    let host = match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    };

    if host.is_empty() { None } else { Some(host) }
}

/// True when `input` starts with `scheme://`. A `://` later in the path or
/// query does not count.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
