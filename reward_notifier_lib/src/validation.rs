//! Validation of user-supplied command-line values.

use std::time::Duration;

use url::Url;

use crate::error::RewardNotifierError;

/// Path suffix of a project's description page.
pub const DESCRIPTION_SUFFIX: &str = "/description";

/// Turns a project URL into the URL of its description page.
///
/// The query string and fragment are dropped, and `/description` is
/// appended unless the path already ends with it. Only absolute http(s)
/// URLs are accepted.
pub fn normalize_project_url(input: &str) -> Result<Url, RewardNotifierError> {
    let mut url = Url::parse(input.trim()).map_err(|e| {
        RewardNotifierError::InvalidInput(format!("project URL not valid: {}", e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RewardNotifierError::InvalidInput(format!(
            "project URL not valid: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(RewardNotifierError::InvalidInput(
            "project URL not valid: missing host".to_string(),
        ));
    }

    url.set_query(None);
    url.set_fragment(None);

    let path = url.path().trim_end_matches('/').to_string();
    if !path.ends_with(DESCRIPTION_SUFFIX) {
        url.set_path(&format!("{}{}", path, DESCRIPTION_SUFFIX));
    } else {
        url.set_path(&path);
    }
    Ok(url)
}

/// Parses a duration such as `30s`, `1m`, `1h30m`, `1.5m` or `250ms`.
///
/// Accepted units: `ms`, `s`, `m`, `h`. A unit is required for every
/// number and the total must be positive.
pub fn parse_duration(input: &str) -> Result<Duration, RewardNotifierError> {
    let invalid = || {
        RewardNotifierError::InvalidInput(format!(
            "invalid duration '{}'. Use e.g. 30s, 1m, 1h30m",
            input
        ))
    };

    let s = input.trim();
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total_ms = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..num_len].parse().map_err(|_| invalid())?;
        rest = &rest[num_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit_ms = match &rest[..unit_len] {
            "ms" => 1.0,
            "s" => 1_000.0,
            "m" => 60_000.0,
            "h" => 3_600_000.0,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_len..];
        total_ms += value * unit_ms;
    }

    if total_ms <= 0.0 {
        return Err(RewardNotifierError::InvalidInput(format!(
            "duration '{}' must be greater than zero",
            input
        )));
    }
    Duration::try_from_secs_f64(total_ms / 1_000.0).map_err(|_| invalid())
}
