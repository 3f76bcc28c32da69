//! Environment/runtime helpers
//!
//! Typed lookups with defaults used by configuration loading and startup.

use std::str::FromStr;

use tracing::warn;

/// Load `.env` once; missing files are fine.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Read `key`, falling back to `default` when unset.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse `key`. Unset or unparsable values yield `None`;
/// the latter is logged so a typo does not go unnoticed.
pub fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(%key, value = %raw, "ignoring unparsable environment value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back() {
        assert_eq!(env_or("COMMON_TEST_SURELY_UNSET_KEY", "fallback"), "fallback");
    }

    #[test]
    fn env_parse_missing_is_none() {
        assert_eq!(env_parse::<u16>("COMMON_TEST_SURELY_UNSET_PORT"), None);
    }
}
