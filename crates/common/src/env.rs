//! Environment helpers
//!
//! Thin wrappers over `std::env` used for config fallbacks when no
//! `config.toml` is present.

use std::str::FromStr;

use tracing::warn;

/// Load `.env` if present. Safe to call more than once.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Read a string variable, falling back to `default` when unset or empty.
pub fn var_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Read and parse a variable; unparsable values are logged and ignored.
pub fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(%key, value = %raw, "ignoring unparsable environment variable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_or_falls_back_when_missing() {
        assert_eq!(var_or("POSEIDON_TEST_SURELY_UNSET_VAR", "x"), "x");
    }

    #[test]
    fn parse_var_missing_is_none() {
        assert_eq!(parse_var::<u16>("POSEIDON_TEST_SURELY_UNSET_PORT"), None);
    }
}
