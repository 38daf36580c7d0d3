//! Environment variable abstraction for testability.
//!
//! Config resolution reads through [`Env`] instead of [`std::env`] directly,
//! so tests can supply a fixed set of variables with [`Env::mock()`] and
//! never mutate the process environment.

use std::collections::HashMap;

/// Environment variable reader.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// An `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// An `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up a variable, treating empty values as unset.
    pub fn get(&self, name: &str) -> Option<String> {
        let value = match &self.overrides {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        }?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Interpret a variable as a boolean switch.
    ///
    /// Accepts `1/0`, `true/false`, `yes/no`, `on/off` (case-insensitive).
    /// Anything else, or an unset variable, yields `None`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)?.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_env_reads_cargo_manifest_dir() {
        assert!(Env::real().get("CARGO_MANIFEST_DIR").is_some());
    }

    #[test]
    fn mock_env_returns_set_values() {
        let env = Env::mock([("FOO", "bar"), ("BAZ", " qux ")]);
        assert_eq!(env.get("FOO").as_deref(), Some("bar"));
        assert_eq!(env.get("BAZ").as_deref(), Some("qux"));
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let env = Env::mock([("EMPTY", "   ")]);
        assert_eq!(env.get("EMPTY"), None);
    }

    #[test]
    fn flag_parses_common_spellings() {
        let env = Env::mock([("A", "yes"), ("B", "OFF"), ("C", "maybe")]);
        assert_eq!(env.flag("A"), Some(true));
        assert_eq!(env.flag("B"), Some(false));
        assert_eq!(env.flag("C"), None);
        assert_eq!(env.flag("D"), None);
    }
}
