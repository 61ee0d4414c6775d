//! `${VAR}` / `${VAR:-default}` substitution applied to raw config text
//! before TOML parsing, and to individual string values afterward so that
//! environment-variable overrides layered on top can themselves contain
//! substitutions.

use crate::error::{ConfigError, ConfigResult};

/// Expands every `${VAR}` / `${VAR:-default}` occurrence in `input` using
/// `lookup` to resolve variable names. A variable with no default and no
/// value in the environment expands to the empty string, matching shell
/// semantics for unset variables.
pub fn expand(input: &str, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(dollar) = rest.find("${") {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 2..];
        let close = after
            .find('}')
            .ok_or_else(|| ConfigError::UnterminatedSubstitution(input.to_string()))?;
        let inner = &after[..close];

        let (name, default) = match inner.split_once(":-") {
            Some((n, d)) => (n, Some(d)),
            None => (inner, None),
        };

        let value = lookup(name).or_else(|| default.map(str::to_string)).unwrap_or_default();
        out.push_str(&value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn substitutes_plain_variable() {
        let out = expand("token = \"${TOKEN}\"", env(&[("TOKEN", "abc")])).unwrap();
        assert_eq!(out, "token = \"abc\"");
    }

    #[test]
    fn falls_back_to_default_when_unset() {
        let out = expand("base = \"${BASE:-https://example.com}\"", env(&[])).unwrap();
        assert_eq!(out, "base = \"https://example.com\"");
    }

    #[test]
    fn prefers_environment_over_default() {
        let out = expand("base = \"${BASE:-fallback}\"", env(&[("BASE", "set")])).unwrap();
        assert_eq!(out, "base = \"set\"");
    }

    #[test]
    fn unset_without_default_is_empty() {
        let out = expand("x = \"${MISSING}\"", env(&[])).unwrap();
        assert_eq!(out, "x = \"\"");
    }

    #[test]
    fn unterminated_brace_errors() {
        assert!(expand("x = \"${MISSING\"", env(&[])).is_err());
    }
}
