use std::collections::BTreeMap;
use std::path::Path;

/// Name of the secrets file read from the project root.
pub const ENV_FILE_NAME: &str = ".release.env";

/// Loads a `.release.env` file (shell-style `KEY=value` format).
///
/// `.release.env` holds release secrets (signing key, signing password,
/// publisher token) so they can stay out of `bundle.toml`. Values may be
/// wrapped in single or double quotes.
pub fn load_env_file(path: &Path) -> miette::Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    if !path.is_file() {
        return Ok(map);
    }
    let content =
        std::fs::read_to_string(path).map_err(relbundle_util::errors::ReleaseError::Io)?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if let Some((key, value)) = trimmed.split_once('=') {
            map.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }
    }
    Ok(map)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Interpolate `${env:VAR}` references in a string.
///
/// Looks up values first from the provided `env_overrides` map (populated
/// from `.release.env`), then falls back to actual process environment variables.
pub fn interpolate(input: &str, env_overrides: &BTreeMap<String, String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${env:") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let key = &rest[start + 6..start + len];
        result.push_str(&lookup(key, env_overrides).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve a variable from `.release.env` first, then the process environment.
///
/// Empty values count as unset.
pub fn lookup(key: &str, env_overrides: &BTreeMap<String, String>) -> Option<String> {
    lookup_with(key, env_overrides, |k| std::env::var(k).ok())
}

/// Like [`lookup`], with `process_env` standing in for the process environment.
pub fn lookup_with(
    key: &str,
    env_overrides: &BTreeMap<String, String>,
    process_env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    env_overrides
        .get(key)
        .cloned()
        .or_else(|| process_env(key))
        .filter(|v| !v.is_empty())
}
