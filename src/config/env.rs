use std::env::VarError;
use std::time::Duration;

use humantime::parse_duration;

use crate::error::ConfigError;

/// Read a variable from the process environment.
pub(super) fn process_env(key: &str) -> Result<String, VarError> {
    std::env::var(key)
}

pub(super) fn env_string<F>(
    lookup: &F,
    key: &'static str,
) -> std::result::Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::Other(format!("{key}: {err}"))),
    }
}

pub(super) fn env_duration<F>(
    lookup: &F,
    key: &'static str,
) -> std::result::Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    if let Some(value) = env_string(lookup, key)? {
        if value.trim().is_empty() {
            return Ok(None);
        }
        return parse_duration(value.trim())
            .map(Some)
            .map_err(|err| ConfigError::InvalidField {
                field: key,
                message: err.to_string(),
            });
    }
    Ok(None)
}

#[cfg(test)]
pub(super) fn fixed_env(
    pairs: &[(&str, &str)],
) -> impl Fn(&str) -> Result<String, VarError> + use<> {
    let vars: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned().ok_or(VarError::NotPresent)
}
