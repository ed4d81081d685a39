use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::Result;
use crate::error::{ConfigError, Error};

mod defaults;
mod env;
mod raw;
mod serde;

use self::serde::HumantimeDuration;

/// Connection settings for the Zabbix API.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub token: SecretString,
    pub http_connect_timeout: Duration,
    pub http_request_timeout: Duration,
}

impl Config {
    /// Load configuration from an optional file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be parsed, when
    /// environment overrides are invalid, or when the resulting values fail
    /// validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path, None).map_err(Error::from)?;
        raw.apply_env_overrides(&env::process_env).map_err(Error::from)?;
        raw.validate_and_build()
    }

    /// Like [`Config::from_env_and_file`], but the file must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileMissing`] when `path` does not exist, and the
    /// errors of [`Config::from_env_and_file`] otherwise.
    pub fn from_required_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileMissing {
                path: path.to_path_buf(),
            }
            .into());
        }
        Self::from_env_and_file(path)
    }
}
