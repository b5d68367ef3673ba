//! Configuration for `fviz`.
//!
//! Everything has a default except the API key, which is only needed to talk to AeroAPI.
//!
//! ```hcl
//! version = 1
//! api_key = "..."
//! artifacts_dir = "/tmp/fviz"
//! on_error = "tolerant"
//! ```
//!

use std::env;

use eyre::Result;
use serde::Deserialize;
use tracing::debug;

use fviz_common::{ConfigFile, Versioned};
use fviz_sources::DEF_API_URL;

use crate::FailurePolicy;

/// Current version
pub const CVERSION: usize = 1;

/// Overrides the `api_key` from the file
pub const API_KEY_ENV: &str = "AEROAPI_API_KEY";

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Format version
    pub version: usize,
    /// AeroAPI base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// AeroAPI key
    #[serde(default)]
    pub api_key: String,
    /// Where snapshots are read and written, and archives land
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: String,
    #[serde(default)]
    pub verbose: bool,
    /// Policy for batches of flights
    #[serde(default)]
    pub on_error: FailurePolicy,
}

fn default_api_url() -> String {
    DEF_API_URL.to_owned()
}

fn default_artifacts_dir() -> String {
    ".".to_owned()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: CVERSION,
            api_url: default_api_url(),
            api_key: String::new(),
            artifacts_dir: default_artifacts_dir(),
            verbose: false,
            on_error: FailurePolicy::default(),
        }
    }
}

impl Versioned for Config {
    fn version(&self) -> usize {
        self.version
    }
}

impl Config {
    /// Load the given file or the default one, then apply the environment.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&str>) -> Result<Config> {
        let cfg = ConfigFile::<Config>::load(fname, CVERSION)?.into_inner();
        Ok(cfg.with_env(env::var(API_KEY_ENV).ok()))
    }

    fn with_env(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            debug!("api key from {API_KEY_ENV}");
            self.api_key = key;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();
        assert_eq!(CVERSION, cfg.version());
        assert_eq!("https://aeroapi.flightaware.com/aeroapi", cfg.api_url);
        assert_eq!(".", cfg.artifacts_dir);
        assert_eq!(FailurePolicy::FirstFatal, cfg.on_error);
        assert!(!cfg.verbose);
    }

    #[test]
    fn test_config_load() -> Result<()> {
        let dir = tempdir()?;
        let fname = dir.path().join("config.hcl");
        fs::write(
            &fname,
            "version = 1\napi_key = \"foo\"\nartifacts_dir = \"/tmp/fviz\"\non_error = \"stop-at-gap\"\n",
        )?;

        let cfg = ConfigFile::<Config>::load(fname.to_str(), CVERSION)?.into_inner();
        assert_eq!("foo", cfg.api_key);
        assert_eq!("/tmp/fviz", cfg.artifacts_dir);
        assert_eq!(DEF_API_URL, cfg.api_url);
        assert_eq!(FailurePolicy::StopAtGap, cfg.on_error);
        Ok(())
    }

    #[test]
    fn test_config_bad_version() -> Result<()> {
        let dir = tempdir()?;
        let fname = dir.path().join("config.hcl");
        fs::write(&fname, "version = 2\n")?;

        assert!(Config::load(fname.to_str()).is_err());
        Ok(())
    }

    #[test]
    fn test_config_env_key() {
        let cfg = Config::default().with_env(Some("bar".to_owned()));
        assert_eq!("bar", cfg.api_key);

        let cfg = Config {
            api_key: "foo".to_owned(),
            ..Default::default()
        }
        .with_env(Some(String::new()));
        assert_eq!("foo", cfg.api_key);
    }
}
