//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for the configuration file of `fviz`.
//! This is a configuration file/struct neutral loading engine, storing only the base directory
//! and with `load()` read the proper file or fall back to defaults.
//!
//! This encapsulates the configuration file, available with `.inner()` or `.into_inner()`.
//!

use std::env;
use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use eyre::{eyre, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::makepath;

/// Config filename
const CONFIG: &str = "config.hcl";

/// Main name for the directory base
const TAG: &str = "fviz";

/// Environment variable pointing to an alternate configuration file
pub const CONFIG_ENV: &str = "FVIZ_CONFIG_FILE";

/// Every configuration struct carries a version number to detect stale files.
///
pub trait Versioned {
    fn version(&self) -> usize;
}

/// Configuration file handle, supposed to include parameters and most importantly the
/// credentials for the remote service.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + Default + DeserializeOwned + Versioned> {
    /// Tag is the project name.
    tag: String,
    /// This is the base directory for all files.
    basedir: PathBuf,
    inner: T,
}

impl<T> ConfigFile<T>
where
    T: Debug + Default + DeserializeOwned + Versioned,
{
    #[tracing::instrument]
    fn new(tag: &str) -> Self {
        let basedir: PathBuf = match BaseDirs::new() {
            Some(base) => {
                #[cfg(unix)]
                let base = base.home_dir().join(".config");

                #[cfg(windows)]
                let base = base.data_local_dir().to_path_buf();

                debug!("base = {base:?}");
                makepath!(base, tag)
            }
            None => makepath!(".", tag),
        };
        ConfigFile {
            tag: String::from(tag),
            basedir,
            inner: T::default(),
        }
    }

    /// Returns the path of the default config directory
    ///
    pub fn config_path(&self) -> PathBuf {
        self.basedir.clone()
    }

    /// Returns the path of the default config file
    ///
    pub fn default_file(&self) -> PathBuf {
        let cfg = self.config_path().join(CONFIG);
        debug!("default = {cfg:?}");
        cfg
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI
    /// - file named by `FVIZ_CONFIG_FILE`
    /// - default basedir (based on $HOME or $LOCALAPPDATA)
    ///
    /// Only the default file may be missing, in which case defaults are used.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&str>, expected: usize) -> Result<ConfigFile<T>> {
        let mut cfg = ConfigFile::<T>::new(TAG);

        let explicit = match fname {
            Some(fname) => Some(PathBuf::from(fname)),
            None => env::var(CONFIG_ENV).ok().map(PathBuf::from),
        };

        let fname = match explicit {
            Some(fname) => {
                if !fname.exists() {
                    return Err(eyre!("Unknown config file {:?}", fname));
                }
                fname
            }
            None => {
                let def = cfg.default_file();
                if !def.exists() {
                    debug!("no {:?}, using defaults", def);
                    return Ok(cfg);
                }
                def
            }
        };

        trace!("Loading config file {fname:?} for {}", cfg.tag);

        let data = fs::read_to_string(&fname)?;
        let data: T = hcl::from_str(&data)?;
        debug!("struct data = {data:?}");

        if data.version() != expected {
            return Err(eyre!(
                "Bad config file version {} in {:?}, expected {}",
                data.version(),
                fname,
                expected
            ));
        }

        cfg.inner = data;
        Ok(cfg)
    }

    /// Return the inner configuration file
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consume the handle and keep the configuration
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}
