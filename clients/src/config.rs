//! Configuration file.
//!
//! Every field is optional; a missing file means all defaults.
//!
//! ```toml
//! default_data_id = 0
//!
//! [data_ids]
//! HEARTBEAT_DATA_ID = 2
//!
//! [analysis]
//! boundary = "nearest-wrap"
//!
//! [remote]
//! user = "root"
//! host = "arty.local"
//! path = "output.txt"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gttcan_conformance::AnalysisOptions;
use gttcan_schedule::{DataIdMap, GENERIC_DATA_ID, REFERENCE_FRAME_DATA_ID};
use serde::Deserialize;
use tracing::debug;

/// The configuration file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Where the capture lives on the target board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    /// Login user on the board.
    pub user: String,
    /// Board host name.
    pub host: String,
    /// Trace path on the board.
    pub path: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            host: "arty.local".to_string(),
            path: "output.txt".to_string(),
        }
    }
}

impl RemoteConfig {
    /// The `user@host:path` source argument for `scp`.
    #[must_use]
    pub fn scp_source(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.path)
    }
}

/// Contents of `gttcan.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Code for data id symbols that are neither built in nor in `data_ids`.
    pub default_data_id: u16,
    /// Extra symbolic data ids, added to the built-in ones.
    pub data_ids: BTreeMap<String, u16>,
    /// Analysis tuning.
    pub analysis: AnalysisOptions,
    /// Remote capture location.
    pub remote: RemoteConfig,
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the text is malformed or has unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Reads `path` if given, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Config::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Symbol table for the schedule loader: the built-in symbols, then the
    /// configured ones, falling back to `default_data_id`.
    #[must_use]
    pub fn data_id_map(&self) -> DataIdMap {
        let mut map = DataIdMap::new(self.default_data_id)
            .with("REFERENCE_FRAME_DATA_ID", REFERENCE_FRAME_DATA_ID)
            .with("GENERIC_DATA_ID", GENERIC_DATA_ID);
        for (symbol, &code) in &self.data_ids {
            map.insert(symbol.clone(), code);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gttcan_conformance::BoundaryRule;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.analysis.boundary, BoundaryRule::NearestWrap);
        assert_eq!(config.remote.scp_source(), "root@arty.local:output.txt");
        assert_eq!(config.data_id_map(), DataIdMap::default());
    }

    #[test]
    fn full_file_overrides_defaults() {
        let config = Config::from_toml(
            r#"
default_data_id = 7

[data_ids]
HEARTBEAT_DATA_ID = 2
GENERIC_DATA_ID = 5

[analysis]
boundary = "any-decrease"

[remote]
host = "bench-rig"
"#,
        )
        .unwrap();
        assert_eq!(config.analysis.boundary, BoundaryRule::AnyDecrease);
        assert_eq!(config.remote.scp_source(), "root@bench-rig:output.txt");

        let map = config.data_id_map();
        assert_eq!(map.get("HEARTBEAT_DATA_ID"), Some(2));
        assert_eq!(map.get("GENERIC_DATA_ID"), Some(5));
        assert_eq!(map.get("REFERENCE_FRAME_DATA_ID"), Some(0));
        assert_eq!(map.default_code(), 7);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("verbosity = 3").is_err());
        assert!(Config::from_toml("[analysis]\nboundary = \"sideways\"").is_err());
    }

    #[test]
    fn load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("gttcan.toml");
        std::fs::write(&good, "[remote]\nuser = \"pi\"\n").unwrap();
        assert_eq!(Config::load(&good).unwrap().remote.user, "pi");

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "default_data_id = \"zero\"").unwrap();
        let err = Config::load(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));

        assert!(matches!(
            Config::load_or_default(Some(&dir.path().join("absent.toml"))),
            Err(ConfigError::Io { .. })
        ));
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }
}
