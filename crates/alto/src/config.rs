//! Configuration file loading and merging with command-line flags.

use std::fs::read_to_string;
use std::io::{Error as IoError, ErrorKind};
use std::path::{self, Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot resolve {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("no format string given; set \"path\" in the config file or pass --path")]
    MissingPath,

    #[error("no destination given; set \"destination\" in the config file or pass --destination")]
    MissingDestination,
}

/// The contents of `config.json`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The format string.
    pub path: Option<String>,
    /// Directory to index.
    pub source: Option<PathBuf>,
    /// Directory to copy into.
    pub destination: Option<PathBuf>,
}

/// Fully resolved settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub format: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// The default config location, `<user config dir>/alto/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("alto").join("config.json"))
}

impl Config {
    /// Parse a config from JSON text.
    pub fn from_json(path: &Path, content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config from `explicit`, or from the default location.
    ///
    /// A missing default config file yields an empty config; a missing
    /// explicit one is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        match read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), "loaded config file");
                Self::from_json(&path, &content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound && !required => {
                debug!(path = %path.display(), "no config file");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    /// Overlay values given on the command line.
    pub fn merge(mut self, overrides: Config) -> Self {
        if overrides.path.is_some() {
            self.path = overrides.path;
        }
        if overrides.source.is_some() {
            self.source = overrides.source;
        }
        if overrides.destination.is_some() {
            self.destination = overrides.destination;
        }
        self
    }

    /// Check required keys and make directories absolute.
    ///
    /// The source defaults to the current directory.
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let format = self
            .path
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingPath)?;
        let destination = self
            .destination
            .filter(|d| !d.as_os_str().is_empty())
            .ok_or(ConfigError::MissingDestination)?;
        let source = self
            .source
            .filter(|s| !s.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Settings {
            format,
            source: absolute(&source)?,
            destination: absolute(&destination)?,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    path::absolute(path).map_err(|source| ConfigError::Resolve {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn parses_all_keys() {
        let config = Config::from_json(
            Path::new("config.json"),
            r#"{ "path": "{%artist%}/%title%", "source": "/in", "destination": "/out" }"#,
        )
        .unwrap();
        assert_eq!(config.path.as_deref(), Some("{%artist%}/%title%"));
        assert_eq!(config.source, Some(PathBuf::from("/in")));
        assert_eq!(config.destination, Some(PathBuf::from("/out")));
    }

    #[test]
    fn missing_keys_are_none() {
        let config = Config::from_json(Path::new("config.json"), "{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = Config::from_json(Path::new("config.json"), "{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        write(&path, r#"{ "path": "x" }"#).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.path.as_deref(), Some("x"));
    }

    #[test]
    fn overrides_replace_only_given_keys() {
        let file = Config {
            path: Some("file".into()),
            source: Some("/in".into()),
            destination: Some("/out".into()),
        };
        let merged = file.merge(Config {
            path: Some("flag".into()),
            ..Config::default()
        });
        assert_eq!(merged.path.as_deref(), Some("flag"));
        assert_eq!(merged.destination, Some(PathBuf::from("/out")));
    }

    #[test]
    fn resolve_requires_path_and_destination() {
        let err = Config::default().resolve().unwrap_err();
        assert!(matches!(err, ConfigError::MissingPath));

        let err = Config {
            path: Some("x".into()),
            ..Config::default()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingDestination));
    }

    #[test]
    fn resolve_makes_paths_absolute() {
        let settings = Config {
            path: Some("x".into()),
            source: None,
            destination: Some("out".into()),
        }
        .resolve()
        .unwrap();
        assert!(settings.source.is_absolute());
        assert!(settings.destination.is_absolute());
        assert!(settings.destination.ends_with("out"));
    }
}
