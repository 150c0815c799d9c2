//! Config file layer.
//!
//! The file is located from `--config`, then `MYAPP_CONFIG`, then a search of
//! the working directory and the user config directory. A missing file is
//! not an error: resolution continues with flags and environment only.

use super::env::EnvSource;
use super::key::{CanonicalKey, KeySpace};
use super::source::SourceLayer;
use super::value::{Layer, RawValue, Value};
use crate::error::{ConfigError, ConfigResult};
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File names searched for in each search directory, first hit wins.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["config.yaml", "config.yml", "config.json"];

/// Where to look for the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLocation {
    /// Path named by the user via flag or environment variable.
    Explicit(PathBuf),
    /// Candidate paths tried in order.
    Search(Vec<PathBuf>),
}

impl FileLocation {
    /// Decide where the config file lives: flag, then `<PREFIX>_CONFIG`, then search.
    pub fn resolve(flag: Option<&Path>, env: &dyn EnvSource, keys: &KeySpace) -> Self {
        if let Some(path) = flag {
            return FileLocation::Explicit(path.to_path_buf());
        }

        if let Some(path) = env.get(&keys.config_file_var()).filter(|p| !p.is_empty()) {
            return FileLocation::Explicit(PathBuf::from(path));
        }

        FileLocation::Search(Self::search_paths(Path::new("."), keys))
    }

    /// Default candidates: `./config.{yaml,yml,json}`, then
    /// `<user config dir>/<prefix>/config.yaml`.
    pub fn search_paths(dir: &Path, keys: &KeySpace) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = CONFIG_FILE_NAMES.iter().map(|n| dir.join(n)).collect();
        if let Some(user_dir) = dirs::config_dir() {
            paths.push(
                user_dir
                    .join(keys.env_prefix().to_ascii_lowercase())
                    .join(CONFIG_FILE_NAMES[0]),
            );
        }
        paths
    }
}

/// Outcome of trying to read the config file. Purely informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Loaded(PathBuf),
    NotFound,
    /// A discovered file exists but could not be parsed; it was skipped.
    Skipped { path: PathBuf, reason: String },
}

impl FileStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FileStatus::Loaded(_))
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Loaded(path) => write!(f, "Using config file: {}", path.display()),
            FileStatus::NotFound => write!(
                f,
                "No config file found, using flags and environment variables only"
            ),
            FileStatus::Skipped { path, reason } => write!(
                f,
                "Ignoring config file {} ({}), using flags and environment variables only",
                path.display(),
                reason
            ),
        }
    }
}

/// Leaves of a parsed config file, keyed by canonical key.
#[derive(Debug, Clone)]
pub struct FileLayer {
    status: FileStatus,
    leaves: IndexMap<CanonicalKey, Value>,
}

impl FileLayer {
    /// A layer with no file behind it.
    pub fn empty() -> Self {
        Self {
            status: FileStatus::NotFound,
            leaves: IndexMap::new(),
        }
    }

    /// Open the file at `location`.
    ///
    /// An explicit file that exists but cannot be read or parsed is an error.
    /// A discovered file that fails to parse is skipped with a warning.
    pub fn open(location: &FileLocation) -> ConfigResult<Self> {
        match location {
            FileLocation::Explicit(path) => {
                if !path.exists() {
                    info!(path = %path.display(), "Config file not found");
                    return Ok(Self::empty());
                }
                Self::load(path)
            }
            FileLocation::Search(candidates) => {
                let Some(path) = candidates.iter().find(|p| p.is_file()) else {
                    debug!(candidates = candidates.len(), "No config file discovered");
                    return Ok(Self::empty());
                };
                match Self::load(path) {
                    Ok(layer) => Ok(layer),
                    Err(e) => {
                        warn!(
                            "Failed to parse auto-discovered config {}: {}",
                            path.display(),
                            e
                        );
                        Ok(Self {
                            status: FileStatus::Skipped {
                                path: path.clone(),
                                reason: e.to_string(),
                            },
                            leaves: IndexMap::new(),
                        })
                    }
                }
            }
        }
    }

    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut layer = Self::parse(&content, path)?;
        info!(path = %path.display(), keys = layer.leaves.len(), "Loaded config file");
        layer.status = FileStatus::Loaded(path.to_path_buf());
        Ok(layer)
    }

    /// Parse YAML or JSON content. `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> ConfigResult<Self> {
        let parse_error = |reason: String| ConfigError::FileParse {
            path: path.to_path_buf(),
            reason,
        };

        // JSON is a YAML subset, so one parser covers both formats.
        // Empty or comment-only documents parse as null.
        let raw: Option<serde_json::Value> =
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

        let mut leaves = IndexMap::new();
        match raw.and_then(Value::from_json) {
            None => {}
            Some(Value::Map(root)) => flatten_into(&mut leaves, &[], root)?,
            Some(other) => {
                return Err(parse_error(format!(
                    "top-level value must be a mapping, found {}",
                    other.type_name()
                )));
            }
        }

        Ok(Self {
            status: FileStatus::NotFound,
            leaves,
        })
    }

    pub fn status(&self) -> &FileStatus {
        &self.status
    }

    /// Path of the file that was read, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.status {
            FileStatus::Loaded(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.status.is_loaded()
    }
}

/// Record every leaf under `map`. Non-empty mappings are descended into;
/// scalars, lists and empty mappings are leaves.
fn flatten_into(
    leaves: &mut IndexMap<CanonicalKey, Value>,
    prefix: &[String],
    map: IndexMap<String, Value>,
) -> ConfigResult<()> {
    for (name, value) in map {
        let mut path = prefix.to_vec();
        path.push(name);
        match value {
            Value::Map(children) if !children.is_empty() => {
                flatten_into(leaves, &path, children)?;
            }
            leaf => {
                leaves.insert(CanonicalKey::from_segments(&path)?, leaf);
            }
        }
    }
    Ok(())
}

impl SourceLayer for FileLayer {
    fn layer(&self) -> Layer {
        Layer::File
    }

    fn keys(&self) -> Vec<CanonicalKey> {
        self.leaves.keys().cloned().collect()
    }

    fn lookup(&self, key: &CanonicalKey) -> Option<RawValue> {
        self.leaves.get(key).cloned().map(RawValue::file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::MapEnv;
    use tempfile::TempDir;

    fn key(path: &str) -> CanonicalKey {
        CanonicalKey::parse(path).unwrap()
    }

    #[test]
    fn test_parse_flattens_to_leaves() {
        let content = r#"
server:
  host: localhost
  port: 8080
features:
  flags:
    beta: true
  tags: [a, b]
"#;
        let layer = FileLayer::parse(content, Path::new("config.yaml")).unwrap();
        let keys: Vec<String> = layer.keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            vec!["server.host", "server.port", "features.flags.beta", "features.tags"]
        );
        assert_eq!(
            layer.lookup(&key("server.port")).unwrap().value,
            Value::Integer(8080)
        );
        assert!(layer.lookup(&key("server")).is_none());
    }

    #[test]
    fn test_parse_json_content() {
        let layer =
            FileLayer::parse(r#"{"app": {"name": "Demo"}}"#, Path::new("config.json")).unwrap();
        assert_eq!(layer.lookup(&key("app.name")).unwrap().value, Value::from("Demo"));
    }

    #[test]
    fn test_parse_lowercases_keys() {
        let layer = FileLayer::parse("Server:\n  Port: 1\n", Path::new("c.yaml")).unwrap();
        assert!(layer.lookup(&key("server.port")).is_some());
    }

    #[test]
    fn test_parse_empty_document() {
        let layer = FileLayer::parse("# nothing here\n", Path::new("c.yaml")).unwrap();
        assert!(layer.keys().is_empty());
    }

    #[test]
    fn test_parse_rejects_scalar_root() {
        let err = FileLayer::parse("42\n", Path::new("c.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileParse { .. }));
    }

    #[test]
    fn test_dotted_file_key_is_invalid() {
        let err = FileLayer::parse("features:\n  \"a.b\": 1\n", Path::new("c.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKey { .. }));
    }

    #[test]
    fn test_open_missing_explicit_file_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let location = FileLocation::Explicit(tmp.path().join("missing.yaml"));
        let layer = FileLayer::open(&location).unwrap();
        assert_eq!(layer.status(), &FileStatus::NotFound);
        assert!(layer.path().is_none());
    }

    #[test]
    fn test_open_invalid_explicit_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.yaml");
        std::fs::write(&path, "server: [unclosed\n").unwrap();
        let result = FileLayer::open(&FileLocation::Explicit(path));
        assert!(matches!(result, Err(ConfigError::FileParse { .. })));
    }

    #[test]
    fn test_open_invalid_discovered_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "server: [unclosed\n").unwrap();
        let layer = FileLayer::open(&FileLocation::Search(vec![path.clone()])).unwrap();
        assert!(matches!(layer.status(), FileStatus::Skipped { path: p, .. } if *p == path));
        assert!(layer.keys().is_empty());
    }

    #[test]
    fn test_search_takes_first_existing_candidate() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.yml"), "app:\n  name: yml\n").unwrap();
        std::fs::write(tmp.path().join("config.json"), r#"{"app": {"name": "json"}}"#).unwrap();

        let paths = FileLocation::search_paths(tmp.path(), &KeySpace::default());
        let layer = FileLayer::open(&FileLocation::Search(paths)).unwrap();
        assert_eq!(layer.path(), Some(tmp.path().join("config.yml").as_path()));
        assert_eq!(layer.lookup(&key("app.name")).unwrap().value, Value::from("yml"));
    }

    #[test]
    fn test_location_precedence() {
        let keys = KeySpace::default();
        let env = MapEnv::from_pairs([("MYAPP_CONFIG", "/etc/myapp.yaml")]);

        let from_flag = FileLocation::resolve(Some(Path::new("flag.yaml")), &env, &keys);
        assert_eq!(from_flag, FileLocation::Explicit(PathBuf::from("flag.yaml")));

        let from_env = FileLocation::resolve(None, &env, &keys);
        assert_eq!(from_env, FileLocation::Explicit(PathBuf::from("/etc/myapp.yaml")));

        let searched = FileLocation::resolve(None, &MapEnv::default(), &keys);
        assert!(matches!(searched, FileLocation::Search(paths) if paths[0].ends_with("config.yaml")));
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            FileStatus::NotFound.to_string(),
            "No config file found, using flags and environment variables only"
        );
        assert_eq!(
            FileStatus::Loaded(PathBuf::from("config.yaml")).to_string(),
            "Using config file: config.yaml"
        );
    }
}
