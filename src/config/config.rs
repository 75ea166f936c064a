use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::tree::{ListingOptions, VCS_DIRECTORY_NAME};

const CONFIG_FILE_NAME: &str = "pinnote.yaml";
const DEFAULT_STATE_FILE: &str = ".pinnote/state.bincode";

/// User settings for the explorer, read from `pinnote.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Entry names hidden from every listing.
    pub exclude: Vec<String>,
    /// Sort children by label instead of keeping the filesystem order.
    pub sort: bool,
    /// Where deleted entries are moved to instead of the platform trash.
    pub trash_dir: Option<PathBuf>,
    pub state_file: PathBuf,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            exclude: vec![VCS_DIRECTORY_NAME.to_string()],
            sort: true,
            trash_dir: None,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl ExplorerConfig {
    pub fn default_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    /// Reads the config file at `path`. A missing file means default settings.
    pub async fn read(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading config file: {}", path.display());
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).context(ReadSnafu { path });
            }
        };
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu { path })?;
        contents.as_str().try_into()
    }

    pub fn listing_options(&self) -> ListingOptions {
        ListingOptions {
            exclude: self.exclude.clone(),
            sort: self.sort,
        }
    }

    fn parse_exclude(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Option<Vec<String>>, ConfigError> {
        let Some(value) = lookup(top_level, "exclude") else {
            return Ok(None);
        };

        value
            .as_sequence()
            .context(InvalidValueSnafu {
                key: "exclude",
                expected: "a list of names",
            })?
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .context(InvalidValueSnafu {
                        key: "exclude",
                        expected: "a list of names",
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn parse_sort(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Option<bool>, ConfigError> {
        match lookup(top_level, "sort") {
            None => Ok(None),
            Some(Yaml::Value(Scalar::Boolean(sort))) => Ok(Some(*sort)),
            Some(_) => InvalidValueSnafu {
                key: "sort",
                expected: "true or false",
            }
            .fail(),
        }
    }

    fn parse_path(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
    ) -> Result<Option<PathBuf>, ConfigError> {
        match lookup(top_level, key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|s| Some(PathBuf::from(s)))
                .context(InvalidValueSnafu {
                    key,
                    expected: "a path",
                }),
        }
    }
}

/// Looks up a top-level key; explicit nulls count as absent.
fn lookup<'a, 'input>(
    top_level: &'a LinkedHashMap<Yaml<'input>, Yaml<'input>>,
    key: &'static str,
) -> Option<&'a Yaml<'input>> {
    top_level
        .get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
        .filter(|value| !matches!(value, Yaml::Value(Scalar::Null)))
}

impl TryFrom<&str> for ExplorerConfig {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };
        if matches!(document, Yaml::Value(Scalar::Null)) {
            return Ok(Self::default());
        }

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;
        let defaults = Self::default();

        Ok(ExplorerConfig {
            exclude: Self::parse_exclude(top_level)?.unwrap_or(defaults.exclude),
            sort: Self::parse_sort(top_level)?.unwrap_or(defaults.sort),
            trash_dir: Self::parse_path(top_level, "trash_dir")?,
            state_file: Self::parse_path(top_level, "state_file")?
                .unwrap_or(defaults.state_file),
        })
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Config file {} is not valid UTF-8", path.display()))]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config key '{}' should be {}", key, expected))]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn empty_config_uses_defaults() {
        let config: ExplorerConfig = "".try_into().unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.exclude, vec![".git".to_string()]);
        assert!(config.sort);
    }

    #[test]
    fn reads_every_key() {
        let yaml = r#"
exclude:
  - .git
  - node_modules
sort: false
trash_dir: /home/me/.pinnote-trash
state_file: /tmp/pinnote.state
"#;
        let config: ExplorerConfig = yaml.try_into().unwrap();

        assert_eq!(config.exclude, vec![".git", "node_modules"]);
        assert!(!config.sort);
        assert_eq!(
            config.trash_dir,
            Some(PathBuf::from("/home/me/.pinnote-trash"))
        );
        assert_eq!(config.state_file, PathBuf::from("/tmp/pinnote.state"));
        assert_eq!(
            config.listing_options(),
            ListingOptions {
                exclude: vec![".git".to_string(), "node_modules".to_string()],
                sort: false,
            }
        );
    }

    #[test]
    fn empty_exclude_list_shows_everything() {
        let config: ExplorerConfig = "exclude: []".try_into().unwrap();
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn null_values_fall_back_to_defaults() {
        let config: ExplorerConfig = "trash_dir:\nsort: ~".try_into().unwrap();
        assert_eq!(config, ExplorerConfig::default());
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let result: Result<ExplorerConfig, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[rstest]
    #[case("- item1\n- item2")]
    #[case("just a string")]
    fn top_level_must_be_a_map(#[case] yaml: &str) {
        let result: Result<ExplorerConfig, _> = yaml.try_into();
        assert!(matches!(result, Err(ConfigError::TopLevelNotMap)));
    }

    #[rstest]
    #[case("exclude: .git", "exclude")]
    #[case("exclude:\n  - [nested]", "exclude")]
    #[case("sort: sometimes", "sort")]
    #[case("trash_dir: [a, b]", "trash_dir")]
    #[case("state_file: {a: b}", "state_file")]
    fn wrongly_typed_values_are_rejected(#[case] yaml: &str, #[case] bad_key: &str) {
        let result: Result<ExplorerConfig, _> = yaml.try_into();
        match result {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, bad_key),
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[compio::test]
    async fn missing_file_means_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = ExplorerConfig::read(&temp_dir.path().join(CONFIG_FILE_NAME))
            .await
            .unwrap();
        assert_eq!(config, ExplorerConfig::default());
    }

    #[compio::test]
    async fn reads_config_from_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "sort: false\n").unwrap();

        let config = ExplorerConfig::read(&path).await.unwrap();

        assert!(!config.sort);
    }

    #[compio::test]
    async fn reading_a_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = ExplorerConfig::read(temp_dir.path()).await;
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
