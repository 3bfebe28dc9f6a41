use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::City;
use crate::error::ConfigError;

/// Where the city datasets live.
///
/// JSON layout (every field optional):
///
/// ```json
/// {
///   "data_dir": "/srv/bikeshare",
///   "cities": { "washington": "washington_2017.parquet" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Per-city file overrides; cities not listed use [`City::default_file`].
    pub cities: BTreeMap<City, PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            cities: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the data file for `city`. Relative entries are joined onto `data_dir`.
    pub fn city_path(&self, city: City) -> PathBuf {
        match self.cities.get(&city) {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => self.data_dir.join(file),
            None => self.data_dir.join(city.default_file()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_paths_use_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/data"),
            ..Config::default()
        };
        assert_eq!(
            config.city_path(City::NewYorkCity),
            PathBuf::from("/data/new_york_city.csv")
        );
    }

    #[test]
    fn load_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bikeshare.json");
        fs::write(
            &path,
            r#"{ "cities": { "washington": "dc.parquet", "chicago": "/abs/chi.csv" } }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.city_path(City::Washington), PathBuf::from("./dc.parquet"));
        assert_eq!(config.city_path(City::Chicago), PathBuf::from("/abs/chi.csv"));
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_malformed_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }
}
