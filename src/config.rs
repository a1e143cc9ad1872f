//! Dataset catalog: maps dataset identifiers to CSV files on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable consulted for the data directory when none is given.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

const DEFAULT_DATASETS: &[(&str, &str)] = &[
    ("chicago", "chicago.csv"),
    ("new york city", "new_york_city.csv"),
    ("washington", "washington.csv"),
];

/// Identifier → file lookup, resolved against a data directory.
///
/// A custom catalog is stored as a plain JSON object:
/// ```json
/// {
///   "chicago": "chicago.csv",
///   "boston": "/srv/bikeshare/boston_2017.csv"
/// }
/// ```
/// Relative paths are resolved against the data directory.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    data_dir: PathBuf,
    entries: BTreeMap<String, PathBuf>,
}

impl DatasetCatalog {
    /// The three cities shipped with the original trip logs.
    pub fn with_defaults(data_dir: impl Into<PathBuf>) -> Self {
        let entries = DEFAULT_DATASETS
            .iter()
            .map(|(id, file)| (id.to_string(), PathBuf::from(file)))
            .collect();
        Self {
            data_dir: data_dir.into(),
            entries,
        }
    }

    /// Loads the catalog from a JSON file at `path`.
    pub fn load(path: &Path, data_dir: impl Into<PathBuf>) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: BTreeMap<String, PathBuf> = serde_json::from_str(&content)?;
        let entries = raw
            .into_iter()
            .map(|(id, file)| (normalize_id(&id), file))
            .collect();
        Ok(Self {
            data_dir: data_dir.into(),
            entries,
        })
    }

    /// Picks the data directory: explicit flag, then `BIKESHARE_DATA_DIR`, then `.`.
    pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Returns the file path for `dataset_id`.
    pub fn path_for(&self, dataset_id: &str) -> Result<PathBuf> {
        let id = normalize_id(dataset_id);
        self.entries
            .get(&id)
            .map(|file| self.data_dir.join(file))
            .ok_or_else(|| Error::DatasetNotFound {
                id: dataset_id.to_string(),
                known: self.ids().map(str::to_string).collect(),
            })
    }

    pub fn contains(&self, dataset_id: &str) -> bool {
        self.entries.contains_key(&normalize_id(dataset_id))
    }

    /// Iterates over all identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over all `(id, resolved path)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PathBuf)> {
        self.entries
            .iter()
            .map(|(id, file)| (id.as_str(), self.data_dir.join(file)))
    }
}

fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}
