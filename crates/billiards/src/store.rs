//! On-disk persistence for point sets and their known-cycle registries.
//!
//! Layout under the root directory:
//! - `pointset/<name>/points.json`: metadata plus the ordered apexes.
//! - `pointset/<name>/cycles.json`: `{ "<index>": [turn, ...], ... }`.
//!
//! Writes go to a sibling temp file that is renamed over the target, so a
//! failed save never leaves a half-written file behind.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::point_set::{Metadata, PointSet};
use crate::search::Registry;

const POINTSET_DIR: &str = "pointset";
const POINTS_FILE: &str = "points.json";
const CYCLES_FILE: &str = "cycles.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("point set `{0}` not found")]
    NotFound(String),
    #[error("invalid point set name `{0}`")]
    InvalidName(String),
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Only the metadata of `points.json`, for listings.
#[derive(Deserialize)]
struct MetadataOnly {
    #[serde(default)]
    metadata: Metadata,
}

/// File-backed store rooted at a data directory.
#[derive(Clone, Debug)]
pub struct DataManager {
    root: PathBuf,
}

impl DataManager {
    /// Opens (and creates if needed) the store at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let sets = root.join(POINTSET_DIR);
        fs::create_dir_all(&sets).map_err(|e| StoreError::io(&sets, e))?;
        Ok(Self { root })
    }

    /// Directory holding `name`'s files; rejects names that would escape the store.
    pub fn point_set_dir(&self, name: &str) -> Result<PathBuf, StoreError> {
        let bad = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\']);
        if bad {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(POINTSET_DIR).join(name))
    }

    pub fn save_point_set(&self, set: &PointSet, name: &str) -> Result<(), StoreError> {
        let dir = self.point_set_dir(name)?;
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        write_json(&dir.join(POINTS_FILE), set)?;
        tracing::info!(name, count = set.len(), "saved point set");
        Ok(())
    }

    pub fn load_point_set(&self, name: &str) -> Result<PointSet, StoreError> {
        let path = self.point_set_dir(name)?.join(POINTS_FILE);
        read_json(&path)?.ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// All stored point sets with their metadata, keyed by name.
    pub fn list_point_sets(&self) -> Result<BTreeMap<String, Metadata>, StoreError> {
        let sets = self.root.join(POINTSET_DIR);
        let entries = fs::read_dir(&sets).map_err(|e| StoreError::io(&sets, e))?;
        let mut out = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&sets, e))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let points = entry.path().join(POINTS_FILE);
            if let Some(meta) = read_json::<MetadataOnly>(&points)? {
                out.insert(name, meta.metadata);
            }
        }
        Ok(out)
    }

    /// Removes the point set and its registry.
    pub fn delete_point_set(&self, name: &str) -> Result<(), StoreError> {
        let dir = self.point_set_dir(name)?;
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(StoreError::io(&dir, e)),
        }
    }

    /// Known cycles for `name`; a missing registry file is an empty registry.
    pub fn load_known_cycles(&self, name: &str) -> Result<Registry, StoreError> {
        let path = self.point_set_dir(name)?.join(CYCLES_FILE);
        Ok(read_json(&path)?.unwrap_or_default())
    }

    pub fn save_known_cycles(&self, cycles: &Registry, name: &str) -> Result<(), StoreError> {
        let dir = self.point_set_dir(name)?;
        if !dir.join(POINTS_FILE).exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        write_json(&dir.join(CYCLES_FILE), cycles)?;
        tracing::info!(name, known = cycles.len(), "saved known cycles");
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StoreError::json(path, e))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| StoreError::json(path, e))?;
    let tmp = path.with_extension("json.tmp");
    let written = fs::write(&tmp, bytes)
        .map_err(|e| StoreError::io(&tmp, e))
        .and_then(|()| fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e)));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}
