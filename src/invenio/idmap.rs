// Tracks which VAULT items have been migrated, keyed by the item's view url.
use super::InvenioError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStatus {
    #[strum(serialize = "imported")]
    Imported,
    // Owner & collaborators have been applied.
    #[strum(serialize = "adjusted")]
    Adjusted,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IdMapEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub viewlevel: Option<String>,
    pub status: MapStatus,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IdMap {
    entries: BTreeMap<String, IdMapEntry>,
}

impl IdMap {
    // A missing file is an empty map.
    pub fn read(path: &Path) -> Result<Self, InvenioError> {
        if !path.exists() {
            info!("No id map found at {}, creating an empty one", path.display());
            return Ok(IdMap::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| InvenioError::io(path, e))?;
        let entries = serde_json::from_str(&content).map_err(|e| InvenioError::json(path, e))?;
        Ok(IdMap { entries })
    }

    pub fn write(&self, path: &Path) -> Result<(), InvenioError> {
        let content =
            serde_json::to_string_pretty(&self.entries).map_err(|e| InvenioError::json(path, e))?;
        std::fs::write(path, content).map_err(|e| InvenioError::io(path, e))?;
        info!("Wrote id map to {}", path.display());
        Ok(())
    }

    pub fn insert(&mut self, url: &str, entry: IdMapEntry) {
        if self.entries.contains_key(url) {
            warn!("VAULT item {} already in the id map, overwriting", url);
        }
        self.entries.insert(url.to_string(), entry);
    }

    pub fn get(&self, url: &str) -> Option<&IdMapEntry> {
        self.entries.get(url)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut IdMapEntry)> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvenioErrorDiscriminants;

    fn entry(id: &str) -> IdMapEntry {
        IdMapEntry {
            id: id.to_string(),
            title: "Design Book Review 12".to_string(),
            owner: Some("d4a1c8e2-0000-4000-8000-000000000001".to_string()),
            collaborators: vec!["d4a1c8e2-0000-4000-8000-000000000002".to_string()],
            viewlevel: None,
            status: MapStatus::Imported,
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let directory = tempfile::tempdir().unwrap();
        let map = IdMap::read(&directory.path().join("id-map.json")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn written_map_reads_back() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("id-map.json");
        let url = "https://vault.cca.edu/items/ec839536-06f9-4fd2-8a80-42ee8a5cf891/1/";
        let mut map = IdMap::default();
        map.insert(url, entry("first"));
        map.insert(url, entry("second"));
        map.write(&path).unwrap();

        let content: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content[url]["id"], "second");
        assert_eq!(content[url]["status"], "imported");
        assert_eq!(content[url]["viewlevel"], serde_json::Value::Null);

        let read = IdMap::read(&path).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read.get(url), Some(&entry("second")));
        assert_eq!(read, map);
    }

    #[test]
    fn invalid_map() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("id-map.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let err: InvenioErrorDiscriminants = IdMap::read(&path).unwrap_err().into();
        assert_eq!(err, InvenioErrorDiscriminants::JsonError);
    }

    #[test]
    fn status_names() {
        assert_eq!(MapStatus::Adjusted.to_string(), "adjusted");
    }
}
