use super::{Element, EquellaError};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

// Items are addressed by uuid & version in the old repository ("VAULT").
static VAULT_ITEMS_URL: &str = "https://vault.cca.edu/items";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UserReference {
    pub id: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Links {
    #[serde(default)]
    pub view: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Collection {
    pub uuid: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl Attachment {
    // Other attachment types are links, youtube videos, etc.
    pub fn is_file(&self) -> bool {
        self.r#type == "file"
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    // MODS XML serialized as a string, rooted at <xml>. Required, other JSON
    // files (subject maps, id maps) lack it.
    pub metadata: String,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub owner: Option<UserReference>,
    #[serde(default)]
    pub collaborators: Vec<UserReference>,
    #[serde(default)]
    pub links: Option<Links>,
    #[serde(default)]
    pub collection: Option<Collection>,
}

impl Item {
    pub fn from_str(content: &str) -> Result<Self, EquellaError> {
        let deserializer = &mut serde_json::Deserializer::from_str(content);
        Ok(serde_path_to_error::deserialize(deserializer)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, EquellaError> {
        let content = std::fs::read_to_string(path).map_err(|e| EquellaError::io(path, e))?;
        Self::from_str(&content)
    }

    // Bare metadata exported without the surrounding item JSON.
    pub fn from_xml(content: String) -> Self {
        Item {
            metadata: content,
            ..Item::default()
        }
    }

    // Parsed metadata, always rooted at an <xml> element.
    pub fn xml(&self) -> Result<Element, EquellaError> {
        if self.metadata.trim().is_empty() {
            return Ok(Element {
                name: "xml".to_string(),
                ..Element::default()
            });
        }
        let root = Element::parse(&self.metadata)?;
        if root.name == "xml" {
            Ok(root)
        } else {
            debug!("Wrapping <{}> metadata in an <xml> root", root.name);
            Ok(Element {
                name: "xml".to_string(),
                children: vec![root],
                ..Element::default()
            })
        }
    }

    pub fn file_attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.attachments.iter().filter(|a| a.is_file())
    }

    pub fn vault_url(&self) -> Option<String> {
        match (&self.uuid, &self.version) {
            (Some(uuid), Some(version)) => {
                Some(format!("{}/{}/{}/", VAULT_ITEMS_URL, uuid, version))
            }
            _ => None,
        }
    }

    // Key used to track the item across migration runs.
    pub fn view_url(&self) -> Option<String> {
        self.links
            .as_ref()
            .and_then(|links| links.view.clone())
            .or_else(|| self.vault_url())
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map_or(false, |e| e.to_string_lossy().eq_ignore_ascii_case(extension))
}

pub fn is_item_file(path: &Path) -> bool {
    has_extension(path, "json") || has_extension(path, "xml")
}

// A single item, a search result page ({"results": [...]}) or a list of items.
fn items_from_json(content: &str) -> Result<Vec<Item>, EquellaError> {
    let deserializer = &mut serde_json::Deserializer::from_str(content);
    let value: Value = serde_path_to_error::deserialize(deserializer)?;
    let values = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => vec![Value::Object(map)],
        },
        other => vec![other],
    };
    values
        .into_iter()
        .filter(|value| {
            let is_item = value.get("metadata").is_some();
            if !is_item {
                debug!("Skipping JSON value without item metadata");
            }
            is_item
        })
        .map(|value| Ok(serde_path_to_error::deserialize(value)?))
        .collect()
}

// Items in an item JSON, search results JSON, or XML metadata file.
pub fn find_items(path: &Path) -> Result<Vec<Item>, EquellaError> {
    let content = std::fs::read_to_string(path).map_err(|e| EquellaError::io(path, e))?;
    if has_extension(path, "xml") {
        Ok(vec![Item::from_xml(content)])
    } else {
        let items = items_from_json(&content)?;
        if items.is_empty() {
            warn!("No EQUELLA items in {}", path.display());
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EquellaErrorDiscriminants;
    use std::path::PathBuf;
    use std::str::FromStr;

    // Helper to get the fixtures directory.
    fn fixtures_directory() -> PathBuf {
        let manifest_directory = PathBuf::from_str(&env!("CARGO_MANIFEST_DIR")).unwrap();
        let root_directory = manifest_directory.parent().unwrap().parent().unwrap();
        let mut buf = PathBuf::from(&root_directory);
        buf.push("assets/fixtures");
        buf
    }

    #[test]
    fn single_item() {
        let items = find_items(&fixtures_directory().join("item.json")).unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.name.as_deref(), Some("Design Book Review 12"));
        assert_eq!(item.version, Some(1));
        assert_eq!(item.file_attachments().count(), 2);
        assert_eq!(item.owner.as_ref().unwrap().id, "d4a1c8e2-0000-4000-8000-000000000001");
        assert_eq!(
            item.view_url().as_deref(),
            Some("https://vault.cca.edu/items/ec839536-06f9-4fd2-8a80-42ee8a5cf891/1/")
        );
        let xml = item.xml().unwrap();
        assert_eq!(xml.name, "xml");
        assert!(xml.child("mods").is_some());
    }

    #[test]
    fn search_results() {
        let content = r#"{"start": 0, "length": 2, "results": [
            {"uuid": "a", "version": 1, "metadata": "<xml/>"},
            {"uuid": "b", "version": 2, "name": "B", "metadata": ""}
        ]}"#;
        let items = items_from_json(content).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name.as_deref(), Some("B"));
        assert_eq!(
            items[1].vault_url().as_deref(),
            Some("https://vault.cca.edu/items/b/2/")
        );
    }

    #[test]
    fn list_of_items() {
        let items =
            items_from_json(r#"[{"name": "a", "metadata": ""}, {"metadata": ""}]"#).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], Item::default());
        assert_eq!(items[1].vault_url(), None);
    }

    #[test]
    fn xml_metadata_file() {
        let items = find_items(&fixtures_directory().join("metadata.xml")).unwrap();
        assert_eq!(items.len(), 1);
        let xml = items[0].xml().unwrap();
        assert_eq!(xml.text_at(&["mods", "abstract"]), Some("An exhibition catalog."));
    }

    #[test]
    fn bare_mods_is_wrapped() {
        let item = Item::from_xml("<mods><abstract>foo</abstract></mods>".to_string());
        let xml = item.xml().unwrap();
        assert_eq!(xml.name, "xml");
        assert_eq!(xml.text_at(&["mods", "abstract"]), Some("foo"));
        assert!(Item::default().xml().unwrap().children.is_empty());
    }

    #[test]
    fn attachment_types() {
        let item = Item::from_str(
            r#"{"metadata": "", "attachments": [{"type": "file", "filename": "a.pdf"}, {"type": "url"}]}"#,
        )
        .unwrap();
        assert_eq!(item.attachments.len(), 2);
        assert_eq!(item.file_attachments().count(), 1);
    }

    #[test]
    fn invalid_item_shape() {
        let result = Item::from_str(r#"{"metadata": "", "attachments": [{"filename": "a.pdf"}]}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("attachments[0]"));
        let err: EquellaErrorDiscriminants = err.into();
        assert_eq!(err, EquellaErrorDiscriminants::JsonError);
    }

    #[test]
    fn other_json_files_have_no_items() {
        let fixtures = fixtures_directory();
        assert!(find_items(&fixtures.join("subjects_map.json")).unwrap().is_empty());
        assert!(find_items(&fixtures.join("users.json")).unwrap().is_empty());
        let result = Item::from_str(r#"{"name": "Not an item"}"#);
        let err: EquellaErrorDiscriminants = result.unwrap_err().into();
        assert_eq!(err, EquellaErrorDiscriminants::JsonError);
    }

    #[test]
    fn invalid_path() {
        let result = find_items(&fixtures_directory().join("non-existent.json"));
        let err: EquellaErrorDiscriminants = result.unwrap_err().into();
        assert_eq!(err, EquellaErrorDiscriminants::IOError);
    }
}
