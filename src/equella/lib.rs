// EQUELLA item exports: the item JSON and the MODS XML embedded in it.
// @see https://equella.github.io/
#[macro_use]
extern crate strum_macros;

mod item;
mod xml;

pub use item::{find_items, is_item_file, Attachment, Collection, Item, Links, UserReference};
pub use xml::Element;

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, EnumDiscriminants)]
pub enum EquellaError {
    IOError(PathBuf, std::io::Error), // Could not read file.
    JsonError(serde_path_to_error::Error<serde_json::Error>), // Item JSON did not match the expected shape.
    QuickXMLError(quick_xml::Error), // Wrap QuickXML error.
    Utf8Error(std::str::Utf8Error),  // Could not decode byte string into utf8.
    EmptyDocument,                   // Metadata contained no root element.
}

impl EquellaError {
    pub fn io(path: &Path, error: std::io::Error) -> Self {
        EquellaError::IOError(path.to_path_buf(), error)
    }
}

impl fmt::Display for EquellaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquellaError::IOError(path, error) => {
                write!(f, "Failed to read {}: {}", path.display(), error)
            }
            EquellaError::JsonError(error) => write!(
                f,
                "Invalid item JSON at '{}': {}",
                error.path(),
                error.inner()
            ),
            EquellaError::QuickXMLError(error) => write!(f, "Invalid metadata XML: {}", error),
            EquellaError::Utf8Error(error) => write!(f, "Invalid UTF-8 in metadata: {}", error),
            EquellaError::EmptyDocument => write!(f, "Metadata XML has no root element"),
        }
    }
}

impl std::error::Error for EquellaError {}

impl From<serde_path_to_error::Error<serde_json::Error>> for EquellaError {
    fn from(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        EquellaError::JsonError(error)
    }
}

impl From<quick_xml::Error> for EquellaError {
    fn from(error: quick_xml::Error) -> Self {
        EquellaError::QuickXMLError(error)
    }
}

impl From<std::str::Utf8Error> for EquellaError {
    fn from(error: std::str::Utf8Error) -> Self {
        EquellaError::Utf8Error(error)
    }
}
