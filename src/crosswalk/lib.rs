// Crosswalk from EQUELLA items (MODS XML + item JSON) to InvenioRDM records.
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate strum_macros;

mod creators;
mod dates;
pub mod maps;
mod names;
mod record;
mod schema;
mod subjects;

pub use dates::to_edtf;
pub use names::{parse_name, ParsedName};
pub use record::Record;
pub use schema::*;
pub use subjects::{find_subjects, Subject, SubjectKind, SubjectMap};

use equella::Element;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, EnumDiscriminants)]
pub enum CrosswalkError {
    EquellaError(equella::EquellaError), // Item or metadata could not be read.
    IOError(PathBuf, std::io::Error),    // Could not read a lookup file.
    JsonError(PathBuf, serde_json::Error), // Lookup file is not the expected JSON.
    UnexpectedNameStructure(String),     // mods/name combines fields that cannot coexist.
    UnparseableName(String),             // Name text mixes people and organizations.
}

impl fmt::Display for CrosswalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrosswalkError::EquellaError(error) => write!(f, "{}", error),
            CrosswalkError::IOError(path, error) => {
                write!(f, "Failed to read {}: {}", path.display(), error)
            }
            CrosswalkError::JsonError(path, error) => {
                write!(f, "Invalid JSON in {}: {}", path.display(), error)
            }
            CrosswalkError::UnexpectedNameStructure(name) => {
                write!(f, "Unexpected mods/name structure: {}", name)
            }
            CrosswalkError::UnparseableName(name) => write!(
                f,
                "Found both people and organizations in namePart \"{}\"",
                name
            ),
        }
    }
}

impl std::error::Error for CrosswalkError {}

impl From<equella::EquellaError> for CrosswalkError {
    fn from(error: equella::EquellaError) -> Self {
        CrosswalkError::EquellaError(error)
    }
}
