// Posts crosswalked records to InvenioRDM & tracks them in an id map.
// @see https://inveniordm.docs.cern.ch/reference/rest_api_index/
#[macro_use]
extern crate strum_macros;

mod adjust;
mod client;
mod config;
mod idmap;
mod import;

pub use adjust::{adjust, UserMap};
pub use client::InvenioClient;
pub use config::Config;
pub use idmap::{IdMap, IdMapEntry, MapStatus};
pub use import::{import_item, ImportOptions};

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, EnumDiscriminants)]
pub enum InvenioError {
    ConfigError(String),                       // Missing token or unusable host.
    CrosswalkError(crosswalk::CrosswalkError), // Item could not be converted.
    EquellaError(equella::EquellaError),       // Item could not be read.
    HttpError(reqwest::Error),                 // Request could not be sent or read.
    IOError(PathBuf, std::io::Error),          // Could not read / write a file.
    JsonError(PathBuf, serde_json::Error),     // File is not the expected JSON.
    StatusError(String, u16, String),          // Non-success response: url, status, body.
    UnexpectedResponse(String),                // Response JSON lacks a required field.
}

impl InvenioError {
    pub fn io(path: &Path, error: std::io::Error) -> Self {
        InvenioError::IOError(path.to_path_buf(), error)
    }

    pub fn json(path: &Path, error: serde_json::Error) -> Self {
        InvenioError::JsonError(path.to_path_buf(), error)
    }
}

impl fmt::Display for InvenioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvenioError::ConfigError(message) => write!(f, "{}", message),
            InvenioError::CrosswalkError(error) => write!(f, "{}", error),
            InvenioError::EquellaError(error) => write!(f, "{}", error),
            InvenioError::HttpError(error) => write!(f, "HTTP request failed: {}", error),
            InvenioError::IOError(path, error) => write!(f, "{}: {}", path.display(), error),
            InvenioError::JsonError(path, error) => {
                write!(f, "Invalid JSON in {}: {}", path.display(), error)
            }
            InvenioError::StatusError(url, status, body) => {
                write!(f, "HTTP {} {}\n{}", status, url, body)
            }
            InvenioError::UnexpectedResponse(message) => {
                write!(f, "Unexpected response: {}", message)
            }
        }
    }
}

impl std::error::Error for InvenioError {}

impl From<crosswalk::CrosswalkError> for InvenioError {
    fn from(error: crosswalk::CrosswalkError) -> Self {
        InvenioError::CrosswalkError(error)
    }
}

impl From<equella::EquellaError> for InvenioError {
    fn from(error: equella::EquellaError) -> Self {
        InvenioError::EquellaError(error)
    }
}

impl From<reqwest::Error> for InvenioError {
    fn from(error: reqwest::Error) -> Self {
        InvenioError::HttpError(error)
    }
}
