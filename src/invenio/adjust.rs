// Applies VAULT ownership & sharing to records after they are imported.
use super::{IdMap, InvenioClient, InvenioError, MapStatus};
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

// EQUELLA user ids => Invenio usernames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserMap {
    users: HashMap<String, String>,
}

impl UserMap {
    pub fn from_path(path: &Path) -> Result<Self, InvenioError> {
        let content = std::fs::read_to_string(path).map_err(|e| InvenioError::io(path, e))?;
        let users = serde_json::from_str(&content).map_err(|e| InvenioError::json(path, e))?;
        Ok(UserMap { users })
    }

    pub fn username(&self, equella_id: &str) -> Option<&str> {
        self.users.get(equella_id).map(String::as_str)
    }
}

// Invenio user id for an EQUELLA user id.
fn invenio_user(
    client: &InvenioClient,
    users: &UserMap,
    equella_id: &str,
) -> Result<Option<String>, InvenioError> {
    let username = match users.username(equella_id) {
        Some(username) => username,
        None => {
            warn!("EQUELLA user {} is not in the users map", equella_id);
            return Ok(None);
        }
    };
    let id = client.find_user(username)?;
    if id.is_none() {
        warn!("No Invenio account for {}", username);
    }
    Ok(id)
}

// Adjusts every imported record & returns how many were adjusted.
pub fn adjust(client: &InvenioClient, map: &mut IdMap, users: &UserMap) -> Result<usize, InvenioError> {
    let mut adjusted = 0;
    for (url, entry) in map.iter_mut() {
        if entry.status != MapStatus::Imported {
            continue;
        }
        if let Some(owner) = &entry.owner {
            if let Some(user) = invenio_user(client, users, owner)? {
                client.set_owner(&entry.id, &user)?;
            }
        }
        let mut collaborators = Vec::new();
        for collaborator in &entry.collaborators {
            collaborators.extend(invenio_user(client, users, collaborator)?);
        }
        if !collaborators.is_empty() {
            client.grant_access(&entry.id, &collaborators, "edit")?;
        }
        info!("Adjusted {} ({})", entry.id, url);
        entry.status = MapStatus::Adjusted;
        adjusted += 1;
    }
    Ok(adjusted)
}
