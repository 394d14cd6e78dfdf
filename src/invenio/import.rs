// Imports an exported item directory: metadata/item.json plus its attachments.
use super::client::field;
use super::{IdMap, IdMapEntry, InvenioClient, InvenioError, MapStatus};
use crosswalk::{Record, SubjectMap};
use equella::Item;
use log::{info, warn};
use std::path::Path;

pub struct ImportOptions<'a> {
    // Community slugs to add the published record to.
    pub communities: &'a [String],
    // Id map to update, none to leave it untouched.
    pub map_file: Option<&'a Path>,
}

fn update_map(
    path: &Path,
    item: &Item,
    record: &Record,
    record_id: &str,
) -> Result<(), InvenioError> {
    let url = match item.view_url() {
        Some(url) => url,
        None => {
            warn!("Item has no VAULT url, not adding {} to the id map", record_id);
            return Ok(());
        }
    };
    let mut map = IdMap::read(path)?;
    map.insert(
        &url,
        IdMapEntry {
            id: record_id.to_string(),
            title: record.title(),
            owner: item.owner.as_ref().map(|owner| owner.id.clone()),
            collaborators: item.collaborators.iter().map(|c| c.id.clone()).collect(),
            viewlevel: record.view_level().map(str::to_string),
            status: MapStatus::Imported,
        },
    );
    map.write(path)
}

// Returns the id of the published record.
pub fn import_item(
    client: &InvenioClient,
    directory: &Path,
    subjects: &SubjectMap,
    options: &ImportOptions,
) -> Result<String, InvenioError> {
    let item = Item::from_path(&directory.join("metadata").join("item.json"))?;
    let record = Record::new(&item)?;
    let invenio = record.to_invenio(subjects)?;
    info!("Importing {} from {}", record.title(), directory.display());

    let draft = client.create_draft(&invenio)?;
    let filenames: Vec<String> = item
        .file_attachments()
        .filter_map(|attachment| attachment.filename.clone())
        .collect();
    if !filenames.is_empty() {
        client.add_files(&draft, directory, &filenames, &invenio)?;
    }

    let published = client.publish(&draft)?;
    client.add_to_communities(&published, options.communities)?;
    let id = field(&published, "/id")?.to_string();
    info!(
        "Published: {}",
        field(&published, "/links/self_html").unwrap_or(id.as_str())
    );

    if let Some(path) = options.map_file {
        update_map(path, &item, &record, &id)?;
    }
    Ok(id)
}
