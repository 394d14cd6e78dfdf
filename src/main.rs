mod args;

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use args::*;
use crosswalk::{find_subjects, Record, Subject, SubjectMap};
use equella::{find_items, is_item_file, Item};
use invenio::{adjust, import_item, Config, IdMap, ImportOptions, InvenioClient, UserMap};
use log::*;
use logger::Logger;
use serde::Serialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

static LOGGER: Logger = Logger;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

// Files named on the command line, with directories expanded in sorted order.
fn item_files(paths: &[&Path]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .sort_by(|a, b| a.file_name().cmp(b.file_name()))
                    .into_iter()
                    .filter_map(|entry| match entry {
                        Ok(entry) => Some(entry),
                        Err(error) => {
                            warn!("Skipping {}", error);
                            None
                        }
                    })
                    .filter(|entry| entry.file_type().is_file() && is_item_file(entry.path()))
                    .map(|entry| entry.into_path()),
            );
        } else {
            files.push(path.to_path_buf());
        }
    }
    files
}

fn items(paths: &[&Path]) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    for file in item_files(paths) {
        debug!("Reading {}", file.display());
        items.extend(find_items(&file)?);
    }
    Ok(items)
}

// Without a map every subject falls back to a keyword.
fn subject_map(path: &Path) -> Result<SubjectMap> {
    if path.exists() {
        let map = SubjectMap::from_path(path)?;
        debug!("Loaded {} subject terms from {}", map.len(), path.display());
        Ok(map)
    } else {
        warn!(
            "Subjects map {} not found, subjects will be keywords",
            path.display()
        );
        Ok(SubjectMap::default())
    }
}

fn convert(args: ConvertArgs) -> Result<()> {
    let subjects = subject_map(args.subjects_map)?;
    for item in items(&args.files)? {
        let record = Record::new(&item)?;
        let invenio = record.to_invenio(&subjects)?;
        println!("{}", serde_json::to_string_pretty(&invenio)?);
    }
    Ok(())
}

#[derive(Serialize)]
struct SubjectRow<'a> {
    #[serde(rename = "type")]
    kind: String,
    value: &'a str,
    authority: &'a str,
    id: &'a str,
    subject: &'a str,
}

fn subjects(args: SubjectsArgs) -> Result<()> {
    let map = subject_map(args.subjects_map)?;
    let items = items(&args.files)?;
    let progress_bar = logger::progress_bar(items.len() as u64);
    let mut subjects = BTreeSet::new();
    for item in &items {
        let record = Record::new(item)?;
        subjects.extend(find_subjects(record.xml()));
        progress_bar.inc(1);
    }
    progress_bar.finish_and_clear();

    let mut writer = match args.csv {
        Some(path) => Some(csv::Writer::from_path(path)?),
        None => None,
    };
    let mut unmatched = 0;
    for subject in &subjects {
        let id = subject.resolve(&map);
        match &id {
            Some(id) => println!("{} => {}", subject, id),
            None => {
                unmatched += 1;
                println!("{} => (keyword)", subject)
            }
        }
        if let Some(writer) = writer.as_mut() {
            writer.serialize(subject_row(subject, id.as_deref()))?;
        }
    }
    if let Some(mut writer) = writer {
        writer.flush()?;
    }
    info!(
        "Found {} subjects in {} items, {} without an Invenio subject",
        subjects.len(),
        items.len(),
        unmatched
    );
    Ok(())
}

fn subject_row<'a>(subject: &'a Subject, id: Option<&'a str>) -> SubjectRow<'a> {
    SubjectRow {
        kind: subject.kind.to_string(),
        value: &subject.value,
        authority: &subject.authority,
        id: id.unwrap_or(""),
        subject: if id.is_some() { &subject.value } else { "" },
    }
}

fn client(ignore_errors: bool) -> Result<InvenioClient> {
    let config = Config::from_env()?;
    debug!("Using Invenio at {}", config.base_url());
    Ok(InvenioClient::new(&config, ignore_errors)?)
}

fn import(args: ImportArgs) -> Result<()> {
    let client = client(args.ignore_errors)?;
    let subjects = subject_map(args.subjects_map)?;
    let options = ImportOptions {
        communities: &args.communities,
        map_file: args.map_file.as_deref(),
    };
    import_item(&client, args.directory, &subjects, &options)?;
    Ok(())
}

fn adjust_records(args: AdjustArgs) -> Result<()> {
    let client = client(args.ignore_errors)?;
    let users = UserMap::from_path(args.users)?;
    let mut map = IdMap::read(args.map_file)?;
    let result = adjust(&client, &mut map, &users);
    // Keep the progress made before any failure.
    map.write(args.map_file)?;
    info!("Adjusted {} of {} records", result?, map.len());
    Ok(())
}

fn main() {
    // Force exit if panics on thread.
    let original_panic_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Use custom logger.
        let payload = panic_info
            .payload()
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| panic_info.payload().downcast_ref::<&str>().copied());
        match (payload, panic_info.location()) {
            (Some(error), Some(location)) => Logger::error(&format!(
                "Panic (File: {}, Line: {}): {}",
                location.file(),
                location.line(),
                error
            )),
            (Some(error), None) => Logger::error(&format!("Panic: {}", error)),
            // Invoke the default handler as a fallback.
            (None, _) => original_panic_hook(panic_info),
        }
        std::process::exit(1);
    }));

    let matches = args().get_matches();
    let verbose = verbose(&matches)
        || matches
            .subcommand()
            .1
            .map_or(false, |matches| args::verbose(matches));

    // Configure logger.
    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(Logger::level(verbose))
    }

    let result = match matches.subcommand() {
        ("convert", Some(matches)) => convert(get_convert_subcommand_args(matches)),
        ("subjects", Some(matches)) => subjects(get_subjects_subcommand_args(matches)),
        ("import", Some(matches)) => import(get_import_subcommand_args(matches)),
        ("adjust", Some(matches)) => adjust_records(get_adjust_subcommand_args(matches)),
        _ => args().print_long_help().map_err(|error| error.into()),
    };
    if let Err(error) = result {
        Logger::error(&error.to_string());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosswalk::SubjectKind;
    use std::str::FromStr;

    // Helper to get the fixtures directory.
    fn fixtures_directory() -> PathBuf {
        let manifest_directory = PathBuf::from_str(&env!("CARGO_MANIFEST_DIR")).unwrap();
        manifest_directory.parent().unwrap().join("assets/fixtures")
    }

    #[test]
    fn directories_are_expanded_in_order() {
        let fixtures = fixtures_directory();
        let files = item_files(&[fixtures.as_path()]);
        assert_eq!(
            files,
            vec![
                fixtures.join("item/metadata/item.json"),
                fixtures.join("item.json"),
                fixtures.join("metadata.xml"),
                fixtures.join("subjects_map.json"),
                fixtures.join("users.json"),
            ]
        );
    }

    #[test]
    fn only_items_are_read_from_directories() {
        let items = items(&[fixtures_directory().as_path()]).unwrap();
        let names: Vec<Option<&str>> = items.iter().map(|item| item.name.as_deref()).collect();
        // metadata.xml is bare MODS without an item name.
        assert_eq!(
            names,
            vec![Some("Design Book Review 12"), Some("Design Book Review 12"), None]
        );
    }

    #[test]
    fn files_are_kept() {
        let file = fixtures_directory().join("item.json");
        assert_eq!(item_files(&[file.as_path()]), vec![file.clone()]);
        assert_eq!(items(&[file.as_path()]).unwrap().len(), 1);
    }

    #[test]
    fn missing_subjects_map() {
        let map = subject_map(&fixtures_directory().join("non-existent.json")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn csv_rows() {
        let subject = Subject::new(SubjectKind::Topic, "Architecture", "lcsh");
        let row = subject_row(&subject, Some("abc-123"));
        assert_eq!(row.kind, "Topic");
        assert_eq!(row.authority, "LCSH");
        assert_eq!(row.subject, "Architecture");
        let row = subject_row(&subject, None);
        assert_eq!(row.id, "");
        assert_eq!(row.subject, "");
    }
}
