extern crate clap;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

type ArgResult = std::result::Result<(), String>;

static DEFAULT_SUBJECTS_MAP: &str = "subjects_map.json";
static DEFAULT_MAP_FILE: &str = "id-map.json";

fn valid_path(s: String) -> ArgResult {
    let path = Path::new(OsStr::new(&s));
    if path.exists() {
        Ok(())
    } else {
        Err(format!("The path '{}' does not exist", path.display()))
    }
}

fn valid_directory(s: String) -> ArgResult {
    let path = Path::new(OsStr::new(&s));
    if path.is_dir() {
        Ok(())
    } else {
        Err(format!("The directory '{}' does not exist", path.display()))
    }
}

// Exported item directories hold their metadata in metadata/item.json.
fn valid_item_directory(s: String) -> ArgResult {
    valid_directory(s.clone())?;
    let path = Path::new(OsStr::new(&s)).join("metadata").join("item.json");
    if path.is_file() {
        Ok(())
    } else {
        Err(format!("The file '{}' does not exist", path.display()))
    }
}

fn valid_file(s: String) -> ArgResult {
    let path = Path::new(OsStr::new(&s));
    if path.is_file() {
        Ok(())
    } else {
        Err(format!("The file '{}' does not exist", path.display()))
    }
}

pub struct ConvertArgs<'a> {
    pub files: Vec<&'a Path>,
    pub subjects_map: &'a Path,
}

pub struct SubjectsArgs<'a> {
    pub files: Vec<&'a Path>,
    pub subjects_map: &'a Path,
    pub csv: Option<&'a Path>,
}

pub struct ImportArgs<'a> {
    pub directory: &'a Path,
    pub subjects_map: &'a Path,
    pub communities: Vec<String>,
    pub ignore_errors: bool,
    pub map_file: Option<PathBuf>,
}

pub struct AdjustArgs<'a> {
    pub map_file: &'a Path,
    pub users: &'a Path,
    pub ignore_errors: bool,
}

fn path_of<'a>(args: &'a ArgMatches, name: &str, default: &'static str) -> &'a Path {
    Path::new(OsStr::new(args.value_of(name).unwrap_or(default)))
}

fn paths_of<'a>(args: &'a ArgMatches, name: &str) -> Vec<&'a Path> {
    match args.values_of(name) {
        Some(values) => values.map(|s| Path::new(OsStr::new(s))).collect(),
        None => Vec::new(),
    }
}

pub fn verbose(args: &ArgMatches) -> bool {
    args.is_present("verbose")
}

pub fn get_convert_subcommand_args<'a>(args: &'a ArgMatches) -> ConvertArgs<'a> {
    ConvertArgs {
        files: paths_of(args, "files"),
        subjects_map: path_of(args, "subjects-map", DEFAULT_SUBJECTS_MAP),
    }
}

pub fn get_subjects_subcommand_args<'a>(args: &'a ArgMatches) -> SubjectsArgs<'a> {
    SubjectsArgs {
        files: paths_of(args, "files"),
        subjects_map: path_of(args, "subjects-map", DEFAULT_SUBJECTS_MAP),
        csv: args.value_of("csv").map(|s| Path::new(OsStr::new(s))),
    }
}

pub fn get_import_subcommand_args<'a>(args: &'a ArgMatches) -> ImportArgs<'a> {
    // Communities may be repeated or given as a comma separated list.
    let communities = match args.values_of("communities") {
        Some(values) => values
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };
    let map_file = if args.is_present("no-map") {
        None
    } else {
        Some(path_of(args, "map-file", DEFAULT_MAP_FILE).to_path_buf())
    };
    ImportArgs {
        directory: path_of(args, "directory", "."),
        subjects_map: path_of(args, "subjects-map", DEFAULT_SUBJECTS_MAP),
        communities,
        ignore_errors: args.is_present("ignore-errors"),
        map_file,
    }
}

pub fn get_adjust_subcommand_args<'a>(args: &'a ArgMatches) -> AdjustArgs<'a> {
    AdjustArgs {
        map_file: path_of(args, "map-file", DEFAULT_MAP_FILE),
        users: path_of(args, "users", "users.json"),
        ignore_errors: args.is_present("ignore-errors"),
    }
}

fn files_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("files")
        .value_name("FILES")
        .help("Item JSON, search result JSON or MODS XML files, directories are searched recursively")
        .required(true)
        .multiple(true)
        .validator(valid_path)
}

fn subjects_map_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("subjects-map")
        .long("subjects-map")
        .value_name("FILE")
        .help("JSON map of subject terms to Invenio subject ids")
        .default_value(DEFAULT_SUBJECTS_MAP)
        .takes_value(true)
}

fn map_file_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("map-file")
        .long("map-file")
        .value_name("FILE")
        .help("JSON map of VAULT item urls to Invenio record ids")
        .default_value(DEFAULT_MAP_FILE)
        .takes_value(true)
}

fn ignore_errors_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("ignore-errors")
        .short("i")
        .long("ignore-errors")
        .help("Log failed HTTP requests and continue instead of stopping")
        .required(false)
}

pub fn args<'a, 'b>() -> App<'a, 'b> {
    let program_name = env::args()
        .next()
        .and_then(|arg| {
            Path::new(OsStr::new(&arg))
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "vault-migration".to_string());
    App::new(program_name)
    .version("0.1")
    .about("\nMigrates items from VAULT (EQUELLA) to InvenioRDM. \nExits non-zero if not successful.")
    .setting(AppSettings::SubcommandRequiredElseHelp)
    .arg(
      Arg::with_name("verbose")
      .short("v")
      .long("verbose")
      .help("Show debug output")
      .global(true)
    )
    .subcommand(SubCommand::with_name("convert")
                .about("Print the Invenio record for each VAULT item as JSON")
                .arg(files_arg())
                .arg(subjects_map_arg())
    )
    .subcommand(SubCommand::with_name("subjects")
                .about("List the subjects used by VAULT items & how they map to Invenio")
                .arg(files_arg())
                .arg(subjects_map_arg())
                .arg(
                  Arg::with_name("csv")
                  .long("csv")
                  .value_name("FILE")
                  .help("Also write the subjects to a CSV file")
                  .takes_value(true)
                )
    )
    .subcommand(SubCommand::with_name("import")
                .about("Create an Invenio record from an exported VAULT item directory")
                .arg(
                  Arg::with_name("directory")
                  .value_name("DIRECTORY")
                  .help("Item directory containing metadata/item.json & the item's attachments")
                  .required(true)
                  .validator(valid_item_directory)
                )
                .arg(subjects_map_arg())
                .arg(ignore_errors_arg())
                .arg(
                  Arg::with_name("no-map")
                  .long("no-map")
                  .help("Do not record the new record in the id map")
                  .required(false)
                )
                .arg(map_file_arg())
                .arg(
                  Arg::with_name("communities")
                  .short("c")
                  .long("communities")
                  .value_name("SLUGS")
                  .help("Communities to add the record to, comma separated")
                  .takes_value(true)
                  .multiple(true)
                  .number_of_values(1)
                )
    )
    .subcommand(SubCommand::with_name("adjust")
                .about("Set the owner & collaborators of imported records")
                .arg(map_file_arg().validator(valid_file))
                .arg(
                  Arg::with_name("users")
                  .long("users")
                  .value_name("FILE")
                  .help("JSON map of EQUELLA user ids to Invenio usernames")
                  .required(true)
                  .takes_value(true)
                  .validator(valid_file)
                )
                .arg(ignore_errors_arg())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures_directory() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("assets/fixtures")
    }

    #[test]
    fn import_communities() {
        let directory = fixtures_directory().join("item");
        let directory = directory.to_str().unwrap();
        let matches = args()
            .get_matches_from_safe(vec![
                "vault-migration",
                "import",
                directory,
                "--communities",
                "libraries, archives",
                "-c",
                "cca",
                "--no-map",
            ])
            .unwrap();
        let args = get_import_subcommand_args(matches.subcommand_matches("import").unwrap());
        assert_eq!(args.communities, vec!["libraries", "archives", "cca"]);
        assert_eq!(args.map_file, None);
        assert!(!args.ignore_errors);
    }

    #[test]
    fn import_requires_item_directory() {
        let directory = fixtures_directory();
        let result = args().get_matches_from_safe(vec![
            "vault-migration",
            "import",
            directory.to_str().unwrap(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(args().get_matches_from_safe(vec!["vault-migration"]).is_err());
    }

    #[test]
    fn convert_defaults() {
        let directory = fixtures_directory();
        let matches = args()
            .get_matches_from_safe(vec!["vault-migration", "-v", "convert", directory.to_str().unwrap()])
            .unwrap();
        assert!(verbose(&matches));
        let args = get_convert_subcommand_args(matches.subcommand_matches("convert").unwrap());
        assert_eq!(args.files, vec![directory.as_path()]);
        assert_eq!(args.subjects_map, Path::new("subjects_map.json"));
    }
}
