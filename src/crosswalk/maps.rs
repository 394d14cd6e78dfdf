// Lookup tables from VAULT metadata values to InvenioRDM vocabulary ids.
use std::collections::HashMap;

// ROR id of California College of the Arts.
pub static CCA_ROR_ID: &str = "01mmcf932";

lazy_static! {
    // mods/typeOfResource => our subset of the Invenio resource types.
    #[rustfmt::skip]
    pub static ref RESOURCE_TYPE_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Event documentation", "event");
        m.insert("Event promotion", "event");
        m.insert("Group Field Trip", "event");
        m.insert("Hold Harmless", "publication");
        m.insert("Media Release", "publication");
        m.insert("cartographic", "publication");
        m.insert("mixed material", "other");
        m.insert("moving image", "image");
        m.insert("sound recording", "video");
        m.insert("sound recording-nonmusical", "video");
        m.insert("still image", "video");
        m.insert("text", "publication");
        m
    };
    // mods/name/role/roleTerm => Invenio roles. Keys are lower-cased with spaces removed.
    // @see https://www.loc.gov/marc/relators/relaterm.html
    pub static ref ROLE_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("academicpartner", "artist");
        m.insert("collaborator", "contributor");
        m.insert("curatorassistant", "curator");
        m.insert("installationartist", "artist");
        m.insert("instructorassistant", "teacher");
        m.insert("instructor/curator", "curator");
        m.insert("organizerofmeeting", "organizer");
        m.insert("painter", "artist");
        m.insert("performanceartist", "artist");
        m.insert("poet", "author");
        m.insert("professor", "teacher");
        m.insert("singersongwriter", "artist");
        m.insert("writer", "author");
        m
    };
    // mods/accessCondition/@href => Invenio license ids. Keys are normalized with `normalize_href`.
    static ref LICENSE_HREF_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("rightsstatements.org/vocab/inc/1.0", "copyright");
        m.insert("rightsstatements.org/vocab/inc-edu/1.0", "copyright");
        m.insert("rightsstatements.org/vocab/inc-nc/1.0", "copyright");
        m.insert("creativecommons.org/licenses/by/4.0", "cc-by-4.0");
        m.insert("creativecommons.org/licenses/by-nc/4.0", "cc-by-nc-4.0");
        m.insert("creativecommons.org/licenses/by-nc-nd/4.0", "cc-by-nc-nd-4.0");
        m.insert("creativecommons.org/licenses/by-nc-sa/4.0", "cc-by-nc-sa-4.0");
        m.insert("creativecommons.org/licenses/by-nd/4.0", "cc-by-nd-4.0");
        m.insert("creativecommons.org/licenses/by-sa/4.0", "cc-by-sa-4.0");
        m.insert("creativecommons.org/publicdomain/zero/1.0", "cc0-1.0");
        m
    };
    // mods/accessCondition text => Invenio license ids. Matched as substrings in
    // order, so more specific licenses must come first.
    static ref LICENSE_TEXT_MAP: Vec<(String, &'static str)> = vec![
        ("CC BY-NC-ND", "cc-by-nc-nd-4.0"),
        ("creativecommons.org/licenses/by-nc-nd/", "cc-by-nc-nd-4.0"),
        ("CC BY-NC-SA", "cc-by-nc-sa-4.0"),
        ("creativecommons.org/licenses/by-nc-sa/", "cc-by-nc-sa-4.0"),
        ("CC BY-NC", "cc-by-nc-4.0"),
        ("creativecommons.org/licenses/by-nc/", "cc-by-nc-4.0"),
        ("CC BY-ND", "cc-by-nd-4.0"),
        ("creativecommons.org/licenses/by-nd/", "cc-by-nd-4.0"),
        ("CC BY-SA", "cc-by-sa-4.0"),
        ("creativecommons.org/licenses/by-sa/", "cc-by-sa-4.0"),
        ("CC BY", "cc-by-4.0"),
        ("creativecommons.org/licenses/by/", "cc-by-4.0"),
        ("CC0", "cc0-1.0"),
        ("creativecommons.org/publicdomain/zero/", "cc0-1.0"),
    ]
    .into_iter()
    .map(|(text, id)| (normalize_text(text), id))
    .collect();
}

// Scheme, case & trailing slashes vary across records.
fn normalize_href(href: &str) -> String {
    let href = href.trim().to_lowercase();
    let href = href
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");
    href.trim_end_matches('/').to_string()
}

// Upper-case & treat hyphens as spaces so "CC-BY-NC" matches "CC BY-NC".
fn normalize_text(text: &str) -> String {
    text.to_uppercase().replace('-', " ")
}

pub fn license_from_href(href: &str) -> Option<&'static str> {
    LICENSE_HREF_MAP.get(normalize_href(href).as_str()).copied()
}

pub fn license_from_text(text: &str) -> Option<&'static str> {
    let text = normalize_text(text);
    LICENSE_TEXT_MAP
        .iter()
        .find(|(key, _)| text.contains(key.as_str()))
        .map(|(_, id)| *id)
}

// Attachment MIME type from the filename extension, none when unknown.
pub fn mime_type(filename: &str) -> Option<&'static str> {
    mime_guess::from_path(filename).first_raw()
}
