// Subjects from mods/subject & mods/genreWrapper/genre, resolved against the
// subject vocabularies generated for Invenio.
use super::{CrosswalkError, Element, SubjectEntry};
use log::{info, warn};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

// Child elements of mods/subject that hold terms.
static SUBJECT_TYPES: [&str; 5] = ["geographic", "topic", "name", "topicCona", "temporal"];

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SubjectKind {
    Genre,
    Geographic,
    Name,
    Temporal,
    Topic,
}

impl SubjectKind {
    fn from_element(name: &str) -> Option<Self> {
        match name {
            "genre" => Some(SubjectKind::Genre),
            "geographic" => Some(SubjectKind::Geographic),
            "name" => Some(SubjectKind::Name),
            "temporal" => Some(SubjectKind::Temporal),
            // topicCona terms are regular topics.
            "topic" | "topicCona" => Some(SubjectKind::Topic),
            _ => None,
        }
    }
}

// Ordered by type, value then authority.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Subject {
    pub kind: SubjectKind,
    pub value: String,
    // Authorities in VAULT: LC, LOCAL, LC-NACO, ULAN, LCSH, AAT.
    pub authority: String,
}

impl Subject {
    pub fn new(kind: SubjectKind, value: &str, authority: &str) -> Self {
        Subject {
            kind,
            value: value.to_string(),
            authority: authority.to_uppercase(),
        }
    }

    fn from_element(kind: SubjectKind, element: &Element) -> Option<Self> {
        element
            .text()
            .map(|value| Subject::new(kind, value, element.attribute("authority").unwrap_or("")))
    }

    // Vocabulary id when the term is known, otherwise a free text keyword.
    pub fn resolve(&self, map: &SubjectMap) -> Option<String> {
        match self.kind {
            // Temporal ids are the term itself.
            SubjectKind::Temporal => Some(self.value.clone()),
            _ => map.get(&self.value).map(str::to_string),
        }
    }

    pub fn to_invenio(&self, map: &SubjectMap) -> SubjectEntry {
        match self.resolve(map) {
            Some(id) => SubjectEntry::Id { id },
            None => {
                warn!("Subject not found in the subjects map: {}", self);
                SubjectEntry::Keyword {
                    subject: self.value.clone(),
                }
            }
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.value)?;
        if !self.authority.is_empty() {
            write!(f, " ({})", self.authority)?;
        }
        Ok(())
    }
}

// Distinct subjects of the given <xml> metadata, sorted.
pub fn find_subjects(xml: &Element) -> Vec<Subject> {
    let mut subjects = BTreeSet::new();
    // Empty <subject/> elements sit alongside actual ones.
    for subject in xml.find_all(&["mods", "subject"]) {
        for child in &subject.children {
            if !SUBJECT_TYPES.contains(&child.name.as_str()) {
                continue;
            }
            if let Some(kind) = SubjectKind::from_element(&child.name) {
                subjects.extend(Subject::from_element(kind, child));
            }
        }
    }
    for genre in xml.find_all(&["mods", "genreWrapper", "genre"]) {
        subjects.extend(Subject::from_element(SubjectKind::Genre, genre));
    }
    subjects.into_iter().collect()
}

// Lower-cased subject terms => Invenio subject ids.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubjectMap {
    terms: HashMap<String, String>,
}

impl SubjectMap {
    pub fn new(terms: HashMap<String, String>) -> Self {
        SubjectMap {
            terms: terms
                .into_iter()
                .map(|(term, id)| (term.to_lowercase(), id))
                .collect(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, CrosswalkError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CrosswalkError::IOError(path.to_path_buf(), e))?;
        let terms: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| CrosswalkError::JsonError(path.to_path_buf(), e))?;
        info!("Loaded {} subjects from {}", terms.len(), path.display());
        Ok(SubjectMap::new(terms))
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        self.terms.get(&term.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
