// InvenioRDM record schema, limited to the parts the migration writes.
// @see https://inveniordm.docs.cern.ch/reference/metadata/
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct VocabularyId {
    pub id: String,
}

impl VocabularyId {
    pub fn new(id: &str) -> Self {
        VocabularyId { id: id.to_string() }
    }
}

// Vocabulary reference with an English label, e.g. description & relation types.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TitledVocabularyId {
    pub id: String,
    pub title: BTreeMap<String, String>,
}

impl TitledVocabularyId {
    pub fn new(id: &str, en: &str) -> Self {
        let mut title = BTreeMap::new();
        title.insert("en".to_string(), en.to_string());
        TitledVocabularyId {
            id: id.to_string(),
            title,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PersonOrOrg {
    Personal {
        given_name: String,
        family_name: String,
    },
    Organizational {
        name: String,
    },
}

impl PersonOrOrg {
    pub fn person(given_name: &str, family_name: &str) -> Self {
        PersonOrOrg::Personal {
            given_name: given_name.trim().to_string(),
            family_name: family_name.trim().to_string(),
        }
    }

    pub fn organization(name: &str) -> Self {
        PersonOrOrg::Organizational {
            name: name.trim().to_string(),
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Affiliation {
    Id { id: String },
    Name { name: String },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Creator {
    pub person_or_org: PersonOrOrg,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<VocabularyId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affiliations: Vec<Affiliation>,
}

impl Creator {
    pub fn bare(person_or_org: PersonOrOrg) -> Self {
        Creator {
            person_or_org,
            role: None,
            affiliations: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AdditionalTitle {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: VocabularyId,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AdditionalDescription {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TitledVocabularyId,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DateEntry {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: VocabularyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RelatedIdentifier {
    pub identifier: String,
    pub relation_type: TitledVocabularyId,
    pub scheme: String,
}

// Subjects either reference a vocabulary entry or are free text keywords.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubjectEntry {
    Id { id: String },
    Keyword { subject: String },
}

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[strum(serialize = "public")]
    Public,
    #[strum(serialize = "restricted")]
    Restricted,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Access {
    pub record: AccessLevel,
    pub files: AccessLevel,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Files {
    pub enabled: bool,
    pub order: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_preview: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Locations {
    pub features: Vec<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metadata {
    pub additional_descriptions: Vec<AdditionalDescription>,
    pub additional_titles: Vec<AdditionalTitle>,
    pub contributors: Vec<Creator>,
    pub creators: Vec<Creator>,
    pub dates: Vec<DateEntry>,
    pub description: String,
    pub formats: Vec<String>,
    pub locations: Locations,
    pub publication_date: String,
    pub publisher: String,
    pub related_identifiers: Vec<RelatedIdentifier>,
    pub resource_type: VocabularyId,
    pub rights: Vec<VocabularyId>,
    pub sizes: Vec<String>,
    pub subjects: Vec<SubjectEntry>,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvenioRecord {
    pub access: Access,
    pub custom_fields: BTreeMap<String, Value>,
    pub files: Files,
    pub metadata: Metadata,
}
