// Maps a single EQUELLA item onto the InvenioRDM metadata schema.
// @see https://inveniordm.docs.cern.ch/reference/metadata/
use super::creators::creators;
use super::dates::to_edtf;
use super::maps::{license_from_href, license_from_text, mime_type, RESOURCE_TYPE_MAP};
use super::subjects::{find_subjects, SubjectMap};
use super::*;
use chrono::Local;
use equella::{Attachment, Item};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

// Design Book Review changed publishers over its run, by issue number.
fn dbr_publisher(number: &str) -> Option<&'static str> {
    // There are double issues with numbers like "37/38".
    let digits: String = number
        .chars()
        .take(2)
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let issue: u32 = digits.parse().ok()?;
    Some(match issue {
        0..=18 => "Design Book Review",
        19..=35 => "MIT Press",
        36..=38 => "Design Book Review",
        _ => "California College of the Arts",
    })
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub struct Record<'a> {
    item: &'a Item,
    xml: Element,
}

impl<'a> Record<'a> {
    pub fn new(item: &'a Item) -> Result<Self, CrosswalkError> {
        Ok(Record {
            item,
            xml: item.xml()?,
        })
    }

    pub fn xml(&self) -> &Element {
        &self.xml
    }

    fn files(&self) -> Vec<&'a Attachment> {
        self.item.file_attachments().collect()
    }

    pub fn title(&self) -> String {
        self.item
            .name
            .clone()
            .unwrap_or_else(|| "Untitled".to_string())
    }

    // Subtitles & every title after those in the first titleInfo.
    pub fn additional_titles(&self) -> Vec<AdditionalTitle> {
        let mut titles = Vec::new();
        for (index, info) in self.xml.find_all(&["mods", "titleInfo"]).into_iter().enumerate() {
            for subtitle in info.texts(&["subTitle"]) {
                titles.push(AdditionalTitle {
                    title: subtitle.to_string(),
                    kind: VocabularyId::new("subtitle"),
                });
            }
            if index == 0 {
                continue;
            }
            let kind = match info.attribute("type") {
                Some("alternative") => "alternative-title",
                Some("translated") => "translated-title",
                _ => "other",
            };
            for title in info.texts(&["title"]) {
                titles.push(AdditionalTitle {
                    title: title.to_string(),
                    kind: VocabularyId::new(kind),
                });
            }
        }
        titles
    }

    // The first abstract is kept even when empty, later empty ones are dropped.
    pub fn abstracts(&self) -> Vec<String> {
        self.xml
            .find_all(&["mods", "abstract"])
            .into_iter()
            .enumerate()
            .filter(|(index, element)| *index == 0 || element.text().is_some())
            .map(|(_, element)| element.text.clone())
            .collect()
    }

    pub fn description(&self) -> String {
        self.abstracts().into_iter().next().unwrap_or_default()
    }

    pub fn additional_descriptions(&self) -> Vec<AdditionalDescription> {
        let abstracts = self
            .abstracts()
            .into_iter()
            .skip(1)
            .map(|description| AdditionalDescription {
                description,
                kind: TitledVocabularyId::new("abstract", "Abstract"),
            });
        let notes = self
            .xml
            .texts(&["mods", "noteWrapper", "note"])
            .into_iter()
            .map(|note| AdditionalDescription {
                description: note.to_string(),
                kind: TitledVocabularyId::new("other", "Other"),
            });
        abstracts.chain(notes).collect()
    }

    pub fn creators(&self) -> Result<Vec<Creator>, CrosswalkError> {
        creators(&self.xml)
    }

    fn date_created(&self) -> Option<String> {
        for info in self.xml.find_all(&["mods", "origininfo"]) {
            for wrapper in info.children_named("dateCreatedWrapper") {
                if let Some(date) = wrapper.texts(&["dateCreated"]).into_iter().next() {
                    match to_edtf(date) {
                        Some(date) => return Some(date),
                        None => debug!("Ignoring unparseable dateCreated \"{}\"", date),
                    }
                }
                // Maybe we have a range with pointStart and pointEnd elements?
                if let (Some(start), Some(end)) = (
                    wrapper.text_at(&["pointStart"]),
                    wrapper.text_at(&["pointEnd"]),
                ) {
                    if let (Some(start), Some(end)) = (to_edtf(start), to_edtf(end)) {
                        return Some(format!("{}/{}", start, end));
                    }
                }
            }
            if let Some(semester) = info.text_at(&["semesterCreated"]) {
                if let Some(date) = to_edtf(semester) {
                    return Some(date);
                }
            }
        }
        None
    }

    // Level 0 EDTF, falling back to when the VAULT item was made and then today.
    pub fn publication_date(&self) -> String {
        self.date_created()
            .or_else(|| self.item.date_created.as_deref().and_then(to_edtf))
            .unwrap_or_else(|| {
                warn!("No publication date for \"{}\", using today", self.title());
                Local::now().format("%Y-%m-%d").to_string()
            })
    }

    // Additional, non-publication dates.
    pub fn dates(&self) -> Vec<DateEntry> {
        let mut dates = Vec::new();
        for captured in self.xml.texts(&["mods", "origininfo", "dateCaptured"]) {
            if let Some(date) = to_edtf(captured) {
                dates.push(DateEntry {
                    date,
                    kind: VocabularyId::new("collected"),
                    description: Some("date captured".to_string()),
                });
            }
        }
        for other in self
            .xml
            .find_all(&["mods", "origininfo", "dateOtherWrapper", "dateOther"])
        {
            if let Some(date) = other.text().and_then(to_edtf) {
                dates.push(DateEntry {
                    date,
                    kind: VocabularyId::new("other"),
                    // The only types we have are Agreement and E/exhibit.
                    description: other.attribute("type").map(capitalize),
                });
            }
        }
        dates
    }

    pub fn formats(&self) -> Vec<String> {
        self.files()
            .into_iter()
            .filter_map(|file| file.filename.as_deref().and_then(mime_type))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn publisher(&self) -> String {
        for related in self.xml.find_all(&["mods", "relatedItem"]) {
            if !related
                .texts(&["titleInfo", "title"])
                .contains(&"Design Book Review")
            {
                continue;
            }
            if let Some(publisher) = related
                .text_at(&["part", "detail", "number"])
                .and_then(dbr_publisher)
            {
                return publisher.to_string();
            }
        }
        // CCA/C archives records can have several originInfo nodes.
        self.xml
            .texts(&["mods", "originInfo", "publisher"])
            .into_iter()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    pub fn related_identifiers(&self) -> Vec<RelatedIdentifier> {
        self.item
            .vault_url()
            .map(|url| RelatedIdentifier {
                identifier: url,
                relation_type: TitledVocabularyId::new("isnewversionof", "Is new version of"),
                scheme: "url".to_string(),
            })
            .into_iter()
            .collect()
    }

    pub fn resource_type(&self) -> VocabularyId {
        let id = self
            .xml
            .text_at(&["mods", "typeOfResourceWrapper", "typeOfResource"])
            .and_then(|kind| RESOURCE_TYPE_MAP.get(kind).copied())
            .unwrap_or("publication");
        VocabularyId::new(id)
    }

    pub fn rights(&self) -> Vec<VocabularyId> {
        let license = self
            .xml
            .find_all(&["mods", "accessCondition"])
            .into_iter()
            .find_map(|condition| {
                condition
                    .attribute("href")
                    .and_then(license_from_href)
                    .or_else(|| condition.text().and_then(license_from_text))
            })
            .unwrap_or("copyright");
        vec![VocabularyId::new(license)]
    }

    pub fn sizes(&self) -> Vec<String> {
        self.xml
            .texts(&["mods", "physicalDescription", "extent"])
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn subjects(&self, map: &SubjectMap) -> Vec<SubjectEntry> {
        let mut entries = Vec::new();
        for subject in find_subjects(&self.xml) {
            let entry = subject.to_invenio(map);
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }
        entries
    }

    pub fn view_level(&self) -> Option<&str> {
        self.xml.text_at(&["local", "viewLevel"])
    }

    // Restricted items stay discoverable but their files are protected.
    pub fn access(&self) -> Access {
        let public = self
            .view_level()
            .map_or(true, |level| level.to_lowercase().contains("public"));
        Access {
            record: AccessLevel::Public,
            files: if public {
                AccessLevel::Public
            } else {
                AccessLevel::Restricted
            },
        }
    }

    // Prefer an image as the file shown first.
    pub fn default_preview(&self) -> Option<String> {
        let files = self.files();
        let is_image = |file: &&&Attachment| {
            file.filename
                .as_deref()
                .and_then(mime_type)
                .map_or(false, |mime| mime.starts_with("image/"))
        };
        files
            .iter()
            .find(is_image)
            .or_else(|| files.first())
            .and_then(|file| file.filename.clone())
    }

    pub fn files_section(&self) -> Files {
        let enabled = !self.files().is_empty();
        Files {
            enabled,
            order: Vec::new(),
            default_preview: if enabled {
                self.default_preview()
            } else {
                None
            },
        }
    }

    pub fn metadata(&self, map: &SubjectMap) -> Result<Metadata, CrosswalkError> {
        Ok(Metadata {
            additional_descriptions: self.additional_descriptions(),
            additional_titles: self.additional_titles(),
            contributors: Vec::new(),
            creators: self.creators()?,
            dates: self.dates(),
            description: self.description(),
            formats: self.formats(),
            locations: Locations::default(),
            publication_date: self.publication_date(),
            publisher: self.publisher(),
            related_identifiers: self.related_identifiers(),
            resource_type: self.resource_type(),
            rights: self.rights(),
            sizes: self.sizes(),
            subjects: self.subjects(map),
            title: self.title(),
        })
    }

    pub fn to_invenio(&self, map: &SubjectMap) -> Result<InvenioRecord, CrosswalkError> {
        Ok(InvenioRecord {
            access: self.access(),
            custom_fields: BTreeMap::new(),
            files: self.files_section(),
            metadata: self.metadata(map)?,
        })
    }
}
