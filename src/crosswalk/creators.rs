// Creators from mods/name.
// @see https://inveniordm.docs.cern.ch/reference/metadata/#creators-1-n
use super::maps::{CCA_ROR_ID, ROLE_MAP};
use super::names::{parse_name, ParsedName};
use super::{Affiliation, Creator, CrosswalkError, Element, VocabularyId};
use log::debug;
use regex::Regex;

lazy_static! {
    // Non-CCA creators often still list CCA as their affiliation.
    static ref CCA_AFFILIATION: Regex =
        Regex::new(r"(?i)^(CCA/?C?|California College of (the)? ?Arts( and Crafts)?)").unwrap();
}

// Creators can only have one role, take the first one.
fn role(name: &Element) -> Option<VocabularyId> {
    let term = name.texts(&["role", "roleTerm"]).into_iter().next()?;
    let term = term.to_lowercase().replace(' ', "");
    let id = ROLE_MAP.get(term.as_str()).copied().unwrap_or(term.as_str());
    Some(VocabularyId::new(id))
}

fn affiliations(name: &Element) -> Vec<Affiliation> {
    let mut affiliations = Vec::new();
    for wrapper in name.children_named("subNameWrapper") {
        let found = if wrapper.text_at(&["ccaAffiliated"]) == Some("Yes") {
            vec![Affiliation::Id {
                id: CCA_ROR_ID.to_string(),
            }]
        } else {
            wrapper
                .texts(&["affiliation"])
                .into_iter()
                .filter(|affiliation| !CCA_AFFILIATION.is_match(affiliation))
                .map(|affiliation| Affiliation::Name {
                    name: affiliation.to_string(),
                })
                .collect()
        };
        for affiliation in found {
            if !affiliations.contains(&affiliation) {
                affiliations.push(affiliation);
            }
        }
    }
    affiliations
}

fn describe(name: &Element) -> String {
    name.texts(&["namePart"]).join(" | ")
}

// A single namePart may still hold a list of names.
fn single_name_part(name: &Element, text: &str) -> Result<Vec<Creator>, CrosswalkError> {
    let role = role(name);
    let affiliations = affiliations(name);
    match parse_name(text)? {
        ParsedName::Single(person_or_org) => Ok(vec![Creator {
            person_or_org,
            role,
            affiliations,
        }]),
        ParsedName::List(_) if role.is_some() || !affiliations.is_empty() => {
            Err(CrosswalkError::UnexpectedNameStructure(format!(
                "namePart \"{}\" is a list of names but also has a role or affiliation",
                text
            )))
        }
        ParsedName::List(names) => Ok(names.into_iter().map(Creator::bare).collect()),
    }
}

// Multiple nameParts must not carry any other mods/name fields.
fn multiple_name_parts(name: &Element) -> Result<Vec<Creator>, CrosswalkError> {
    if name.child("role").is_some()
        || name.child("subNameWrapper").is_some()
        || name.attribute("type").is_some()
    {
        return Err(CrosswalkError::UnexpectedNameStructure(format!(
            "list of nameParts \"{}\" alongside other fields",
            describe(name)
        )));
    }
    let mut creators = Vec::new();
    for text in name.texts(&["namePart"]) {
        creators.extend(parse_name(text)?.into_vec().into_iter().map(Creator::bare));
    }
    Ok(creators)
}

pub fn creators(xml: &Element) -> Result<Vec<Creator>, CrosswalkError> {
    let mut creators = Vec::new();
    for name in xml.find_all(&["mods", "name"]) {
        let parts: Vec<&Element> = name.children_named("namePart").collect();
        match parts.as_slice() {
            [] => debug!("Skipping mods/name without a namePart"),
            [part] => match part.text() {
                Some(text) => creators.extend(single_name_part(name, text)?),
                None => debug!("Skipping mods/name with an empty namePart"),
            },
            _ => creators.extend(multiple_name_parts(name)?),
        }
    }
    Ok(creators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CrosswalkErrorDiscriminants, PersonOrOrg};

    fn xml(content: &str) -> Element {
        Element::parse(&format!("<xml><mods>{}</mods></xml>", content)).unwrap()
    }

    fn cca() -> Affiliation {
        Affiliation::Id {
            id: "01mmcf932".to_string(),
        }
    }

    fn other_place() -> Affiliation {
        Affiliation::Name {
            name: "Other Place".to_string(),
        }
    }

    #[test]
    fn names() {
        let result = creators(&xml("<name><namePart>Joe Jonas</namePart></name>")).unwrap();
        assert_eq!(
            result,
            vec![Creator::bare(PersonOrOrg::person("Joe", "Jonas"))]
        );
        let result = creators(&xml(
            "<name><namePart>Taylor Swift</namePart><namePart>Joe Pesci</namePart></name>",
        ))
        .unwrap();
        let names: Vec<PersonOrOrg> = result.into_iter().map(|c| c.person_or_org).collect();
        assert_eq!(
            names,
            vec![
                PersonOrOrg::person("Taylor", "Swift"),
                PersonOrOrg::person("Joe", "Pesci")
            ]
        );
    }

    #[test]
    fn creator_affiliations() {
        let cases = vec![
            (
                "<name><namePart>A B</namePart><subNameWrapper><ccaAffiliated>Yes</ccaAffiliated></subNameWrapper></name>",
                vec![vec![cca()]],
            ),
            (
                "<name><namePart>A B</namePart><subNameWrapper><ccaAffiliated>No</ccaAffiliated><affiliation>CCA</affiliation></subNameWrapper></name>",
                vec![vec![]],
            ),
            (
                "<name><namePart>A B</namePart><subNameWrapper><affiliation>California College of the Arts</affiliation></subNameWrapper></name>",
                vec![vec![]],
            ),
            (
                "<name><namePart>A B</namePart><subNameWrapper><affiliation>Other Place</affiliation></subNameWrapper></name>",
                vec![vec![other_place()]],
            ),
            (
                "<name><namePart>A B</namePart><subNameWrapper><ccaAffiliated>Yes</ccaAffiliated></subNameWrapper><subNameWrapper><affiliation>Other Place</affiliation></subNameWrapper><subNameWrapper><affiliation>Other Place</affiliation></subNameWrapper></name>",
                vec![vec![cca(), other_place()]],
            ),
            (
                "<name><namePart>A B</namePart><subNameWrapper><ccaAffiliated>Yes</ccaAffiliated></subNameWrapper></name><name><namePart>A B</namePart><subNameWrapper><affiliation>Other Place</affiliation></subNameWrapper></name>",
                vec![vec![cca()], vec![other_place()]],
            ),
        ];
        for (content, expected) in cases {
            let affiliations: Vec<Vec<Affiliation>> = creators(&xml(content))
                .unwrap()
                .into_iter()
                .map(|c| c.affiliations)
                .collect();
            assert_eq!(affiliations, expected, "{}", content);
        }
    }

    #[test]
    fn creator_roles() {
        let cases = vec![
            (
                r#"<name><namePart>A B</namePart><role><roleTerm type="text">editor</roleTerm><roleTerm type="text">illustrator</roleTerm></role></name>"#,
                vec![Some("editor")],
            ),
            (
                r#"<name><namePart>A B</namePart><role><roleTerm type="text">curatorassistant</roleTerm></role></name>"#,
                vec![Some("curator")],
            ),
            (
                r#"<name><namePart>A B</namePart><role><roleTerm type="text">Performance Artist</roleTerm></role></name>"#,
                vec![Some("artist")],
            ),
            (
                r#"<name><namePart>A B</namePart><role><roleTerm type="text">publisher</roleTerm></role></name><name><namePart>A B</namePart><role><roleTerm type="text">editor</roleTerm></role></name>"#,
                vec![Some("publisher"), Some("editor")],
            ),
            ("<name><namePart>A B</namePart></name>", vec![None]),
        ];
        for (content, expected) in cases {
            let roles: Vec<Option<String>> = creators(&xml(content))
                .unwrap()
                .into_iter()
                .map(|c| c.role.map(|role| role.id))
                .collect();
            let expected: Vec<Option<String>> = expected
                .into_iter()
                .map(|role| role.map(str::to_string))
                .collect();
            assert_eq!(roles, expected, "{}", content);
        }
    }

    #[test]
    fn list_in_single_name_part() {
        let result = creators(&xml(
            "<name><namePart>Maria Rodriguez; Audre Lorde</namePart></name>",
        ))
        .unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|c| c.role.is_none()));
    }

    #[test]
    fn list_with_role() {
        let result = creators(&xml(
            r#"<name><namePart>Maria Rodriguez; Audre Lorde</namePart><role><roleTerm>editor</roleTerm></role></name>"#,
        ));
        let err: CrosswalkErrorDiscriminants = result.unwrap_err().into();
        assert_eq!(err, CrosswalkErrorDiscriminants::UnexpectedNameStructure);
    }

    #[test]
    fn list_with_affiliation() {
        let result = creators(&xml(
            r#"<name><namePart>Maria Rodriguez; Audre Lorde</namePart><subNameWrapper><affiliation>Mills College</affiliation></subNameWrapper></name>"#,
        ));
        let err: CrosswalkErrorDiscriminants = result.unwrap_err().into();
        assert_eq!(err, CrosswalkErrorDiscriminants::UnexpectedNameStructure);
    }

    #[test]
    fn name_parts_with_other_fields() {
        let result = creators(&xml(
            r#"<name type="personal"><namePart>Taylor Swift</namePart><namePart>Joe Pesci</namePart></name>"#,
        ));
        let err: CrosswalkErrorDiscriminants = result.unwrap_err().into();
        assert_eq!(err, CrosswalkErrorDiscriminants::UnexpectedNameStructure);
    }

    #[test]
    fn empty_names() {
        let result = creators(&xml("<name/><name><namePart/></name>")).unwrap();
        assert!(result.is_empty());
    }
}
