// Parses the free text of mods/name/namePart into people & organizations.
use super::{CrosswalkError, PersonOrOrg};
use log::debug;
use regex::Regex;

lazy_static! {
    // Various CCA(C) org names are easily mistaken for personal names.
    static ref CCA: Regex = Regex::new(r"^CCAC?\b").unwrap();
    // Trailing birth / death dates, e.g. "Joyce, James, 1882-1941".
    static ref LIFE_DATES: Regex = Regex::new(r"^\d{4}-(\d{4})?").unwrap();
    static ref ORGANIZATION: Regex = Regex::new(
        r"(?i)\b(academy|agency|alumni|architects|arts|association|board|center|centre|club|collective|college|committee|company|corporation|council|department|foundation|gallery|group|guild|inc|institute|journal|league|libraries|library|llc|ltd|magazine|museum|office|press|program|records|review|school|society|sputnik|studio|studios|team|union|university)\b"
    )
    .unwrap();
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParsedName {
    Single(PersonOrOrg),
    List(Vec<PersonOrOrg>),
}

impl ParsedName {
    pub fn into_vec(self) -> Vec<PersonOrOrg> {
        match self {
            ParsedName::Single(name) => vec![name],
            ParsedName::List(names) => names,
        }
    }
}

fn is_organization(text: &str) -> bool {
    CCA.is_match(text) || ORGANIZATION.is_match(text)
}

// Two to four capitalized words without digits, e.g. "Teri Dowling".
fn looks_like_person(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && !text.chars().any(|c| c.is_ascii_digit())
        && words
            .iter()
            .all(|word| word.chars().next().map_or(false, char::is_uppercase))
        && !is_organization(text)
}

fn parse_list(text: &str, separator: &str) -> Result<ParsedName, CrosswalkError> {
    let mut names = Vec::new();
    for part in text.split(separator).map(str::trim).filter(|p| !p.is_empty()) {
        names.extend(parse_name(part)?.into_vec());
    }
    Ok(ParsedName::List(names))
}

// "Family, Given" and comma separated lists of names.
fn parse_commas(text: &str, parts: &[&str]) -> Result<ParsedName, CrosswalkError> {
    if parts.len() == 2 {
        // Other than a few org names with place parentheticals, these are names.
        if text.contains("Calif.)") {
            return Ok(ParsedName::Single(PersonOrOrg::organization(text)));
        }
        return Ok(ParsedName::Single(PersonOrOrg::person(parts[1], parts[0])));
    }
    if parts.len() == 3 && LIFE_DATES.is_match(parts[2]) {
        return Ok(ParsedName::Single(PersonOrOrg::person(parts[1], parts[0])));
    }
    let people: Vec<&str> = parts
        .iter()
        .copied()
        .filter(|part| looks_like_person(part))
        .collect();
    let organizations = parts.iter().filter(|part| is_organization(part)).count();
    debug!(
        "namePart \"{}\" has {} people and {} organizations",
        text,
        people.len(),
        organizations
    );
    match (people.len(), organizations) {
        (n, _) if n > 1 => {
            let mut names = Vec::new();
            for part in parts {
                names.extend(parse_name(part)?.into_vec());
            }
            Ok(ParsedName::List(names))
        }
        (0, 0) if parts[..2].iter().all(|part| !part.contains(' ')) => Ok(ParsedName::Single(
            PersonOrOrg::person(parts[1], parts[0]),
        )),
        (0, _) => Ok(ParsedName::Single(PersonOrOrg::organization(text))),
        (1, 0) => parse_name(people[0]),
        _ => Err(CrosswalkError::UnparseableName(text.to_string())),
    }
}

// "Given Family", single words & longer strings that may be organizations.
fn parse_words(text: &str) -> ParsedName {
    if CCA.is_match(text) {
        return ParsedName::Single(PersonOrOrg::organization(text));
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    match words.len() {
        0 | 1 => ParsedName::Single(PersonOrOrg::organization(text)),
        2 => ParsedName::Single(PersonOrOrg::person(words[0], words[1])),
        _ if is_organization(text) => ParsedName::Single(PersonOrOrg::organization(text)),
        n => ParsedName::Single(PersonOrOrg::person(
            &words[..n - 1].join(" "),
            words[n - 1],
        )),
    }
}

pub fn parse_name(text: &str) -> Result<ParsedName, CrosswalkError> {
    let text = text.trim();
    if text.contains("; ") {
        return parse_list(text, "; ");
    }
    // There are two plus-separated lists of names in the data.
    if text.contains(" + ") {
        return parse_list(text, " + ");
    }
    let parts: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() > 1 {
        parse_commas(text, &parts)
    } else {
        Ok(parse_words(parts.first().copied().unwrap_or(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CrosswalkErrorDiscriminants;

    fn person(given: &str, family: &str) -> PersonOrOrg {
        PersonOrOrg::person(given, family)
    }

    fn org(name: &str) -> PersonOrOrg {
        PersonOrOrg::organization(name)
    }

    fn single(text: &str) -> PersonOrOrg {
        match parse_name(text).unwrap() {
            ParsedName::Single(name) => name,
            list => panic!("Expected a single name, got {:?}", list),
        }
    }

    fn list(text: &str) -> Vec<PersonOrOrg> {
        match parse_name(text).unwrap() {
            ParsedName::List(names) => names,
            name => panic!("Expected a list of names, got {:?}", name),
        }
    }

    #[test]
    fn family_given() {
        assert_eq!(single("Phetteplace, Eric"), person("Eric", "Phetteplace"));
        assert_eq!(single("Phetteplace, Eric, 1984-"), person("Eric", "Phetteplace"));
        assert_eq!(single("Joyce, James, 1882-1941"), person("James", "Joyce"));
        assert_eq!(single("Carland, Tammy Rae"), person("Tammy Rae", "Carland"));
    }

    #[test]
    fn given_family() {
        assert_eq!(single("Stephen Beal"), person("Stephen", "Beal"));
        assert_eq!(single("Mary Ann Evans"), person("Mary Ann", "Evans"));
    }

    #[test]
    fn organizations() {
        assert_eq!(single("CCA Alumni Association"), org("CCA Alumni Association"));
        assert_eq!(single("CCA Student Council"), org("CCA Student Council"));
        assert_eq!(single("Sputnik"), org("Sputnik"));
        assert_eq!(
            single("San Francisco Art Institute"),
            org("San Francisco Art Institute")
        );
        assert_eq!(
            single("California College of Arts and Crafts (Oakland, Calif.)"),
            org("California College of Arts and Crafts (Oakland, Calif.)")
        );
    }

    #[test]
    fn lists() {
        assert_eq!(
            list("Teri Dowling, John Smith, Annemarie Haar"),
            vec![
                person("Teri", "Dowling"),
                person("John", "Smith"),
                person("Annemarie", "Haar")
            ]
        );
        assert_eq!(
            list("Maria Rodriguez; Natalie Portman; Audre Lorde"),
            vec![
                person("Maria", "Rodriguez"),
                person("Natalie", "Portman"),
                person("Audre", "Lorde")
            ]
        );
        assert_eq!(
            list("Carland, Tammy Rae + Hanna, Kathleen"),
            vec![person("Tammy Rae", "Carland"), person("Kathleen", "Hanna")]
        );
        assert_eq!(
            list("CCAC Libraries; CCA Sputnik"),
            vec![org("CCAC Libraries"), org("CCA Sputnik")]
        );
    }

    #[test]
    fn comma_separated_organization() {
        assert_eq!(
            single("Gallery Paule Anglim, San Francisco Museum, Oakland Museum"),
            org("Gallery Paule Anglim, San Francisco Museum, Oakland Museum")
        );
    }

    #[test]
    fn mixed_people_and_organizations() {
        let result = parse_name("Teri Dowling, CCA Libraries, the archive");
        let err: CrosswalkErrorDiscriminants = result.unwrap_err().into();
        assert_eq!(err, CrosswalkErrorDiscriminants::UnparseableName);
    }

    #[test]
    fn serialized() {
        assert_eq!(
            serde_json::to_value(single("Phetteplace, Eric")).unwrap(),
            serde_json::json!({"family_name": "Phetteplace", "given_name": "Eric", "type": "personal"})
        );
    }
}
