use super::EquellaError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

// A generic XML element. Children are kept in document order and repeated
// names are never collapsed, so lookups always yield zero or more elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub namespace: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

// Returns namespace prefix and local-name portions of the given element.
// If the namespace is not part of the name it will be set to an empty string.
fn name(element: &BytesStart) -> Result<(String, String), EquellaError> {
    let name = std::str::from_utf8(element.name())?;
    let mut parts = name.splitn(2, ':');
    match (parts.next(), parts.next()) {
        (Some(namespace), Some(local_name)) => Ok((namespace.into(), local_name.into())),
        _ => Ok(("".into(), name.into())),
    }
}

fn attributes(element: &BytesStart) -> Result<Vec<(String, String)>, EquellaError> {
    let mut attributes = Vec::new();
    for attribute in element.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key)?.to_string();
        let value = attribute.unescaped_value()?;
        let value = std::str::from_utf8(&value)?.to_string();
        attributes.push((key, value));
    }
    Ok(attributes)
}

fn element<B>(reader: &mut Reader<B>, start: &BytesStart) -> Result<Element, EquellaError>
where
    B: BufRead,
{
    let mut current = Element::from_start(start)?;
    let mut text = String::new();
    let mut buffer = Vec::new();
    loop {
        match reader.read_event(&mut buffer)? {
            // Opening tag of child.
            Event::Start(e) => current.children.push(element(reader, &e)?), // Recurse.
            // Childless tag, e.g. <publisher/>.
            Event::Empty(e) => current.children.push(Element::from_start(&e)?),
            // Closing current tag.
            Event::End(_) => break,
            Event::Text(e) => {
                let bytes = e.unescaped()?;
                text.push_str(std::str::from_utf8(&bytes)?);
            }
            Event::CData(e) => text.push_str(std::str::from_utf8(e.escaped())?),
            Event::Eof => {
                return Err(quick_xml::Error::UnexpectedEof(format!(
                    "Unclosed element <{}>",
                    current.name
                ))
                .into())
            }
            // We ignore Comments, XML Declaration, Processing Instructions, and DocType elements.
            _ => (),
        }
        buffer.clear();
    }
    // Mixed content is not significant in item metadata.
    current.text = text.trim().to_string();
    Ok(current)
}

impl Element {
    fn from_start(start: &BytesStart) -> Result<Self, EquellaError> {
        let (namespace, name) = name(start)?;
        Ok(Element {
            name,
            namespace,
            attributes: attributes(start)?,
            ..Element::default()
        })
    }

    pub fn parse(content: &str) -> Result<Self, EquellaError> {
        let mut reader = Reader::from_str(content);
        let mut buffer = Vec::new();
        loop {
            match reader.read_event(&mut buffer)? {
                // Only concerned with the root tag.
                Event::Start(e) => return element(&mut reader, &e),
                Event::Empty(e) => return Element::from_start(&e),
                Event::Eof => return Err(EquellaError::EmptyDocument),
                _ => (),
            }
            buffer.clear();
        }
    }

    // Non-empty text content.
    pub fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    // Looks up attributes by either their qualified or local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name || key.rsplit(':').next() == Some(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    // All elements reachable by following the given names, in document order.
    pub fn find_all<'a>(&'a self, path: &[&str]) -> Vec<&'a Element> {
        path.iter().fold(vec![self], |elements, name| {
            elements
                .into_iter()
                .flat_map(|element| element.children.iter())
                .filter(|child| child.name == *name)
                .collect()
        })
    }

    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        self.find_all(path).into_iter().next()
    }

    // Non-empty text of all elements at the given path.
    pub fn texts<'a>(&'a self, path: &[&str]) -> Vec<&'a str> {
        self.find_all(path)
            .into_iter()
            .filter_map(|element| element.text())
            .collect()
    }

    // Text of the first element at the given path, if it has any.
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.find(path).and_then(|element| element.text())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.children.is_empty() && self.attributes.is_empty()
    }
}
