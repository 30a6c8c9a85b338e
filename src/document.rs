/*!
 * Document data model.
 *
 * A `Document` is an ordered list of titled sections. Its JSON form is
 * `{"name": ..., "sections": {title: content, ...}}` with the sections object
 * written and read back in document order.
 */

use log::debug;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A titled block of document content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// One source document with its sections in original order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier (page name)
    pub name: String,

    #[serde(serialize_with = "serialize_sections", deserialize_with = "deserialize_sections")]
    sections: Vec<Section>,
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: Vec::new(),
        }
    }

    /// Build a document from (title, content) pairs in order
    pub fn from_sections<I, T, C>(name: impl Into<String>, sections: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: Into<String>,
        C: Into<String>,
    {
        let mut document = Self::new(name);
        for (title, content) in sections {
            document.insert(title, content);
        }
        document
    }

    /// Insert a section.
    ///
    /// A repeated title keeps its first position and takes the latest content.
    pub fn insert(&mut self, title: impl Into<String>, content: impl Into<String>) {
        let title = title.into();
        let content = content.into();
        if let Some(existing) = self.sections.iter_mut().find(|s| s.title == title) {
            debug!("Duplicate section '{}' in '{}', keeping latest content", title, self.name);
            existing.content = content;
        } else {
            self.sections.push(Section { title, content });
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.title == title)
            .map(|s| s.content.as_str())
    }

    /// Section titles in document order
    pub fn titles(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.title.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn serialize_sections<S>(sections: &[Section], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(sections.len()))?;
    for section in sections {
        map.serialize_entry(&section.title, &section.content)?;
    }
    map.end()
}

fn deserialize_sections<'de, D>(deserializer: D) -> Result<Vec<Section>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedSections;

    impl<'de> Visitor<'de> for OrderedSections {
        type Value = Vec<Section>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of section titles to section content")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut sections: Vec<Section> = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((title, content)) = access.next_entry::<String, String>()? {
                match sections.iter_mut().find(|s| s.title == title) {
                    Some(existing) => existing.content = content,
                    None => sections.push(Section { title, content }),
                }
            }
            Ok(sections)
        }
    }

    deserializer.deserialize_map(OrderedSections)
}

/// One dataset record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub input: String,
    pub output: String,
}
