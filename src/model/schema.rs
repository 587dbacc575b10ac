//! Index mapping sent to the search engine when the index is created.

use std::collections::BTreeMap;

use serde::Serialize;

/// Storage type of a single indexed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Exact-match field, not tokenized.
    Keyword,
    /// Tokenized full-text field.
    Text,
    /// Timestamp field.
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    #[serde(rename = "type")]
    pub kind: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mappings {
    pub properties: BTreeMap<&'static str, FieldMapping>,
}

/// Body of the engine's create-index request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexMapping {
    pub name: String,
    pub mappings: Mappings,
}

/// Fields of [`crate::model::email::EmailRecord`] and how each is indexed.
pub const EMAIL_FIELDS: [(&str, FieldType); 7] = [
    ("path", FieldType::Keyword),
    ("content", FieldType::Text),
    ("sender", FieldType::Keyword),
    ("recipient", FieldType::Keyword),
    ("subject", FieldType::Text),
    ("date", FieldType::Date),
    ("folder", FieldType::Keyword),
];

impl IndexMapping {
    /// Mapping for an index holding email records.
    pub fn for_emails(name: impl Into<String>) -> Self {
        let properties = EMAIL_FIELDS
            .iter()
            .map(|&(field, kind)| (field, FieldMapping { kind }))
            .collect();
        Self {
            name: name.into(),
            mappings: Mappings { properties },
        }
    }
}
