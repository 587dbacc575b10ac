//! Request bodies for the engine's `_search` endpoint.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryClause {
    MultiMatch { query: String, fields: Vec<String> },
    MatchAll {},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub order: SortOrder,
}

/// Body of a `_search` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: QueryClause,
    pub from: usize,
    pub size: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<BTreeMap<String, SortSpec>>,
}

impl SearchRequest {
    /// Full-text query over `fields`, optionally sorted by one field.
    pub fn multi_match(options: &super::SearchOptions) -> Self {
        let sort = options
            .sort_field
            .as_ref()
            .filter(|field| !field.is_empty())
            .map(|field| sort_by(field, options.sort_order))
            .into_iter()
            .collect();
        Self {
            query: QueryClause::MultiMatch {
                query: options.query.clone(),
                fields: options.fields.clone(),
            },
            from: options.from,
            size: options.size,
            sort,
        }
    }

    /// Every document, newest first.
    pub fn list_all(from: usize, size: usize) -> Self {
        Self {
            query: QueryClause::MatchAll {},
            from,
            size,
            sort: vec![sort_by("date", SortOrder::Desc)],
        }
    }
}

fn sort_by(field: &str, order: SortOrder) -> BTreeMap<String, SortSpec> {
    BTreeMap::from([(field.to_string(), SortSpec { order })])
}
