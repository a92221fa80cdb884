use serde::{Deserialize, Serialize};

/// Sentinel accepted for "no author/genre constraint".
pub const ANY: &str = "any";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Selector {
    #[default]
    Any,
    Id(String),
}

impl Selector {
    /// Absent, empty and `"any"` all mean no constraint.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => Selector::Any,
            Some(v) if v.is_empty() || v == ANY => Selector::Any,
            Some(v) => Selector::Id(v.to_string()),
        }
    }

    pub fn admits(&self, id: &str) -> bool {
        match self {
            Selector::Any => true,
            Selector::Id(expected) => expected == id,
        }
    }
}

impl From<Option<String>> for Selector {
    fn from(value: Option<String>) -> Self {
        Selector::parse(value.as_deref())
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        match selector {
            Selector::Any => ANY.to_string(),
            Selector::Id(id) => id,
        }
    }
}

/// Three-part search constraint. All parts must hold for a book to match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Selector,
    #[serde(default)]
    pub genre: Selector,
}

impl FilterCriteria {
    pub fn new(title: impl Into<String>, author: Selector, genre: Selector) -> Self {
        Self {
            title: title.into(),
            author,
            genre,
        }
    }

    pub fn from_params(title: Option<&str>, author: Option<&str>, genre: Option<&str>) -> Self {
        Self::new(
            title.unwrap_or_default(),
            Selector::parse(author),
            Selector::parse(genre),
        )
    }
}
