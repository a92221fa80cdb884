use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    /// Key into [`ReferenceTables::authors`].
    pub author: String,
    pub image: String,
    pub published: DateTime<Utc>,
    pub description: String,
    /// Keys into [`ReferenceTables::genres`].
    pub genres: BTreeSet<String>,
}

/// Identifier to display-name tables for authors and genres.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub authors: BTreeMap<String, String>,
    pub genres: BTreeMap<String, String>,
}

impl ReferenceTables {
    pub fn author_name(&self, author_id: &str) -> Option<&str> {
        self.authors.get(author_id).map(String::as_str)
    }

    pub fn genre_name(&self, genre_id: &str) -> Option<&str> {
        self.genres.get(genre_id).map(String::as_str)
    }
}

/// The catalog document as supplied at startup, before integrity checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCatalog {
    pub books: Vec<Book>,
    pub authors: BTreeMap<String, String>,
    pub genres: BTreeMap<String, String>,
}
