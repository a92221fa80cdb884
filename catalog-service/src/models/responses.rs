use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::book::{Book, ReferenceTables};
use crate::models::criteria::FilterCriteria;

#[derive(Deserialize, Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub books: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub id: String,
    pub name: String,
}

/// A list tile: enough to render a preview button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPreview {
    pub id: String,
    pub title: String,
    pub author: String,
    pub image: String,
}

impl BookPreview {
    pub fn new(book: &Book, references: &ReferenceTables) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: references
                .author_name(&book.author)
                .unwrap_or_default()
                .to_string(),
            image: book.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    pub id: String,
    pub title: String,
    pub author: String,
    pub author_name: String,
    pub image: String,
    pub published: DateTime<Utc>,
    pub published_year: i32,
    pub description: String,
    pub genres: Vec<NamedEntry>,
}

impl BookDetail {
    pub fn new(book: &Book, references: &ReferenceTables) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            author_name: references
                .author_name(&book.author)
                .unwrap_or_default()
                .to_string(),
            image: book.image.clone(),
            published: book.published,
            published_year: book.published.year(),
            description: book.description.clone(),
            genres: book
                .genres
                .iter()
                .map(|id| NamedEntry {
                    id: id.clone(),
                    name: references.genre_name(id).unwrap_or_default().to_string(),
                })
                .collect(),
        }
    }

    /// `"<author> (<year>)"`, as shown under the title in the detail view.
    pub fn subtitle(&self) -> String {
        format!("{} ({})", self.author_name, self.published_year)
    }
}

/// Snapshot of a browse session after a search, or the batch added by "show more".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    pub session_id: Uuid,
    /// The search this page belongs to.
    pub criteria: FilterCriteria,
    pub results: Vec<BookPreview>,
    pub count: usize,
    pub total: usize,
    pub page: usize,
    pub remaining: usize,
    pub has_more: bool,
    pub no_results: bool,
}
