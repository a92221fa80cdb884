use crate::models::book::Book;
use crate::models::catalog::Catalog;
use crate::models::criteria::{FilterCriteria, Selector};
use crate::utils::text::{contains_folded, fold_needle};
use std::ops::Range;
use std::sync::Arc;

/// Books matching one set of criteria, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    books: Vec<Arc<Book>>,
}

impl MatchSet {
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Book>> {
        self.books.iter()
    }

    pub fn as_slice(&self) -> &[Arc<Book>] {
        &self.books
    }

    /// Sub-slice clamped to the set's bounds.
    pub fn slice(&self, range: Range<usize>) -> &[Arc<Book>] {
        let end = range.end.min(self.books.len());
        let start = range.start.min(end);
        &self.books[start..end]
    }
}

impl FromIterator<Arc<Book>> for MatchSet {
    fn from_iter<I: IntoIterator<Item = Arc<Book>>>(iter: I) -> Self {
        Self {
            books: iter.into_iter().collect(),
        }
    }
}

/// Criteria with the title search folded once, ready to test many books.
struct PreparedCriteria<'a> {
    title: Option<String>,
    criteria: &'a FilterCriteria,
}

impl<'a> PreparedCriteria<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        Self {
            title: fold_needle(&criteria.title),
            criteria,
        }
    }

    fn matches(&self, book: &Book) -> bool {
        self.title
            .as_deref()
            .map_or(true, |needle| contains_folded(&book.title, needle))
            && self.criteria.author.admits(&book.author)
            && match &self.criteria.genre {
                Selector::Any => true,
                Selector::Id(genre) => book.genres.contains(genre),
            }
    }
}

pub fn apply(catalog: &Catalog, criteria: &FilterCriteria) -> MatchSet {
    let prepared = PreparedCriteria::new(criteria);

    catalog
        .books()
        .iter()
        .filter(|book| prepared.matches(book))
        .cloned()
        .collect()
}
