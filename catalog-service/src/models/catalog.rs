use crate::models::book::{Book, RawCatalog, ReferenceTables};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Data integrity violations found while building a [`Catalog`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate book id: {0}")]
    DuplicateId(String),
    #[error("Book {book_id} references unknown author {author_id}")]
    UnknownAuthor { book_id: String, author_id: String },
    #[error("Book {book_id} references unknown genre {genre_id}")]
    UnknownGenre { book_id: String, genre_id: String },
}

/// Immutable, ordered set of books plus the reference tables they point into.
///
/// Built once by [`Catalog::load`] and shared read-only afterwards; every
/// author and genre a book references is guaranteed to exist in
/// [`Catalog::references`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Arc<Book>>,
    by_id: HashMap<String, usize>,
    references: ReferenceTables,
}

impl Catalog {
    pub fn load(raw: RawCatalog) -> Result<Self, CatalogError> {
        let references = ReferenceTables {
            authors: raw.authors,
            genres: raw.genres,
        };

        let mut by_id = HashMap::with_capacity(raw.books.len());
        let mut books = Vec::with_capacity(raw.books.len());

        for book in raw.books {
            if by_id.contains_key(&book.id) {
                return Err(CatalogError::DuplicateId(book.id));
            }

            if !references.authors.contains_key(&book.author) {
                return Err(CatalogError::UnknownAuthor {
                    book_id: book.id,
                    author_id: book.author,
                });
            }

            if let Some(genre_id) = book
                .genres
                .iter()
                .find(|genre_id| !references.genres.contains_key(*genre_id))
            {
                return Err(CatalogError::UnknownGenre {
                    book_id: book.id.clone(),
                    genre_id: genre_id.clone(),
                });
            }

            by_id.insert(book.id.clone(), books.len());
            books.push(Arc::new(book));
        }

        Ok(Self {
            books,
            by_id,
            references,
        })
    }

    /// Exact-match lookup by identifier. `None` is the normal "not found" outcome.
    pub fn lookup(&self, id: &str) -> Option<&Arc<Book>> {
        self.by_id.get(id).map(|&index| &self.books[index])
    }

    pub fn books(&self) -> &[Arc<Book>] {
        &self.books
    }

    pub fn references(&self) -> &ReferenceTables {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    pub(crate) fn book(id: &str, title: &str, author: &str, genres: &[&str]) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            image: format!("https://covers.example/{}.jpg", id),
            published: Utc.with_ymd_and_hms(1965, 8, 1, 0, 0, 0).unwrap(),
            description: format!("Description of {}", title),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    pub(crate) fn raw(books: Vec<Book>) -> RawCatalog {
        let authors: BTreeMap<String, String> = [("a1", "Frank Herbert"), ("a2", "Jane Doe")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let genres: BTreeMap<String, String> = [("sf", "Science Fiction"), ("hist", "History")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        RawCatalog {
            books,
            authors,
            genres,
        }
    }

    #[test]
    fn load_keeps_order_and_indexes_by_id() {
        let catalog = Catalog::load(raw(vec![
            book("b2", "Dune", "a1", &["sf"]),
            book("b1", "Club Dune", "a2", &["sf", "hist"]),
        ]))
        .unwrap();

        let ids: Vec<&str> = catalog.books().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "b1"]);
        assert_eq!(catalog.lookup("b1").unwrap().title, "Club Dune");
        assert_eq!(catalog.lookup("b2").unwrap().title, "Dune");
        assert!(catalog.lookup("b3").is_none());
        assert_eq!(catalog.references().author_name("a1"), Some("Frank Herbert"));
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let err = Catalog::load(raw(vec![
            book("b1", "Dune", "a1", &["sf"]),
            book("b1", "Dune Messiah", "a1", &["sf"]),
        ]))
        .unwrap_err();

        assert_eq!(err, CatalogError::DuplicateId("b1".to_string()));
    }

    #[test]
    fn load_rejects_unknown_author() {
        let err = Catalog::load(raw(vec![book("b1", "Dune", "nobody", &["sf"])])).unwrap_err();

        assert_eq!(
            err,
            CatalogError::UnknownAuthor {
                book_id: "b1".to_string(),
                author_id: "nobody".to_string(),
            }
        );
    }

    #[test]
    fn load_rejects_unknown_genre() {
        let err = Catalog::load(raw(vec![book("b1", "Dune", "a1", &["sf", "poetry"])]))
            .unwrap_err();

        assert_eq!(
            err,
            CatalogError::UnknownGenre {
                book_id: "b1".to_string(),
                genre_id: "poetry".to_string(),
            }
        );
    }

    #[test]
    fn empty_catalog_loads() {
        let catalog = Catalog::load(raw(Vec::new())).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }
}
