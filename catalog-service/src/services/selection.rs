use crate::models::book::Book;
use crate::models::catalog::Catalog;
use crate::models::responses::BookDetail;
use std::sync::Arc;

/// Resolves an identifier against the full catalog, ignoring any active
/// search or page position.
pub fn resolve(catalog: &Catalog, id: &str) -> Option<Arc<Book>> {
    catalog.lookup(id).cloned()
}

pub fn resolve_detail(catalog: &Catalog, id: &str) -> Option<BookDetail> {
    catalog
        .lookup(id)
        .map(|book| BookDetail::new(book, catalog.references()))
}
