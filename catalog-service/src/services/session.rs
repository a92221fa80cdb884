use crate::models::book::Book;
use crate::models::catalog::Catalog;
use crate::models::criteria::FilterCriteria;
use crate::services::filter::{apply, MatchSet};
use crate::services::pagination::{PaginationError, PaginationState};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// One user's browse position: the current match set and how far into it
/// they have paged. Never shared between sessions.
#[derive(Debug, Clone)]
pub struct BrowseSession {
    criteria: FilterCriteria,
    matches: MatchSet,
    pagination: PaginationState,
}

impl BrowseSession {
    pub fn new(catalog: &Catalog, criteria: FilterCriteria, page_size: NonZeroUsize) -> Self {
        let matches = apply(catalog, &criteria);
        let pagination = PaginationState::new(page_size, matches.len());
        Self {
            criteria,
            matches,
            pagination,
        }
    }

    /// Replaces the match set and returns to the first page.
    pub fn search(&mut self, catalog: &Catalog, criteria: FilterCriteria) {
        self.matches = apply(catalog, &criteria);
        self.pagination.reset(self.matches.len());
        self.criteria = criteria;
        debug!(
            "Search reset: {} matches, {} remaining",
            self.matches.len(),
            self.pagination.remaining_count()
        );
    }

    /// Advances one page and returns only the newly revealed books.
    pub fn show_more(&mut self) -> Result<&[Arc<Book>], PaginationError> {
        let range = self.pagination.advance()?;
        debug!(
            "Advanced to page {} revealing {:?}",
            self.pagination.current_page(),
            range
        );
        Ok(self.matches.slice(range))
    }

    /// Everything visible so far, from the first book onwards.
    pub fn visible(&self) -> &[Arc<Book>] {
        self.matches.slice(self.pagination.visible_range())
    }

    /// The batch added by the last page change.
    pub fn latest(&self) -> &[Arc<Book>] {
        self.matches.slice(self.pagination.latest_range())
    }

    pub fn remaining(&self) -> usize {
        self.pagination.remaining_count()
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }
}

#[derive(Debug)]
struct SessionEntry {
    session: BrowseSession,
    last_touched: Instant,
}

type SessionMap = HashMap<Uuid, SessionEntry>;

/// Independent browse sessions keyed by id.
///
/// A session untouched for longer than `idle_ttl` is dropped: lazily when it
/// is next looked up, and in bulk whenever a new session is inserted.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<SessionMap>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    fn lock(&self) -> MutexGuard<'_, SessionMap> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_touched) > self.idle_ttl
    }

    pub fn insert(&self, id: Uuid, session: BrowseSession) {
        self.insert_at(id, session, Instant::now());
    }

    fn insert_at(&self, id: Uuid, session: BrowseSession, now: Instant) {
        let mut sessions = self.lock();

        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle sessions", evicted);
        }

        sessions.insert(
            id,
            SessionEntry {
                session,
                last_touched: now,
            },
        );
    }

    /// Runs `f` against the session, if it exists and has not gone idle.
    pub fn with_session<R>(&self, id: &Uuid, f: impl FnOnce(&mut BrowseSession) -> R) -> Option<R> {
        self.with_session_at(id, Instant::now(), f)
    }

    fn with_session_at<R>(
        &self,
        id: &Uuid,
        now: Instant,
        f: impl FnOnce(&mut BrowseSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.lock();

        let expired = sessions.get(id).map(|entry| self.is_expired(entry, now))?;
        if expired {
            sessions.remove(id);
            debug!("Session {} expired", id);
            return None;
        }

        sessions.get_mut(id).map(|entry| {
            entry.last_touched = now;
            f(&mut entry.session)
        })
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.lock().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::tests::{book, raw};
    use crate::models::criteria::Selector;

    fn catalog_of(count: usize) -> Catalog {
        let books = (0..count)
            .map(|i| {
                let author = if i % 2 == 0 { "a1" } else { "a2" };
                book(&format!("b{}", i), &format!("Book {}", i), author, &["sf"])
            })
            .collect();
        Catalog::load(raw(books)).unwrap()
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn ids(books: &[Arc<Book>]) -> Vec<String> {
        books.iter().map(|b| b.id.clone()).collect()
    }

    #[test]
    fn initial_page_and_show_more_batches() {
        let catalog = catalog_of(7);
        let mut session = BrowseSession::new(&catalog, FilterCriteria::default(), size(3));

        assert_eq!(ids(session.visible()), vec!["b0", "b1", "b2"]);
        assert_eq!(session.remaining(), 4);

        assert_eq!(ids(session.show_more().unwrap()), vec!["b3", "b4", "b5"]);
        assert_eq!(ids(session.show_more().unwrap()), vec!["b6"]);
        assert_eq!(session.visible().len(), 7);
        assert!(!session.has_more());

        assert_eq!(session.show_more(), Err(PaginationError::NoMoreItems));
        assert_eq!(ids(session.latest()), vec!["b6"]);
        assert_eq!(session.visible().len(), 7);
    }

    #[test]
    fn new_search_resets_to_first_page() {
        let catalog = catalog_of(10);
        let mut session = BrowseSession::new(&catalog, FilterCriteria::default(), size(2));
        session.show_more().unwrap();
        session.show_more().unwrap();
        assert_eq!(session.pagination().current_page(), 3);

        let criteria = FilterCriteria::new("", Selector::Id("a2".to_string()), Selector::Any);
        session.search(&catalog, criteria.clone());

        assert_eq!(session.pagination().current_page(), 1);
        assert_eq!(session.criteria(), &criteria);
        assert_eq!(session.matches().len(), 5);
        assert_eq!(ids(session.visible()), vec!["b1", "b3"]);
        assert_eq!(session.remaining(), 3);
    }

    #[test]
    fn empty_search_has_nothing_to_show() {
        let catalog = catalog_of(4);
        let criteria = FilterCriteria::new("missing", Selector::Any, Selector::Any);
        let mut session = BrowseSession::new(&catalog, criteria, size(2));

        assert!(session.matches().is_empty());
        assert!(session.visible().is_empty());
        assert_eq!(session.remaining(), 0);
        assert!(session.show_more().is_err());
    }

    #[test]
    fn store_keeps_sessions_isolated() {
        let catalog = catalog_of(6);
        let store = SessionStore::new(Duration::from_secs(60));
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        store.insert(first, BrowseSession::new(&catalog, FilterCriteria::default(), size(2)));
        store.insert(second, BrowseSession::new(&catalog, FilterCriteria::default(), size(2)));
        assert_eq!(store.len(), 2);

        store
            .with_session(&first, |session| session.show_more().map(|b| b.len()))
            .unwrap()
            .unwrap();

        let first_page = store
            .with_session(&first, |s| s.pagination().current_page())
            .unwrap();
        let second_page = store
            .with_session(&second, |s| s.pagination().current_page())
            .unwrap();
        assert_eq!(first_page, 2);
        assert_eq!(second_page, 1);

        assert!(store.remove(&first));
        assert!(!store.remove(&first));
        assert!(store.with_session(&first, |_| ()).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn idle_sessions_are_evicted() {
        let catalog = catalog_of(4);
        let store = SessionStore::new(Duration::from_secs(60));
        let start = Instant::now();
        let session = || BrowseSession::new(&catalog, FilterCriteria::default(), size(2));

        let idle = Uuid::new_v4();
        let active = Uuid::new_v4();
        store.insert_at(idle, session(), start);
        store.insert_at(active, session(), start);

        let touched = store.with_session_at(&active, start + Duration::from_secs(50), |s| {
            s.pagination().current_page()
        });
        assert_eq!(touched, Some(1));

        let newcomer = Uuid::new_v4();
        store.insert_at(newcomer, session(), start + Duration::from_secs(100));

        assert_eq!(store.len(), 2);
        assert!(store.with_session_at(&idle, start + Duration::from_secs(100), |_| ()).is_none());
        assert!(store
            .with_session_at(&active, start + Duration::from_secs(100), |_| ())
            .is_some());
    }

    #[test]
    fn expired_session_is_dropped_on_lookup() {
        let catalog = catalog_of(4);
        let store = SessionStore::new(Duration::from_secs(60));
        let start = Instant::now();
        let id = Uuid::new_v4();
        store.insert_at(
            id,
            BrowseSession::new(&catalog, FilterCriteria::default(), size(2)),
            start,
        );

        assert!(store
            .with_session_at(&id, start + Duration::from_secs(61), |_| ())
            .is_none());
        assert!(store.is_empty());
    }
}
