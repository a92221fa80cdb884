use std::num::NonZeroUsize;
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationError {
    #[error("No more items to show")]
    NoMoreItems,
}

/// Forward-only cursor over a match set of `total` items.
///
/// Everything the caller needs is derived from `(current_page, page_size,
/// total)`:
/// - `visible_count = min(current_page * page_size, total)`
/// - `remaining_count = max(total - current_page * page_size, 0)`
///
/// `current_page` starts at 1 and only [`reset`](Self::reset) brings it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: usize,
    page_size: NonZeroUsize,
    total: usize,
}

impl PaginationState {
    pub fn new(page_size: NonZeroUsize, total: usize) -> Self {
        Self {
            current_page: 1,
            page_size,
            total,
        }
    }

    pub fn reset(&mut self, total: usize) {
        self.current_page = 1;
        self.total = total;
    }

    /// Moves to the next page and returns the index range it revealed.
    ///
    /// Fails with [`PaginationError::NoMoreItems`] when everything is already
    /// visible; the state is left as it was.
    pub fn advance(&mut self) -> Result<Range<usize>, PaginationError> {
        if !self.has_more() {
            return Err(PaginationError::NoMoreItems);
        }
        self.current_page += 1;
        Ok(self.latest_range())
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn shown_capacity(&self) -> usize {
        self.current_page.saturating_mul(self.page_size.get())
    }

    pub fn visible_count(&self) -> usize {
        self.shown_capacity().min(self.total)
    }

    pub fn remaining_count(&self) -> usize {
        self.total.saturating_sub(self.shown_capacity())
    }

    /// Whether a "show more" action is allowed.
    pub fn has_more(&self) -> bool {
        self.remaining_count() > 0
    }

    /// Everything shown so far.
    pub fn visible_range(&self) -> Range<usize> {
        0..self.visible_count()
    }

    /// The batch revealed by the most recent page (the first page after a reset).
    pub fn latest_range(&self) -> Range<usize> {
        let previous = (self.current_page - 1)
            .saturating_mul(self.page_size.get())
            .min(self.total);
        previous..self.visible_count()
    }
}
