//! Cursor pagination state for GraphQL connections.
//!
//! [`PageInfo`] captures the `pageInfo { endCursor hasNextPage }` block of one
//! page. [`PaginatedResult`] accumulates items for one sub-search together
//! with the cursor for its next page and whether it is exhausted.

use super::error::IntakeError;
use crate::graphql::{Response, ResponseError};

/// Position reported by the server for one page of a connection.
///
/// # Example
///
/// ```
/// use queryloom::github::pagination::PageInfo;
///
/// let info = PageInfo::new(Some("Y3Vyc29yOjI=".to_owned()), true);
/// assert!(info.has_next_page());
/// assert!(!info.is_last_page());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

impl PageInfo {
    /// Creates page info from its two fields.
    #[must_use]
    pub const fn new(end_cursor: Option<String>, has_next_page: bool) -> Self {
        Self {
            end_cursor,
            has_next_page,
        }
    }

    /// Reads `endCursor` and `hasNextPage` from a `pageInfo` response.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError`] when either field is missing or mistyped.
    pub fn from_response(page_info: &Response) -> Result<Self, ResponseError> {
        Ok(Self {
            end_cursor: page_info.opt_str("endCursor")?.map(ToOwned::to_owned),
            has_next_page: page_info.bool("hasNextPage")?,
        })
    }

    /// Cursor of the last item on the page.
    #[must_use]
    pub fn end_cursor(&self) -> Option<&str> {
        self.end_cursor.as_deref()
    }

    /// Returns true if more pages exist after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Returns true if this is the last page.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        !self.has_next_page
    }
}

/// Accumulated output of one paginated sub-search.
///
/// Items survive across organisation scopes; the cursor and exhaustion flag
/// are reset by [`PaginatedResult::begin_scope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedResult<T> {
    items: Vec<T>,
    cursor: Option<String>,
    exhausted: bool,
}

impl<T> Default for PaginatedResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            exhausted: false,
        }
    }
}

impl<T> PaginatedResult<T> {
    /// Creates an empty accumulator positioned at the start.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewinds to the start of a new scope, keeping collected items.
    pub fn begin_scope(&mut self) {
        self.cursor = None;
        self.exhausted = false;
    }

    /// Appends a page of items and advances the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MalformedResponse`] when the page claims more
    /// results but carries no cursor to reach them.
    pub fn absorb(&mut self, items: Vec<T>, page: PageInfo) -> Result<(), IntakeError> {
        self.items.extend(items);
        if page.is_last_page() {
            self.exhausted = true;
            return Ok(());
        }
        let cursor = page.end_cursor.ok_or_else(|| IntakeError::MalformedResponse {
            message: "page reports more results but no end cursor".to_owned(),
        })?;
        self.cursor = Some(cursor);
        Ok(())
    }

    /// Cursor for the next page; `None` means the start.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Returns true once the last page has been absorbed in this scope.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Items collected so far.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the accumulator, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{PageInfo, PaginatedResult};
    use crate::github::error::IntakeError;

    #[rstest]
    fn absorbs_pages_until_exhausted() {
        let mut result = PaginatedResult::new();

        result
            .absorb(vec![1, 2], PageInfo::new(Some("c1".to_owned()), true))
            .expect("first page should be absorbed");
        assert_eq!(result.cursor(), Some("c1"));
        assert!(!result.is_exhausted());

        result
            .absorb(vec![3], PageInfo::new(Some("c2".to_owned()), false))
            .expect("last page should be absorbed");
        assert!(result.is_exhausted());
        assert_eq!(result.items(), &[1, 2, 3]);
    }

    #[rstest]
    fn begin_scope_keeps_items_and_rewinds() {
        let mut result = PaginatedResult::new();
        result
            .absorb(vec!["a"], PageInfo::new(Some("c1".to_owned()), false))
            .expect("page should be absorbed");

        result.begin_scope();

        assert_eq!(result.cursor(), None);
        assert!(!result.is_exhausted());
        assert_eq!(result.into_items(), vec!["a"]);
    }

    #[rstest]
    fn missing_cursor_with_more_pages_is_malformed() {
        let mut result: PaginatedResult<u8> = PaginatedResult::new();
        let outcome = result.absorb(Vec::new(), PageInfo::new(None, true));
        assert!(
            matches!(outcome, Err(IntakeError::MalformedResponse { .. })),
            "expected MalformedResponse, got {outcome:?}"
        );
    }
}
