//! Paginated multi-stream fetch for the sidebar summary.
//!
//! One compiled document carries three aliased searches (see [`Stream`]).
//! [`LhsFetcher::fetch_all`] executes it repeatedly per organisation scope,
//! advancing each search's cursor independently until every search reports
//! its last page, and merges the pages into [`LhsData`].
//!
//! Any execution or mapping failure aborts the whole run: results gathered
//! for earlier pages or scopes are discarded and only the error is returned.

mod models;
mod query;

pub use models::{IssueSummary, Label, LhsData, PullRequestDetail};
pub use query::{MAX_PAGE_SIZE, Stream, lhs_document, lhs_query};

use std::fmt;

use super::error::IntakeError;
use super::gateway::QueryGateway;
use super::locator::{OrganizationName, Username};
use super::pagination::{PageInfo, PaginatedResult};
use crate::graphql::{
    QueryDocument, Response, ResponseError, VariableName, VariableValue, Variables,
};

/// Per-scope progress of the fetch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    /// Filters seeded, no page requested yet.
    Initial,
    /// A page request is in flight.
    Fetching,
    /// Some, but not all, streams have reached their last page.
    PartiallyExhausted,
    /// Every stream has reached its last page.
    FullyExhausted,
}

impl fmt::Display for ScopeState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Initial => "initial",
            Self::Fetching => "fetching",
            Self::PartiallyExhausted => "partially exhausted",
            Self::FullyExhausted => "fully exhausted",
        };
        formatter.write_str(label)
    }
}

/// Fetches review requests, assignments and authored pull requests for one
/// user.
pub struct LhsFetcher<'gateway, G: QueryGateway + ?Sized> {
    gateway: &'gateway G,
    user: Username,
    page_size: u32,
    max_pages: Option<u32>,
}

impl<'gateway, G: QueryGateway + ?Sized> LhsFetcher<'gateway, G> {
    /// Creates a fetcher requesting full pages with no page bound.
    #[must_use]
    pub const fn new(gateway: &'gateway G, user: Username) -> Self {
        Self {
            gateway,
            user,
            page_size: MAX_PAGE_SIZE,
            max_pages: None,
        }
    }

    /// Sets how many items each search returns per page.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidPagination`] unless `page_size` is in
    /// `1..=100`.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self, IntakeError> {
        if page_size == 0 {
            return Err(IntakeError::InvalidPagination {
                message: "page size must be at least 1".to_owned(),
            });
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(IntakeError::InvalidPagination {
                message: format!("page size must not exceed {MAX_PAGE_SIZE}"),
            });
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// Bounds the number of requests issued per scope.
    ///
    /// `None` keeps requesting until every stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidPagination`] for a bound of zero.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Result<Self, IntakeError> {
        if max_pages == Some(0) {
            return Err(IntakeError::InvalidPagination {
                message: "page limit must be at least 1".to_owned(),
            });
        }
        self.max_pages = max_pages;
        Ok(self)
    }

    /// Fetches every stream for each scope in order, or once unscoped when
    /// `scopes` is empty.
    ///
    /// # Errors
    ///
    /// Returns the first execution, decoding, or mapping error encountered;
    /// no partial results are returned. Returns
    /// [`IntakeError::PaginationLimitExceeded`] when a page bound is set and a
    /// stream still has pages once it is reached.
    pub async fn fetch_all(&self, scopes: &[OrganizationName]) -> Result<LhsData, IntakeError> {
        let document = lhs_document(self.page_size)?;
        let mut streams = Accumulators::default();

        if scopes.is_empty() {
            self.fetch_scope(&document, &mut streams, None).await?;
        } else {
            for scope in scopes {
                self.fetch_scope(&document, &mut streams, Some(scope))
                    .await?;
            }
        }

        let data = streams.into_data();
        tracing::info!(
            user = %self.user,
            review_requested = data.review_requested.len(),
            assigned = data.assigned.len(),
            open_authored = data.open_authored.len(),
            "sidebar fetch complete"
        );
        Ok(data)
    }

    async fn fetch_scope(
        &self,
        document: &QueryDocument,
        streams: &mut Accumulators,
        scope: Option<&OrganizationName>,
    ) -> Result<(), IntakeError> {
        let scope_label = scope.map_or_else(|| "all".to_owned(), ToString::to_string);
        let mut state = ScopeState::Initial;
        let mut variables = self.seed_variables(scope)?;
        let mut pages = 0_u32;
        streams.begin_scope();

        while state != ScopeState::FullyExhausted {
            if let Some(limit) = self.max_pages.filter(|limit| pages >= *limit) {
                let stream = streams.first_pending().unwrap_or(Stream::OpenItems);
                return Err(IntakeError::PaginationLimitExceeded {
                    stream: stream.label(),
                    scope: scope_label,
                    pages: limit,
                });
            }

            transition(&mut state, ScopeState::Fetching, &scope_label);
            for stream in Stream::ALL {
                variables.set(
                    VariableName::new(stream.cursor_variable())?,
                    VariableValue::OptionalString(streams.cursor(stream).map(ToOwned::to_owned)),
                );
            }

            pages += 1;
            tracing::debug!(scope = %scope_label, page = pages, "requesting sidebar page");
            let value = self.gateway.execute(document, &variables).await?;
            let response = Response::from_value(Some(&value))?;
            streams.absorb(&response)?;

            let next = if streams.first_pending().is_none() {
                ScopeState::FullyExhausted
            } else if Stream::ALL.iter().any(|stream| streams.is_exhausted(*stream)) {
                ScopeState::PartiallyExhausted
            } else {
                ScopeState::Fetching
            };
            transition(&mut state, next, &scope_label);
        }

        tracing::debug!(scope = %scope_label, pages, "scope exhausted");
        Ok(())
    }

    fn seed_variables(&self, scope: Option<&OrganizationName>) -> Result<Variables, IntakeError> {
        let mut variables = Variables::new();
        for stream in Stream::ALL {
            variables.set(
                VariableName::new(stream.query_variable())?,
                VariableValue::String(stream.filter(&self.user, scope)),
            );
        }
        Ok(variables)
    }
}

fn transition(state: &mut ScopeState, next: ScopeState, scope: &str) {
    if *state != next {
        tracing::trace!(scope, from = %state, to = %next, "scope state changed");
        *state = next;
    }
}

#[derive(Debug, Default)]
struct Accumulators {
    open_authored: PaginatedResult<PullRequestDetail>,
    review_requested: PaginatedResult<PullRequestDetail>,
    assigned: PaginatedResult<IssueSummary>,
}

impl Accumulators {
    fn begin_scope(&mut self) {
        self.open_authored.begin_scope();
        self.review_requested.begin_scope();
        self.assigned.begin_scope();
    }

    const fn is_exhausted(&self, stream: Stream) -> bool {
        match stream {
            Stream::OpenItems => self.open_authored.is_exhausted(),
            Stream::ReviewRequested => self.review_requested.is_exhausted(),
            Stream::Assignments => self.assigned.is_exhausted(),
        }
    }

    fn cursor(&self, stream: Stream) -> Option<&str> {
        match stream {
            Stream::OpenItems => self.open_authored.cursor(),
            Stream::ReviewRequested => self.review_requested.cursor(),
            Stream::Assignments => self.assigned.cursor(),
        }
    }

    fn first_pending(&self) -> Option<Stream> {
        Stream::ALL
            .into_iter()
            .find(|stream| !self.is_exhausted(*stream))
    }

    /// Appends one page for every stream that still has pages.
    fn absorb(&mut self, response: &Response) -> Result<(), IntakeError> {
        for stream in Stream::ALL {
            if self.is_exhausted(stream) {
                continue;
            }
            let search = response.object(stream.alias())?;
            let page = PageInfo::from_response(search.object("pageInfo")?)?;
            let nodes = search.objects("nodes")?;
            match stream {
                Stream::OpenItems => {
                    let items = map_nodes(&nodes, models::pull_request_from_node)?;
                    self.open_authored.absorb(items, page)?;
                }
                Stream::ReviewRequested => {
                    let items = map_nodes(&nodes, models::pull_request_from_node)?;
                    self.review_requested.absorb(items, page)?;
                }
                Stream::Assignments => {
                    let items = map_nodes(&nodes, models::issue_from_node)?;
                    self.assigned.absorb(items, page)?;
                }
            }
        }
        Ok(())
    }

    fn into_data(self) -> LhsData {
        LhsData {
            review_requested: self.review_requested.into_items(),
            assigned: self.assigned.into_items(),
            open_authored: self.open_authored.into_items(),
        }
    }
}

fn map_nodes<T>(
    nodes: &[&Response],
    map: fn(&Response) -> Result<T, ResponseError>,
) -> Result<Vec<T>, IntakeError> {
    nodes
        .iter()
        .copied()
        .map(|node| map(node).map_err(IntakeError::from))
        .collect()
}
