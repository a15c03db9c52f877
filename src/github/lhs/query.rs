//! Shape of the sidebar query and its three sub-searches.

use crate::github::locator::{OrganizationName, Username};
use crate::graphql::{
    ArgumentKey, CompositeObject, Node, QueryDocument, QueryError, UnionVariant, compile,
};

/// Largest page GitHub's search connection will return.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Labels requested per item.
const LABEL_PAGE_SIZE: u32 = 20;

/// One of the independently paginated sub-searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Open pull requests authored by the user.
    OpenItems,
    /// Open pull requests awaiting the user's review.
    ReviewRequested,
    /// Open issues and pull requests assigned to the user.
    Assignments,
}

impl Stream {
    /// Every stream, in request order.
    pub const ALL: [Self; 3] = [Self::OpenItems, Self::ReviewRequested, Self::Assignments];

    /// Response key of the aliased search field.
    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::OpenItems => "openItems",
            Self::ReviewRequested => "reviewRequested",
            Self::Assignments => "assignments",
        }
    }

    /// Human-readable name used in logs and errors.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenItems => "open items",
            Self::ReviewRequested => "review requested",
            Self::Assignments => "assignments",
        }
    }

    /// Variable carrying the search filter.
    #[must_use]
    pub const fn query_variable(self) -> &'static str {
        match self {
            Self::OpenItems => "openQuery",
            Self::ReviewRequested => "reviewQuery",
            Self::Assignments => "assigneeQuery",
        }
    }

    /// Variable carrying the `after` cursor.
    #[must_use]
    pub const fn cursor_variable(self) -> &'static str {
        match self {
            Self::OpenItems => "openCursor",
            Self::ReviewRequested => "reviewCursor",
            Self::Assignments => "assigneeCursor",
        }
    }

    /// Search filter for `user`, optionally restricted to one organisation.
    ///
    /// # Example
    ///
    /// ```
    /// use queryloom::github::lhs::Stream;
    /// use queryloom::github::{OrganizationName, Username};
    ///
    /// let user = Username::new("octocat").expect("valid username");
    /// let org = OrganizationName::new("github").expect("valid organisation");
    /// assert_eq!(
    ///     Stream::Assignments.filter(&user, Some(&org)),
    ///     "org:github is:open assignee:octocat archived:false"
    /// );
    /// ```
    #[must_use]
    pub fn filter(self, user: &Username, scope: Option<&OrganizationName>) -> String {
        let base = match self {
            Self::OpenItems => format!("is:open is:pr author:{user} archived:false"),
            Self::ReviewRequested => {
                format!("is:open is:pr review-requested:{user} archived:false")
            }
            Self::Assignments => format!("is:open assignee:{user} archived:false"),
        };
        scope.map_or_else(|| base.clone(), |org| format!("org:{org} {base}"))
    }

    const fn includes_issues(self) -> bool {
        matches!(self, Self::Assignments)
    }
}

/// Builds the element tree for the sidebar query.
///
/// # Errors
///
/// Returns [`QueryError::InvalidArgument`] when `page_size` is zero.
pub fn lhs_query(page_size: u32) -> Result<CompositeObject, QueryError> {
    let mut root = CompositeObject::new("LeftHandSide")?;
    for stream in Stream::ALL {
        root.add_child(search(stream, page_size)?);
    }
    Ok(root)
}

/// Compiles [`lhs_query`] against the default registry.
///
/// # Errors
///
/// Propagates construction and compilation failures.
pub fn lhs_document(page_size: u32) -> Result<QueryDocument, QueryError> {
    compile(&lhs_query(page_size)?)
}

fn search(stream: Stream, page_size: u32) -> Result<CompositeObject, QueryError> {
    let page_info = CompositeObject::new("PageInfo")?
        .scalar("EndCursor", "String")?
        .scalar("HasNextPage", "Boolean")?;

    let mut nodes = Node::list().with_union(pull_request_fragment()?);
    if stream.includes_issues() {
        nodes = nodes.with_union(issue_fragment()?);
    }

    let mut search = CompositeObject::new("Search")?
        .with_alias(stream.alias())?
        .scalar("IssueCount", "Int")?
        .with_child(page_info)
        .with_node_list(nodes)?;
    search
        .args_mut()
        .bind(ArgumentKey::Query, stream.query_variable())?
        .search_type("issue")?
        .first(page_size)?
        .bind(ArgumentKey::After, stream.cursor_variable())?;
    Ok(search)
}

fn pull_request_fragment() -> Result<UnionVariant, QueryError> {
    let common = with_issue_fields(UnionVariant::new("PullRequest")?)?;
    common
        .scalar("Additions", "Int")?
        .scalar("Deletions", "Int")?
        .scalar("ChangedFiles", "Int")
}

fn issue_fragment() -> Result<UnionVariant, QueryError> {
    with_issue_fields(UnionVariant::new("Issue")?)
}

fn with_issue_fields(variant: UnionVariant) -> Result<UnionVariant, QueryError> {
    let author = CompositeObject::new("Author")?.scalar("Login", "String")?;
    let milestone = CompositeObject::new("Milestone")?.scalar("Title", "String")?;
    let mut labels = CompositeObject::new("Labels")?.with_node_list(
        Node::list()
            .scalar("Name", "String")?
            .scalar("Color", "String")?,
    )?;
    labels.args_mut().first(LABEL_PAGE_SIZE)?;

    Ok(variant
        .scalar("Number", "Int")?
        .scalar("Title", "String")?
        .scalar("Url", "URI")?
        .scalar("CreatedAt", "DateTime")?
        .scalar("UpdatedAt", "DateTime")?
        .with_child(author)
        .with_child(milestone)
        .with_child(labels))
}
