//! Result shapes produced by the sidebar fetch.

use crate::graphql::{Response, ResponseError};

/// Issue label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Hex colour without the leading `#`.
    pub color: String,
}

/// Fields shared by issues and pull requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    /// Issue or pull request number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Author login, absent for deleted accounts.
    pub author: Option<String>,
    /// HTML URL.
    pub url: String,
    /// Creation time as `YYYY-MM-DD, HH:MM:SS` (UTC).
    pub created_at: String,
    /// Last update time as `YYYY-MM-DD, HH:MM:SS` (UTC).
    pub updated_at: String,
    /// Milestone title if one is set.
    pub milestone: Option<String>,
    /// Labels in server order.
    pub labels: Vec<Label>,
}

/// Pull request with diff statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDetail {
    /// Common issue fields.
    pub summary: IssueSummary,
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
    /// Files touched.
    pub changed_files: u64,
}

/// Merged output of all three sub-searches across every scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LhsData {
    /// Pull requests awaiting the user's review.
    pub review_requested: Vec<PullRequestDetail>,
    /// Issues and pull requests assigned to the user.
    pub assigned: Vec<IssueSummary>,
    /// Pull requests the user opened.
    pub open_authored: Vec<PullRequestDetail>,
}

impl LhsData {
    /// Total number of items across the three lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.review_requested.len() + self.assigned.len() + self.open_authored.len()
    }

    /// Returns true when every list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const PULL_REQUEST: &str = "PullRequest";
const ISSUE: &str = "Issue";

/// Maps a search node to a pull request.
///
/// # Errors
///
/// Fails when the node is not a pull request or a field is missing or
/// mistyped.
pub(super) fn pull_request_from_node(node: &Response) -> Result<PullRequestDetail, ResponseError> {
    let fragment = fragment(node, PULL_REQUEST)?;
    Ok(PullRequestDetail {
        summary: summary_from_fragment(fragment)?,
        additions: count(fragment, "additions")?,
        deletions: count(fragment, "deletions")?,
        changed_files: count(fragment, "changedFiles")?,
    })
}

/// Maps a search node tagged as either an issue or a pull request.
///
/// # Errors
///
/// Fails when the node is neither, or a field is missing or mistyped.
pub(super) fn issue_from_node(node: &Response) -> Result<IssueSummary, ResponseError> {
    let type_name = node.type_name().unwrap_or_default();
    let fragment = if type_name == ISSUE {
        fragment(node, ISSUE)?
    } else {
        fragment(node, PULL_REQUEST)?
    };
    summary_from_fragment(fragment)
}

fn fragment<'node>(
    node: &'node Response,
    type_name: &'static str,
) -> Result<&'node Response, ResponseError> {
    if node.type_name() != Some(type_name) {
        return Err(ResponseError::UnexpectedShape {
            key: "__typename".to_owned(),
            expected: type_name,
        });
    }
    node.object(type_name)
}

fn summary_from_fragment(fragment: &Response) -> Result<IssueSummary, ResponseError> {
    let author = fragment
        .opt_object("author")?
        .map(|author| author.str("login").map(ToOwned::to_owned))
        .transpose()?;
    let milestone = fragment
        .opt_object("milestone")?
        .map(|milestone| milestone.str("title").map(ToOwned::to_owned))
        .transpose()?;
    let labels = fragment
        .opt_object("labels")?
        .map(labels_from_connection)
        .transpose()?
        .unwrap_or_default();

    Ok(IssueSummary {
        number: count(fragment, "number")?,
        title: fragment.str("title")?.to_owned(),
        author,
        url: fragment.str("url")?.to_owned(),
        created_at: fragment.str("createdAt")?.to_owned(),
        updated_at: fragment.str("updatedAt")?.to_owned(),
        milestone,
        labels,
    })
}

fn labels_from_connection(connection: &Response) -> Result<Vec<Label>, ResponseError> {
    connection
        .objects("nodes")?
        .into_iter()
        .map(|label| {
            Ok(Label {
                name: label.str("name")?.to_owned(),
                color: label.str("color")?.to_owned(),
            })
        })
        .collect()
}

fn count(response: &Response, key: &str) -> Result<u64, ResponseError> {
    u64::try_from(response.int(key)?).map_err(|_| ResponseError::UnexpectedShape {
        key: key.to_owned(),
        expected: "a non-negative integer",
    })
}
