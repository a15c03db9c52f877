//! Scalar type registry.
//!
//! Maps semantic scalar kind names (`String`, `DateTime`, `MergeableState`,
//! ...) to the [`LeafType`] used by compiled documents to decode response
//! values. Lookup is case-insensitive. Additional kinds are supported by
//! registering another [`ScalarResolver`].

use super::error::QueryError;

/// A GraphQL enum accepted as a leaf value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumType {
    name: &'static str,
    values: &'static [&'static str],
}

impl EnumType {
    /// Declares an enum with its permitted wire values.
    #[must_use]
    pub const fn new(name: &'static str, values: &'static [&'static str]) -> Self {
        Self { name, values }
    }

    /// Schema name of the enum.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true when `value` is one of the enum's members.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        self.values.contains(&value)
    }
}

/// Concrete leaf container for a resolved scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafType {
    /// UTF-8 text.
    String,
    /// Signed integer.
    Int,
    /// Opaque object identifier.
    Id,
    /// Boolean flag.
    Boolean,
    /// Floating point number.
    Float,
    /// Absolute URI, decoded into a [`url::Url`].
    Uri,
    /// Rendered HTML fragment.
    Html,
    /// Calendar date (`YYYY-MM-DD`).
    Date,
    /// RFC 3339 timestamp.
    DateTime,
    /// Schema enum.
    Enum(EnumType),
}

/// Mergeability of a pull request.
pub const MERGEABLE_STATE: EnumType =
    EnumType::new("MergeableState", &["MERGEABLE", "CONFLICTING", "UNKNOWN"]);

/// Issue lifecycle state.
pub const ISSUE_STATE: EnumType = EnumType::new("IssueState", &["OPEN", "CLOSED"]);

/// Pull request lifecycle state.
pub const PULL_REQUEST_STATE: EnumType =
    EnumType::new("PullRequestState", &["OPEN", "CLOSED", "MERGED"]);

/// Aggregate review decision on a pull request.
pub const REVIEW_DECISION: EnumType = EnumType::new(
    "PullRequestReviewDecision",
    &["CHANGES_REQUESTED", "APPROVED", "REVIEW_REQUIRED"],
);

/// Claims scalar kinds for the registry.
///
/// `kind` is passed lower-cased. Resolvers must not claim overlapping kinds.
pub trait ScalarResolver: Send + Sync {
    /// Returns the leaf type for `kind`, or `None` when this resolver does not
    /// know it.
    fn resolve(&self, kind: &str) -> Option<LeafType>;
}

/// The schema's built-in scalars plus the common custom scalars.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinScalars;

impl ScalarResolver for BuiltinScalars {
    fn resolve(&self, kind: &str) -> Option<LeafType> {
        match kind {
            "string" => Some(LeafType::String),
            "int" | "integer" => Some(LeafType::Int),
            "id" => Some(LeafType::Id),
            "boolean" => Some(LeafType::Boolean),
            "float" => Some(LeafType::Float),
            "uri" => Some(LeafType::Uri),
            "html" => Some(LeafType::Html),
            "date" => Some(LeafType::Date),
            "datetime" => Some(LeafType::DateTime),
            _ => None,
        }
    }
}

/// Domain enums used by issue and pull request queries.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitHubEnums;

impl ScalarResolver for GitHubEnums {
    fn resolve(&self, kind: &str) -> Option<LeafType> {
        [
            MERGEABLE_STATE,
            ISSUE_STATE,
            PULL_REQUEST_STATE,
            REVIEW_DECISION,
        ]
        .into_iter()
        .find(|candidate| candidate.name().eq_ignore_ascii_case(kind))
        .map(LeafType::Enum)
    }
}

/// Ordered collection of scalar resolvers.
pub struct TypeRegistry {
    resolvers: Vec<Box<dyn ScalarResolver>>,
}

impl TypeRegistry {
    /// Creates a registry with no resolvers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Adds a resolver.
    pub fn register(&mut self, resolver: impl ScalarResolver + 'static) {
        self.resolvers.push(Box::new(resolver));
    }

    /// Builder-style variant of [`TypeRegistry::register`].
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl ScalarResolver + 'static) -> Self {
        self.register(resolver);
        self
    }

    /// Resolves a scalar kind, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownScalarKind`] when no resolver claims
    /// `kind`.
    pub fn resolve(&self, kind: &str) -> Result<LeafType, QueryError> {
        let lowered = kind.to_ascii_lowercase();
        self.resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(&lowered))
            .ok_or_else(|| QueryError::UnknownScalarKind {
                kind: kind.to_owned(),
            })
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::empty()
            .with_resolver(BuiltinScalars)
            .with_resolver(GitHubEnums)
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TypeRegistry")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{
        EnumType, LeafType, MERGEABLE_STATE, REVIEW_DECISION, ScalarResolver, TypeRegistry,
    };
    use crate::graphql::error::QueryError;

    #[fixture]
    fn registry() -> TypeRegistry {
        TypeRegistry::default()
    }

    #[rstest]
    #[case("ID")]
    #[case("id")]
    #[case("Id")]
    fn id_resolves_regardless_of_case(registry: TypeRegistry, #[case] kind: &str) {
        assert_eq!(registry.resolve(kind), Ok(LeafType::Id));
    }

    #[rstest]
    #[case("String", LeafType::String)]
    #[case("Int", LeafType::Int)]
    #[case("Boolean", LeafType::Boolean)]
    #[case("Float", LeafType::Float)]
    #[case("URI", LeafType::Uri)]
    #[case("HTML", LeafType::Html)]
    #[case("Date", LeafType::Date)]
    #[case("DateTime", LeafType::DateTime)]
    #[case("mergeablestate", LeafType::Enum(MERGEABLE_STATE))]
    #[case("PullRequestReviewDecision", LeafType::Enum(REVIEW_DECISION))]
    fn resolves_builtin_kinds(
        registry: TypeRegistry,
        #[case] kind: &str,
        #[case] expected: LeafType,
    ) {
        assert_eq!(registry.resolve(kind), Ok(expected));
    }

    #[rstest]
    fn unknown_kind_fails(registry: TypeRegistry) {
        let result = registry.resolve("not-a-type");
        assert_eq!(
            result,
            Err(QueryError::UnknownScalarKind {
                kind: "not-a-type".to_owned()
            })
        );
    }

    #[rstest]
    fn empty_registry_knows_nothing() {
        let result = TypeRegistry::empty().resolve("String");
        assert!(
            matches!(result, Err(QueryError::UnknownScalarKind { .. })),
            "expected UnknownScalarKind, got {result:?}"
        );
    }

    struct ReactionContent;

    const REACTION_CONTENT: EnumType = EnumType::new("ReactionContent", &["THUMBS_UP", "HEART"]);

    impl ScalarResolver for ReactionContent {
        fn resolve(&self, kind: &str) -> Option<LeafType> {
            (kind == "reactioncontent").then_some(LeafType::Enum(REACTION_CONTENT))
        }
    }

    #[rstest]
    fn registered_resolver_extends_lookup(registry: TypeRegistry) {
        let extended = registry.with_resolver(ReactionContent);
        assert_eq!(
            extended.resolve("ReactionContent"),
            Ok(LeafType::Enum(REACTION_CONTENT))
        );
        assert_eq!(extended.resolve("String"), Ok(LeafType::String));
    }

    #[rstest]
    fn enum_type_checks_membership() {
        assert!(MERGEABLE_STATE.accepts("CONFLICTING"));
        assert!(!MERGEABLE_STATE.accepts("conflicting"));
    }
}
