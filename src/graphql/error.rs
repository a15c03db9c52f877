//! Validation errors raised while describing or compiling a query.

use thiserror::Error;

/// Errors surfaced by the element model, the type registry, and the builder.
///
/// Every variant is terminal: the caller built an invalid query description
/// and retrying the same input produces the same failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A field, type, or alias name was empty or not purely alphabetic.
    #[error("invalid identifier `{value}`: identifiers must be non-empty and alphabetic")]
    InvalidIdentifier {
        /// The rejected input.
        value: String,
    },

    /// `first` and `last` were both requested on the same field.
    #[error("cannot set `{requested}` while `{existing}` is already set")]
    ConflictingPagination {
        /// The argument being set.
        requested: &'static str,
        /// The argument that is already present.
        existing: &'static str,
    },

    /// An argument value failed validation.
    #[error("invalid value for argument `{key}`: {message}")]
    InvalidArgument {
        /// Argument key.
        key: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// No registered resolver recognises the scalar kind.
    #[error("unknown scalar kind `{kind}`")]
    UnknownScalarKind {
        /// Kind name as written by the caller.
        kind: String,
    },

    /// An object has no scalars, children, unions, node, or node list.
    #[error("object `{name}` selects no fields")]
    EmptyObject {
        /// Name of the empty object.
        name: String,
    },

    /// A node was passed to the setter for the other node flavour.
    #[error("`{name}` expected a {expected} but received a {actual}")]
    WrongNodeType {
        /// Name of the object receiving the node.
        name: String,
        /// Node flavour the setter accepts.
        expected: &'static str,
        /// Node flavour that was supplied.
        actual: &'static str,
    },

    /// A node and a node list were both set on one object.
    #[error("`{name}` already carries a {existing}")]
    NodeConflict {
        /// Name of the object.
        name: String,
        /// Node flavour already present.
        existing: &'static str,
    },

    /// The root operation object carried an argument set.
    #[error("root operation `{name}` cannot carry arguments")]
    RootArguments {
        /// Operation name.
        name: String,
    },

    /// A document references a variable with no binding.
    #[error("variable `${name}` is referenced but not bound")]
    UnboundVariable {
        /// Variable name without the `$` sigil.
        name: String,
    },
}
