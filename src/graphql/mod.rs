//! Dynamic GraphQL query construction.
//!
//! Callers describe the shape they want with the element model
//! ([`CompositeObject`], [`ScalarLeaf`], [`UnionVariant`], [`Node`]), compile
//! it with a [`QueryBuilder`] into a [`QueryDocument`], and read the decoded
//! result through [`Response`]. Scalar kinds resolve through the
//! [`TypeRegistry`].

pub mod arguments;
pub mod builder;
pub mod document;
pub mod element;
pub mod error;
pub mod identifier;
pub mod registry;
pub mod response;
pub mod value;
pub mod variables;

pub use arguments::{ArgumentKey, ArgumentSet, ArgumentValue, SearchType, VariableName};
pub use builder::{QueryBuilder, compile};
pub use document::{Fragment, QueryDocument, Selection, SelectionSet, Shape};
pub use element::{CompositeObject, Node, NodeKind, ScalarLeaf, UnionVariant};
pub use error::QueryError;
pub use identifier::Identifier;
pub use registry::{EnumType, LeafType, ScalarResolver, TypeRegistry};
pub use response::{ChildKind, Response, ResponseError, ResponseValue};
pub use value::{DecodeError, Object, Value};
pub use variables::{VariableValue, Variables};
