//! Composable description of the query shape a caller wants.
//!
//! Elements validate eagerly: names, kinds, arguments, and node flavours are
//! checked when set. The one deferred rule is that an object must select at
//! least one field, which the builder enforces because content is appended
//! incrementally. Appends preserve order and never de-duplicate.

use super::arguments::ArgumentSet;
use super::error::QueryError;
use super::identifier::Identifier;

/// A terminal field with a scalar kind, e.g. `Title: String`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarLeaf {
    name: Identifier,
    kind: Identifier,
}

impl ScalarLeaf {
    /// Creates a leaf named `name` of scalar kind `kind`.
    ///
    /// The kind is checked against the registry at compile time.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidIdentifier`] for a malformed name or kind.
    pub fn new(name: &str, kind: &str) -> Result<Self, QueryError> {
        Ok(Self {
            name: Identifier::new(name)?,
            kind: Identifier::new(kind)?,
        })
    }

    /// Field name.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Declared scalar kind.
    #[must_use]
    pub const fn kind(&self) -> &Identifier {
        &self.kind
    }
}

/// Whether a node wraps one nested shape or a sequence of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Rendered as a `node` field.
    Single,
    /// Rendered as a `nodes` list field.
    List,
}

impl NodeKind {
    /// Human readable flavour name used in errors.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "node",
            Self::List => "node list",
        }
    }

    /// Wire field name.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Single => "node",
            Self::List => "nodes",
        }
    }
}

/// One level of nesting below a composite: `node { ... }` or `nodes { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    scalars: Vec<ScalarLeaf>,
    children: Vec<CompositeObject>,
    unions: Vec<UnionVariant>,
}

impl Node {
    /// A single nested shape.
    #[must_use]
    pub const fn single() -> Self {
        Self::with_kind(NodeKind::Single)
    }

    /// A sequence of the nested shape.
    #[must_use]
    pub const fn list() -> Self {
        Self::with_kind(NodeKind::List)
    }

    const fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            scalars: Vec::new(),
            children: Vec::new(),
            unions: Vec::new(),
        }
    }

    /// Node flavour.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Appends a scalar leaf.
    pub fn add_scalar(&mut self, scalar: ScalarLeaf) -> &mut Self {
        self.scalars.push(scalar);
        self
    }

    /// Appends a nested object.
    pub fn add_child(&mut self, child: CompositeObject) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Appends a union variant.
    pub fn add_union(&mut self, variant: UnionVariant) -> &mut Self {
        self.unions.push(variant);
        self
    }

    /// Builder-style scalar append from a name and kind.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidIdentifier`] for a malformed name or kind.
    pub fn scalar(mut self, name: &str, kind: &str) -> Result<Self, QueryError> {
        self.add_scalar(ScalarLeaf::new(name, kind)?);
        Ok(self)
    }

    /// Builder-style child append.
    #[must_use]
    pub fn with_child(mut self, child: CompositeObject) -> Self {
        self.add_child(child);
        self
    }

    /// Builder-style union append.
    #[must_use]
    pub fn with_union(mut self, variant: UnionVariant) -> Self {
        self.add_union(variant);
        self
    }

    pub(crate) fn scalars(&self) -> &[ScalarLeaf] {
        &self.scalars
    }

    pub(crate) fn children(&self) -> &[CompositeObject] {
        &self.children
    }

    pub(crate) fn unions(&self) -> &[UnionVariant] {
        &self.unions
    }
}

/// A field with nested selections and an optional argument set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeObject {
    name: Identifier,
    alias: Option<Identifier>,
    scalars: Vec<ScalarLeaf>,
    children: Vec<CompositeObject>,
    unions: Vec<UnionVariant>,
    node: Option<Node>,
    args: ArgumentSet,
}

impl CompositeObject {
    /// Creates an empty object named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidIdentifier`] for a malformed name.
    pub fn new(name: &str) -> Result<Self, QueryError> {
        Ok(Self {
            name: Identifier::new(name)?,
            alias: None,
            scalars: Vec::new(),
            children: Vec::new(),
            unions: Vec::new(),
            node: None,
            args: ArgumentSet::new(),
        })
    }

    /// Object name.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Alias under which the field is selected, if any.
    #[must_use]
    pub const fn alias(&self) -> Option<&Identifier> {
        self.alias.as_ref()
    }

    /// Selects the field under `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidIdentifier`] for a malformed alias.
    pub fn with_alias(mut self, alias: &str) -> Result<Self, QueryError> {
        self.alias = Some(Identifier::new(alias)?);
        Ok(self)
    }

    /// Argument set attached to this field.
    #[must_use]
    pub const fn args(&self) -> &ArgumentSet {
        &self.args
    }

    /// Mutable access to the argument set; setters validate.
    pub const fn args_mut(&mut self) -> &mut ArgumentSet {
        &mut self.args
    }

    /// Replaces the argument set.
    #[must_use]
    pub fn with_args(mut self, args: ArgumentSet) -> Self {
        self.args = args;
        self
    }

    /// Appends a scalar leaf.
    pub fn add_scalar(&mut self, scalar: ScalarLeaf) -> &mut Self {
        self.scalars.push(scalar);
        self
    }

    /// Appends a nested object.
    pub fn add_child(&mut self, child: Self) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Appends a union variant.
    pub fn add_union(&mut self, variant: UnionVariant) -> &mut Self {
        self.unions.push(variant);
        self
    }

    /// Builder-style scalar append from a name and kind.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidIdentifier`] for a malformed name or kind.
    pub fn scalar(mut self, name: &str, kind: &str) -> Result<Self, QueryError> {
        self.add_scalar(ScalarLeaf::new(name, kind)?);
        Ok(self)
    }

    /// Builder-style child append.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.add_child(child);
        self
    }

    /// Builder-style union append.
    #[must_use]
    pub fn with_union(mut self, variant: UnionVariant) -> Self {
        self.add_union(variant);
        self
    }

    /// Sets the single nested node.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::WrongNodeType`] when `node` is a list, and
    /// [`QueryError::NodeConflict`] when a node list is already set.
    pub fn set_node(&mut self, node: Node) -> Result<&mut Self, QueryError> {
        self.place_node(NodeKind::Single, node)
    }

    /// Sets the nested node list.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::WrongNodeType`] when `node` is a single node, and
    /// [`QueryError::NodeConflict`] when a single node is already set.
    pub fn set_node_list(&mut self, node: Node) -> Result<&mut Self, QueryError> {
        self.place_node(NodeKind::List, node)
    }

    /// Builder-style [`CompositeObject::set_node`].
    ///
    /// # Errors
    ///
    /// See [`CompositeObject::set_node`].
    pub fn with_node(mut self, node: Node) -> Result<Self, QueryError> {
        self.set_node(node)?;
        Ok(self)
    }

    /// Builder-style [`CompositeObject::set_node_list`].
    ///
    /// # Errors
    ///
    /// See [`CompositeObject::set_node_list`].
    pub fn with_node_list(mut self, node: Node) -> Result<Self, QueryError> {
        self.set_node_list(node)?;
        Ok(self)
    }

    fn place_node(&mut self, expected: NodeKind, node: Node) -> Result<&mut Self, QueryError> {
        if node.kind() != expected {
            return Err(QueryError::WrongNodeType {
                name: self.name.to_string(),
                expected: expected.label(),
                actual: node.kind().label(),
            });
        }
        if let Some(existing) = self.node.as_ref().filter(|current| current.kind() != expected) {
            return Err(QueryError::NodeConflict {
                name: self.name.to_string(),
                existing: existing.kind().label(),
            });
        }
        self.node = Some(node);
        Ok(self)
    }

    pub(crate) fn scalars(&self) -> &[ScalarLeaf] {
        &self.scalars
    }

    pub(crate) fn children(&self) -> &[Self] {
        &self.children
    }

    pub(crate) fn unions(&self) -> &[UnionVariant] {
        &self.unions
    }

    pub(crate) const fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }
}

/// A type-conditional fragment: `... on <Name> { ... }`.
///
/// Compiles like a [`CompositeObject`] whose name is the concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionVariant(CompositeObject);

impl UnionVariant {
    /// Creates a variant for the concrete type `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidIdentifier`] for a malformed name.
    pub fn new(type_name: &str) -> Result<Self, QueryError> {
        CompositeObject::new(type_name).map(Self)
    }

    /// Wraps an existing object as a variant.
    #[must_use]
    pub const fn from_object(object: CompositeObject) -> Self {
        Self(object)
    }

    /// Concrete type this fragment applies to.
    #[must_use]
    pub const fn type_name(&self) -> &Identifier {
        self.0.name()
    }

    /// The fragment's selections.
    #[must_use]
    pub const fn object(&self) -> &CompositeObject {
        &self.0
    }

    /// Mutable access to the fragment's selections.
    pub const fn object_mut(&mut self) -> &mut CompositeObject {
        &mut self.0
    }

    /// Builder-style scalar append.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidIdentifier`] for a malformed name or kind.
    pub fn scalar(self, name: &str, kind: &str) -> Result<Self, QueryError> {
        self.0.scalar(name, kind).map(Self)
    }

    /// Builder-style child append.
    #[must_use]
    pub fn with_child(self, child: CompositeObject) -> Self {
        Self(self.0.with_child(child))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{CompositeObject, Node, NodeKind, ScalarLeaf, UnionVariant};
    use crate::graphql::error::QueryError;

    #[rstest]
    fn scalar_leaf_validates_name_and_kind() {
        assert!(ScalarLeaf::new("Title", "String").is_ok());
        assert!(matches!(
            ScalarLeaf::new("Title2", "String"),
            Err(QueryError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            ScalarLeaf::new("Title", "not-a-type"),
            Err(QueryError::InvalidIdentifier { .. })
        ));
    }

    #[rstest]
    fn scalar_leaf_title_cases_name() {
        let leaf = ScalarLeaf::new("number", "int").expect("leaf should be valid");
        assert_eq!(leaf.name().as_str(), "Number");
        assert_eq!(leaf.kind().as_str(), "Int");
    }

    #[rstest]
    fn appends_preserve_order_without_dedup() {
        let object = CompositeObject::new("Issue")
            .and_then(|object| object.scalar("Title", "String"))
            .and_then(|object| object.scalar("Number", "Int"))
            .and_then(|object| object.scalar("Title", "String"))
            .expect("object should build");

        let names: Vec<&str> = object
            .scalars()
            .iter()
            .map(|leaf| leaf.name().as_str())
            .collect();
        assert_eq!(names, vec!["Title", "Number", "Title"]);
    }

    #[rstest]
    fn set_node_rejects_list() {
        let mut object = CompositeObject::new("Search").expect("object should build");
        let result = object.set_node(Node::list()).map(|_| ());
        assert_eq!(
            result,
            Err(QueryError::WrongNodeType {
                name: "Search".to_owned(),
                expected: "node",
                actual: "node list",
            })
        );
    }

    #[rstest]
    fn set_node_list_rejects_single() {
        let mut object = CompositeObject::new("Search").expect("object should build");
        let result = object.set_node_list(Node::single()).map(|_| ());
        assert!(
            matches!(result, Err(QueryError::WrongNodeType { .. })),
            "expected WrongNodeType, got {result:?}"
        );
    }

    #[rstest]
    fn node_and_node_list_are_exclusive() {
        let mut variant = UnionVariant::new("PullRequest").expect("variant should build");
        variant
            .object_mut()
            .set_node(Node::single())
            .expect("first node should be accepted");

        let result = variant.object_mut().set_node_list(Node::list()).map(|_| ());
        assert_eq!(
            result,
            Err(QueryError::NodeConflict {
                name: "PullRequest".to_owned(),
                existing: "node",
            })
        );
    }

    #[rstest]
    fn same_node_flavour_replaces() {
        let object = CompositeObject::new("Labels")
            .and_then(|object| object.with_node_list(Node::list()))
            .and_then(|object| {
                object.with_node_list(Node::list().scalar("Name", "String")?)
            })
            .expect("replacement should be accepted");

        let node = object.node().expect("node list should be set");
        assert_eq!(node.kind(), NodeKind::List);
        assert_eq!(node.scalars().len(), 1);
    }

    #[rstest]
    fn alias_is_validated() {
        let result = CompositeObject::new("Search").and_then(|object| object.with_alias("open items"));
        assert!(
            matches!(result, Err(QueryError::InvalidIdentifier { .. })),
            "expected InvalidIdentifier, got {result:?}"
        );
    }
}
