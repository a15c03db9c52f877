//! Lowers an element model tree into a [`QueryDocument`].
//!
//! Compilation is depth-first and purely structural: for every object its
//! scalar leaves are resolved first, then nested objects, then the node or
//! node list, then union variants. Nothing here touches the network.

use std::collections::BTreeSet;

use super::arguments::VariableName;
use super::document::{Fragment, QueryDocument, Selection, SelectionSet, Shape};
use super::element::{CompositeObject, Node, NodeKind, ScalarLeaf, UnionVariant};
use super::error::QueryError;
use super::registry::TypeRegistry;

/// Compiles element trees using a type registry.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'registry> {
    registry: &'registry TypeRegistry,
}

struct Members<'element> {
    owner: String,
    scalars: &'element [ScalarLeaf],
    children: &'element [CompositeObject],
    node: Option<&'element Node>,
    unions: &'element [UnionVariant],
}

impl<'element> Members<'element> {
    fn of_object(object: &'element CompositeObject) -> Self {
        Self {
            owner: object.name().to_string(),
            scalars: object.scalars(),
            children: object.children(),
            node: object.node(),
            unions: object.unions(),
        }
    }

    fn of_node(owner: &str, node: &'element Node) -> Self {
        Self {
            owner: format!("{owner}.{}", node.kind().field_name()),
            scalars: node.scalars(),
            children: node.children(),
            node: None,
            unions: node.unions(),
        }
    }
}

impl<'registry> QueryBuilder<'registry> {
    /// Creates a builder resolving scalar kinds through `registry`.
    #[must_use]
    pub const fn new(registry: &'registry TypeRegistry) -> Self {
        Self { registry }
    }

    /// Compiles `root` into a document named after it.
    ///
    /// The root's own fields become the operation's top-level selections.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownScalarKind`] for an unresolvable leaf,
    /// [`QueryError::EmptyObject`] for any object (or node, or fragment) that
    /// selects nothing, and [`QueryError::RootArguments`] when the root
    /// carries arguments.
    pub fn compile(&self, root: &CompositeObject) -> Result<QueryDocument, QueryError> {
        if !root.args().is_empty() {
            return Err(QueryError::RootArguments {
                name: root.name().to_string(),
            });
        }
        let mut variables = BTreeSet::new();
        let selections = self.compile_members(&Members::of_object(root), &mut variables)?;
        Ok(QueryDocument::new(
            root.name().to_string(),
            selections,
            variables,
        ))
    }

    fn compile_members(
        &self,
        members: &Members<'_>,
        variables: &mut BTreeSet<VariableName>,
    ) -> Result<SelectionSet, QueryError> {
        let mut set = SelectionSet::default();

        for scalar in members.scalars {
            let leaf = self.registry.resolve(scalar.kind().as_str())?;
            let key = scalar.name().field_name();
            set.push_field(Selection::new(key.clone(), key, Shape::Leaf(leaf)));
        }

        for child in members.children {
            set.push_field(self.compile_object(child, variables)?);
        }

        if let Some(node) = members.node {
            let nested = self.compile_members(&Members::of_node(&members.owner, node), variables)?;
            let shape = match node.kind() {
                NodeKind::Single => Shape::Object(nested),
                NodeKind::List => Shape::List(Box::new(Shape::Object(nested))),
            };
            let key = node.kind().field_name().to_owned();
            set.push_field(Selection::new(key.clone(), key, shape));
        }

        for variant in members.unions {
            set.push_fragment(self.compile_variant(variant, variables)?);
        }

        if set.is_empty() {
            return Err(QueryError::EmptyObject {
                name: members.owner.clone(),
            });
        }
        Ok(set)
    }

    fn compile_object(
        &self,
        object: &CompositeObject,
        variables: &mut BTreeSet<VariableName>,
    ) -> Result<Selection, QueryError> {
        let nested = self.compile_members(&Members::of_object(object), variables)?;
        variables.extend(object.args().variables().cloned());

        let head = object.args().render(object.name());
        let (key, tag) = match object.alias() {
            Some(alias) => {
                let alias_key = alias.field_name();
                let aliased = format!("{alias_key}: {head}");
                (alias_key, aliased)
            }
            None => (object.name().field_name(), head),
        };
        Ok(Selection::new(key, tag, Shape::Object(nested)))
    }

    fn compile_variant(
        &self,
        variant: &UnionVariant,
        variables: &mut BTreeSet<VariableName>,
    ) -> Result<Fragment, QueryError> {
        let object = variant.object();
        if let Some((key, _)) = object.args().iter().next() {
            return Err(QueryError::InvalidArgument {
                key: key.as_str(),
                message: format!("fragment on `{}` cannot carry arguments", object.name()),
            });
        }
        let nested = self.compile_members(&Members::of_object(object), variables)?;
        Ok(Fragment::new(object.name().to_string(), nested))
    }
}

/// Compiles `root` with the default registry.
///
/// # Errors
///
/// See [`QueryBuilder::compile`].
pub fn compile(root: &CompositeObject) -> Result<QueryDocument, QueryError> {
    let registry = TypeRegistry::default();
    QueryBuilder::new(&registry).compile(root)
}
