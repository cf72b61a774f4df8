use std::fmt;
use std::num::{NonZeroU32, NonZeroUsize};

use super::{
    builtins::BuiltinType,
    type_name::{format_type_name, TypeFlags},
};

/// A handle to a [`ResolvedType`] stored in a [`TypeGraph`].
///
/// Handles are only meaningful for the graph that produced them.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef(NonZeroU32);

impl NodeRef {
    fn from_index(index: usize) -> Self {
        let id = NonZeroUsize::new(index + 1)
            .and_then(|id| NonZeroU32::try_from(id).ok())
            .expect("type graph exceeded 32-bit node IDs");
        Self(id)
    }

    fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<type #{}>", self.0)
    }
}

/// The structural detail of a resolved type. Exactly one shape applies per node; `Unknown` is the
/// absence of any detail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// Neither a struct, a variant nor a built-in. The value codec may still know the name as a
    /// wire primitive.
    Unknown,
    Builtin(BuiltinType),
    Struct(Vec<ResolvedField>),
    Variant(Vec<NodeRef>),
    /// Cycle closure: the name was already expanded at the referenced node.
    Other(NodeRef),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub type_: NodeRef,
}

/// A node of the resolved type graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedType {
    /// Base name after alias substitution, without modifier suffixes
    pub name: String,
    pub flags: TypeFlags,
    /// The node that referenced this one. Only used for diagnostics.
    pub parent: Option<NodeRef>,
    pub kind: TypeKind,
}

impl ResolvedType {
    /// The reference string this node stands for, with its modifier suffixes.
    pub fn full_name(&self) -> String {
        format_type_name(&self.name, self.flags)
    }
}

/// Arena holding every node built by one resolution request.
#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    nodes: Vec<ResolvedType>,
    root: Option<NodeRef>,
}

impl TypeGraph {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn push(&mut self, node: ResolvedType) -> NodeRef {
        self.nodes.push(node);
        NodeRef::from_index(self.nodes.len() - 1)
    }

    pub(super) fn set_kind(&mut self, ref_: NodeRef, kind: TypeKind) {
        self.get_mut(ref_).kind = kind;
    }

    pub(super) fn kind_mut(&mut self, ref_: NodeRef) -> &mut TypeKind {
        &mut self.get_mut(ref_).kind
    }

    pub(super) fn set_root(&mut self, root: NodeRef) {
        self.root = Some(root);
    }

    /// The node for the reference string the graph was resolved from.
    pub fn root(&self) -> NodeRef {
        self.root.expect("type graph has no root")
    }

    /// Retrieves a node by reference, panicking if the reference belongs to another graph.
    pub fn get(&self, ref_: NodeRef) -> &ResolvedType {
        self.nodes
            .get(ref_.index())
            .expect("Invalid type reference (out-of-bounds)")
    }

    fn get_mut(&mut self, ref_: NodeRef) -> &mut ResolvedType {
        self.nodes
            .get_mut(ref_.index())
            .expect("Invalid type reference (out-of-bounds)")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, ref_: NodeRef) -> Option<NodeRef> {
        self.get(ref_).parent
    }

    /// Follows a cycle closure to the node that carries the structural detail.
    ///
    /// The flags of the referring node still apply to the value; only the kind is borrowed.
    pub fn structure(&self, ref_: NodeRef) -> &ResolvedType {
        let mut node = self.get(ref_);
        // Closures always point at an expanded node, the bound only guards malformed graphs.
        for _ in 0..self.nodes.len() {
            match node.kind {
                TypeKind::Other(target) => node = self.get(target),
                _ => break,
            }
        }
        node
    }

    /// The chain of names from the outermost referring node down to `ref_`, for diagnostics.
    pub fn path(&self, ref_: NodeRef) -> String {
        let mut names = vec![self.get(ref_).full_name()];
        let mut current = self.parent(ref_);
        while let Some(parent) = current {
            if names.len() > self.nodes.len() {
                break;
            }
            names.push(self.get(parent).full_name());
            current = self.parent(parent);
        }
        names.reverse();
        names.join(" > ")
    }

    /// Renders the graph below `root` as an indented tree.
    pub fn display(&self) -> Tree<'_> {
        Tree { graph: self }
    }
}

/// Indented rendering of a [`TypeGraph`], see [`TypeGraph::display`].
pub struct Tree<'a> {
    graph: &'a TypeGraph,
}

impl fmt::Display for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.graph.root else {
            return Ok(());
        };
        // Explicit stack: resolved graphs may be nested far deeper than the thread stack allows.
        let mut pending: Vec<(NodeRef, Option<&str>, usize)> = vec![(root, None, 0)];
        while let Some((ref_, label, depth)) = pending.pop() {
            let node = self.graph.get(ref_);
            write!(f, "{:indent$}", "", indent = depth * 2)?;
            if let Some(label) = label {
                write!(f, "{label}: ")?;
            }
            write!(f, "{}", node.full_name())?;
            match &node.kind {
                TypeKind::Unknown => writeln!(f, " (opaque)")?,
                TypeKind::Builtin(_) => writeln!(f)?,
                TypeKind::Other(target) => {
                    writeln!(f, " (see {})", self.graph.get(*target).full_name())?
                }
                TypeKind::Struct(fields) => {
                    writeln!(f, " (struct)")?;
                    pending.extend(
                        fields
                            .iter()
                            .rev()
                            .map(|field| (field.type_, Some(field.name.as_str()), depth + 1)),
                    );
                }
                TypeKind::Variant(alternatives) => {
                    writeln!(f, " (variant)")?;
                    pending.extend(alternatives.iter().rev().map(|a| (*a, None, depth + 1)));
                }
            }
        }
        Ok(())
    }
}
