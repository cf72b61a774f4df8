use std::collections::HashMap;

use tracing::debug;

use super::{
    abi::{Abi, StructDef, VariantDef},
    builtins::BuiltinType,
    flatten::flatten_with,
    resolved::{NodeRef, ResolvedField, ResolvedType, TypeGraph, TypeKind},
    type_name::parse_type_name,
};

/// Resolves `reference` against `abi` into a self-contained type graph.
///
/// Resolution never fails. Names the ABI does not define become [`TypeKind::Unknown`] leaves, and
/// a name met a second time within the same request is linked to its first expansion with
/// [`TypeKind::Other`] instead of being expanded again, so cyclic schemas produce finite graphs.
/// Nesting depth is bounded only by the size of the ABI, not by the thread stack.
pub fn resolve_type(abi: &Abi, reference: &str) -> TypeGraph {
    ResolutionContext::new(abi).run(reference)
}

/// First-match name lookups over one ABI, built once per request.
struct Definitions<'a> {
    aliases: HashMap<&'a str, &'a str>,
    structs: HashMap<&'a str, &'a StructDef>,
    variants: HashMap<&'a str, &'a VariantDef>,
}

impl<'a> Definitions<'a> {
    fn new(abi: &'a Abi) -> Self {
        let mut aliases = HashMap::new();
        for alias in &abi.types {
            aliases
                .entry(alias.new_type_name.as_str())
                .or_insert(alias.type_.as_str());
        }
        let mut structs = HashMap::new();
        for struct_ in &abi.structs {
            structs.entry(struct_.name.as_str()).or_insert(struct_);
        }
        let mut variants = HashMap::new();
        for variant in &abi.variants {
            variants.entry(variant.name.as_str()).or_insert(variant);
        }
        Self {
            aliases,
            structs,
            variants,
        }
    }

    /// Same rule as [`Abi::resolve_alias`]: a single hop.
    fn resolve_alias<'b>(&self, name: &'b str) -> &'b str
    where
        'a: 'b,
    {
        match self.aliases.get(name) {
            Some(&target) => target,
            None => name,
        }
    }

    fn find_struct(&self, name: &str) -> Option<&'a StructDef> {
        self.structs.get(name).copied()
    }
}

/// Where a node built from the work stack is attached.
enum Slot<'a> {
    Field(&'a str),
    Alternative,
}

/// A reference waiting to be expanded, together with the node that will own it.
struct Pending<'a> {
    reference: &'a str,
    parent: Option<NodeRef>,
    owner: NodeRef,
    slot: Slot<'a>,
}

/// State of one resolution request.
struct ResolutionContext<'a> {
    definitions: Definitions<'a>,
    graph: TypeGraph,
    /// Canonical names expanded so far, mapped to their expanded node
    seen: HashMap<String, NodeRef>,
    /// Children still to expand. The top is always the next reference in depth-first order.
    stack: Vec<Pending<'a>>,
}

impl<'a> ResolutionContext<'a> {
    fn new(abi: &'a Abi) -> Self {
        Self {
            definitions: Definitions::new(abi),
            graph: TypeGraph::new(),
            seen: HashMap::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self, reference: &str) -> TypeGraph {
        let root = self.expand(reference, None);
        self.graph.set_root(root);

        while let Some(pending) = self.stack.pop() {
            let child = self.expand(pending.reference, pending.parent);
            match (self.graph.kind_mut(pending.owner), pending.slot) {
                (TypeKind::Struct(fields), Slot::Field(name)) => fields.push(ResolvedField {
                    name: name.to_owned(),
                    type_: child,
                }),
                (TypeKind::Variant(alternatives), Slot::Alternative) => alternatives.push(child),
                (kind, _) => unreachable!("pending child attached to {kind:?}"),
            }
        }
        self.graph
    }

    /// Builds the node for `reference` and schedules its children. The children are attached to
    /// it in declaration order as [`run`](Self::run) pops them.
    fn expand(&mut self, reference: &str, parent: Option<NodeRef>) -> NodeRef {
        let (base, flags) = parse_type_name(reference);
        let name = self.definitions.resolve_alias(base);

        let this = self.graph.push(ResolvedType {
            name: name.to_owned(),
            flags,
            parent,
            kind: TypeKind::Unknown,
        });

        if let Some(&existing) = self.seen.get(name) {
            debug!(name, "closing type cycle");
            self.graph.set_kind(this, TypeKind::Other(existing));
            return this;
        }
        // Registered before any child is expanded so nested references to `name` close the cycle.
        self.seen.insert(name.to_owned(), this);

        let definitions = &self.definitions;
        let kind = if let Ok(fields) = flatten_with(name, |name| definitions.find_struct(name)) {
            self.stack.extend(fields.iter().rev().map(|&field| Pending {
                reference: &field.type_,
                parent: Some(this),
                owner: this,
                slot: Slot::Field(&field.name),
            }));
            TypeKind::Struct(Vec::with_capacity(fields.len()))
        } else if let Some(&variant) = definitions.variants.get(name) {
            // Alternatives hang off the variant's own parent: they are peers of the reference.
            self.stack
                .extend(variant.types.iter().rev().map(|alternative| Pending {
                    reference: alternative,
                    parent,
                    owner: this,
                    slot: Slot::Alternative,
                }));
            TypeKind::Variant(Vec::with_capacity(variant.types.len()))
        } else if let Some(builtin) = BuiltinType::from_name(name) {
            TypeKind::Builtin(builtin)
        } else {
            debug!(name, "type has no definition, leaving it opaque");
            TypeKind::Unknown
        };

        self.graph.set_kind(this, kind);
        this
    }
}
