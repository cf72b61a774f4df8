//! Model and type resolver for contract ABI documents.
//!
//! An [`Abi`] is the flat list of aliases, structs, variants, actions, tables and clauses a
//! contract publishes about itself. [`resolve_type`] expands a type reference against it into a
//! [`TypeGraph`], following aliases (one hop), struct inheritance and variant alternatives, and
//! closing cycles so every input terminates. The [`codec`] module walks such a graph to convert
//! values between their JSON and binary forms.

pub mod abi;
pub mod abi_def;
pub mod builtins;
pub mod codec;
pub mod error;
pub mod flatten;
pub mod resolved;
pub mod type_name;

mod resolver;
mod wire;

pub use abi::{
    Abi, ActionDef, ClausePair, FieldDef, StructDef, TableDef, TypeDef, VariantDef,
    DEFAULT_VERSION,
};
pub use abi_def::{ABI_DEF, ABI_DEF_TYPE};
pub use builtins::BuiltinType;
pub use codec::{decode_value, encode_value};
pub use error::{AbiError, CodecError, FlattenError};
pub use flatten::flatten_struct;
pub use resolved::{NodeRef, ResolvedField, ResolvedType, TypeGraph, TypeKind};
pub use resolver::resolve_type;
pub use type_name::{format_type_name, parse_type_name, TypeFlags};
