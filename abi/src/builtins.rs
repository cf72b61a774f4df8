use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

/// The types the resolver recognizes on its own, without any definition in the ABI.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Asset,
    Symbol,
    Name,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    String,
    Checksum256,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 13] = [
        Self::Asset,
        Self::Symbol,
        Self::Name,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::String,
        Self::Checksum256,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Symbol => "symbol",
            Self::Name => "name",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::String => "string",
            Self::Checksum256 => "checksum256",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BUILTINS_BY_NAME.get(name).copied()
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

lazy_static! {
    static ref BUILTINS_BY_NAME: HashMap<&'static str, BuiltinType> = BuiltinType::ALL
        .iter()
        .map(|builtin| (builtin.name(), *builtin))
        .collect();
}
