use serde::{Deserialize, Deserializer, Serialize};

use super::error::AbiError;

/// The version tag assumed when a document does not carry one.
pub const DEFAULT_VERSION: &str = "eosio::abi/1.1";

/// Schema record: the flat, ordered content of an ABI document.
///
/// Entries keep the order in which they were declared. Lookups go by name and return the first
/// match, so duplicate names are allowed but only the first one is ever resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Abi {
    #[serde(deserialize_with = "version_or_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub types: Vec<TypeDef>,
    #[serde(deserialize_with = "null_as_default")]
    pub structs: Vec<StructDef>,
    #[serde(deserialize_with = "null_as_default")]
    pub actions: Vec<ActionDef>,
    #[serde(deserialize_with = "null_as_default")]
    pub tables: Vec<TableDef>,
    #[serde(deserialize_with = "null_as_default")]
    pub ricardian_clauses: Vec<ClausePair>,
    #[serde(deserialize_with = "null_as_default")]
    pub variants: Vec<VariantDef>,
}

impl Default for Abi {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.into(),
            types: Vec::new(),
            structs: Vec::new(),
            actions: Vec::new(),
            tables: Vec::new(),
            ricardian_clauses: Vec::new(),
            variants: Vec::new(),
        }
    }
}

/// An alias entry: `new_type_name` stands for `type_`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

/// A struct definition. An empty `base` means the struct has no base struct.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructDef {
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub base: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fields: Vec<FieldDef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantDef {
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub types: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub ricardian_contract: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDef {
    pub name: String,
    pub index_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key_names: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub key_types: Vec<String>,
    #[serde(rename = "type")]
    pub type_: String,
}

/// A Ricardian clause; its body is carried verbatim and never interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClausePair {
    pub id: String,
    pub body: String,
}

/// Reads an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn version_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(|| DEFAULT_VERSION.into()))
}

impl Abi {
    /// Reads the structured-text form. Every field is optional and may be `null`; absent lists
    /// are empty and an absent version is [`DEFAULT_VERSION`].
    pub fn from_json(text: &str) -> Result<Self, AbiError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, AbiError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn find_alias(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.new_type_name == name)
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_variant(&self, name: &str) -> Option<&VariantDef> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn find_action(&self, name: &str) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn find_table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Substitutes `name` with the target of its alias, if any.
    ///
    /// Only one hop is taken: with `a -> b` and `b -> c`, `a` resolves to `b`.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        match self.find_alias(name) {
            Some(alias) => &alias.type_,
            None => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(from: &str, to: &str) -> TypeDef {
        TypeDef {
            new_type_name: from.into(),
            type_: to.into(),
        }
    }

    #[test]
    fn sparse_document_gets_defaults() {
        let abi = Abi::from_json("{}").unwrap();
        assert_eq!(abi, Abi::default());
        assert_eq!(abi.version, DEFAULT_VERSION);
    }

    #[test]
    fn sparse_entries_get_defaults() {
        let abi = Abi::from_json(r#"{"structs": [{"name": "s"}], "variants": [{}]}"#).unwrap();
        assert_eq!(abi.structs[0].base, "");
        assert!(abi.structs[0].fields.is_empty());
        assert_eq!(abi.variants[0].name, "");
    }

    #[test]
    fn null_fields_read_as_absent() {
        let abi = Abi::from_json(
            r#"{"version": null, "types": null, "structs": [{"name": "s", "base": null, "fields": null}], "variants": null}"#,
        )
        .unwrap();
        assert_eq!(abi.version, DEFAULT_VERSION);
        assert!(abi.types.is_empty());
        assert!(abi.variants.is_empty());
        assert_eq!(abi.structs[0].base, "");
        assert!(abi.structs[0].fields.is_empty());
    }

    #[test]
    fn reserved_lists_are_ignored() {
        let abi = Abi::from_json(
            r#"{"version": "eosio::abi/1.0", "error_messages": [{"error_code": 1}], "abi_extensions": []}"#,
        )
        .unwrap();
        assert_eq!(abi.version, "eosio::abi/1.0");
    }

    #[test]
    fn alias_resolution_takes_one_hop() {
        let abi = Abi {
            types: vec![alias("a", "b"), alias("b", "c")],
            ..Abi::default()
        };
        assert_eq!(abi.resolve_alias("a"), "b");
        assert_eq!(abi.resolve_alias("b"), "c");
        assert_eq!(abi.resolve_alias("c"), "c");
    }

    #[test]
    fn first_alias_wins() {
        let abi = Abi {
            types: vec![alias("a", "uint8"), alias("a", "uint16")],
            ..Abi::default()
        };
        assert_eq!(abi.resolve_alias("a"), "uint8");
    }

    #[test]
    fn json_uses_wire_key_names() {
        let abi = Abi {
            types: vec![alias("id", "uint64")],
            ..Abi::default()
        };
        let json = abi.to_json().unwrap();
        assert!(json.contains("\"new_type_name\""));
        assert!(json.contains("\"type\": \"uint64\""));
        assert_eq!(Abi::from_json(&json).unwrap(), abi);
    }
}
