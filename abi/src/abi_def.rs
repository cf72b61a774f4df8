use lazy_static::lazy_static;
use serde_json::Value;

use super::{
    abi::{Abi, FieldDef, StructDef},
    codec::{decode_value, encode_value},
    error::AbiError,
};

/// The struct of [`ABI_DEF`] describing a whole ABI document.
pub const ABI_DEF_TYPE: &str = "abi_def";

fn struct_def(name: &str, fields: &[(&str, &str)]) -> StructDef {
    StructDef {
        name: name.into(),
        base: String::new(),
        fields: fields
            .iter()
            .map(|(name, type_)| FieldDef {
                name: (*name).into(),
                type_: (*type_).into(),
            })
            .collect(),
    }
}

lazy_static! {
    /// An ABI describing the binary layout of ABI documents themselves.
    ///
    /// `error_messages` and `abi_extensions` only exist for layout compatibility; they are
    /// always written empty and dropped when read. `variants` is a binary extension, so documents
    /// written before variants existed still decode.
    pub static ref ABI_DEF: Abi = Abi {
        structs: vec![
            struct_def("extensions_entry", &[("tag", "uint16"), ("value", "bytes")]),
            struct_def("type_def", &[("new_type_name", "string"), ("type", "string")]),
            struct_def("field_def", &[("name", "string"), ("type", "string")]),
            struct_def(
                "struct_def",
                &[("name", "string"), ("base", "string"), ("fields", "field_def[]")],
            ),
            struct_def(
                "action_def",
                &[("name", "name"), ("type", "string"), ("ricardian_contract", "string")],
            ),
            struct_def(
                "table_def",
                &[
                    ("name", "name"),
                    ("index_type", "string"),
                    ("key_names", "string[]"),
                    ("key_types", "string[]"),
                    ("type", "string"),
                ],
            ),
            struct_def("clause_pair", &[("id", "string"), ("body", "string")]),
            struct_def("error_message", &[("error_code", "uint64"), ("error_msg", "string")]),
            struct_def("variant_def", &[("name", "string"), ("types", "string[]")]),
            struct_def(
                ABI_DEF_TYPE,
                &[
                    ("version", "string"),
                    ("types", "type_def[]"),
                    ("structs", "struct_def[]"),
                    ("actions", "action_def[]"),
                    ("tables", "table_def[]"),
                    ("ricardian_clauses", "clause_pair[]"),
                    ("error_messages", "error_message[]"),
                    ("abi_extensions", "extensions_entry[]"),
                    ("variants", "variant_def[]$"),
                ],
            ),
        ],
        ..Abi::default()
    };
}

impl Abi {
    /// Writes the binary form, laid out by [`ABI_DEF`].
    pub fn to_bin(&self) -> Result<Vec<u8>, AbiError> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(object) = &mut value {
            object.insert("error_messages".into(), Value::Array(Vec::new()));
            object.insert("abi_extensions".into(), Value::Array(Vec::new()));
        }
        Ok(encode_value(&ABI_DEF, ABI_DEF_TYPE, &value)?)
    }

    /// Reads the binary form. Data ending before the variants yields an ABI without variants.
    pub fn from_bin(data: &[u8]) -> Result<Self, AbiError> {
        let value = decode_value(&ABI_DEF, ABI_DEF_TYPE, data)?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolved::TypeKind;
    use crate::resolver::resolve_type;

    #[test]
    fn abi_def_fields_keep_wire_order() {
        let graph = resolve_type(&ABI_DEF, ABI_DEF_TYPE);
        let TypeKind::Struct(fields) = &graph.get(graph.root()).kind else {
            panic!("abi_def is not a struct");
        };
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "version",
                "types",
                "structs",
                "actions",
                "tables",
                "ricardian_clauses",
                "error_messages",
                "abi_extensions",
                "variants",
            ]
        );
        let variants = graph.get(fields[8].type_);
        assert!(variants.flags.array && variants.flags.binary_extension);
    }

    #[test]
    fn empty_abi_layout() {
        let bytes = Abi::default().to_bin().unwrap();
        let mut expected = vec![14];
        expected.extend(b"eosio::abi/1.1");
        expected.extend([0; 8]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn reserved_lists_are_discarded() {
        let mut bytes = vec![3];
        bytes.extend(b"v/1");
        bytes.extend([0, 0, 0, 0, 0]);
        // one error message, one extension
        bytes.push(1);
        bytes.extend(7u64.to_le_bytes());
        bytes.extend([3, b'b', b'a', b'd']);
        bytes.extend([1, 1, 0, 2, 0xab, 0xcd]);
        bytes.push(0);

        let abi = Abi::from_bin(&bytes).unwrap();
        assert_eq!(abi.version, "v/1");
        assert!(abi.variants.is_empty());
    }

    #[test]
    fn data_ending_before_variants_is_accepted() {
        let bytes = Abi::default().to_bin().unwrap();
        let abi = Abi::from_bin(&bytes[..bytes.len() - 1]).unwrap();
        assert_eq!(abi, Abi::default());
    }

    #[test]
    fn data_ending_earlier_is_an_error() {
        let bytes = Abi::default().to_bin().unwrap();
        assert!(matches!(
            Abi::from_bin(&bytes[..bytes.len() - 2]),
            Err(AbiError::Codec(_))
        ));
    }
}
