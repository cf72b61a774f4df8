use dt_abi::{
    decode_value, encode_value, Abi, ActionDef, ClausePair, FieldDef, StructDef, TableDef,
    TypeDef, VariantDef, ABI_DEF, ABI_DEF_TYPE,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample_abi() -> Abi {
    Abi {
        version: "eosio::abi/1.2".into(),
        types: vec![TypeDef {
            new_type_name: "account_name".into(),
            type_: "name".into(),
        }],
        structs: vec![
            StructDef {
                name: "transfer".into(),
                base: "".into(),
                fields: vec![
                    FieldDef {
                        name: "from".into(),
                        type_: "account_name".into(),
                    },
                    FieldDef {
                        name: "quantity".into(),
                        type_: "asset".into(),
                    },
                ],
            },
            StructDef {
                name: "account".into(),
                base: "transfer".into(),
                fields: vec![],
            },
        ],
        actions: vec![ActionDef {
            name: "transfer".into(),
            type_: "transfer".into(),
            ricardian_contract: "---\ntitle: Transfer\n---".into(),
        }],
        tables: vec![TableDef {
            name: "accounts".into(),
            index_type: "i64".into(),
            key_names: vec!["currency".into()],
            key_types: vec!["uint64".into()],
            type_: "account".into(),
        }],
        ricardian_clauses: vec![ClausePair {
            id: "UserAgreement".into(),
            body: "Be nice.".into(),
        }],
        variants: vec![VariantDef {
            name: "payload".into(),
            types: vec!["string".into(), "transfer".into()],
        }],
    }
}

#[test]
fn binary_round_trip() {
    let abi = sample_abi();
    let bytes = abi.to_bin().unwrap();
    assert_eq!(Abi::from_bin(&bytes).unwrap(), abi);
}

#[test]
fn json_and_binary_agree() {
    let abi = sample_abi();
    let from_json = Abi::from_json(&abi.to_json().unwrap()).unwrap();
    assert_eq!(from_json.to_bin().unwrap(), abi.to_bin().unwrap());
}

#[test]
fn reserved_lists_are_written_empty() {
    let bytes = sample_abi().to_bin().unwrap();
    let value = decode_value(&ABI_DEF, ABI_DEF_TYPE, &bytes).unwrap();
    assert_eq!(value["error_messages"], json!([]));
    assert_eq!(value["abi_extensions"], json!([]));
}

#[test]
fn document_without_variants_decodes() {
    let mut abi = sample_abi();
    let mut value = serde_json::to_value(&abi).unwrap();
    let object = value.as_object_mut().unwrap();
    object.remove("variants");
    object.insert("error_messages".into(), json!([]));
    object.insert("abi_extensions".into(), json!([]));

    let bytes = encode_value(&ABI_DEF, ABI_DEF_TYPE, &value).unwrap();
    abi.variants.clear();
    assert_eq!(Abi::from_bin(&bytes).unwrap(), abi);
}

#[test]
fn invalid_action_name_is_rejected() {
    let mut abi = sample_abi();
    abi.actions[0].name = "Transfer".into();
    assert!(abi.to_bin().is_err());
}

#[test]
fn values_follow_the_loaded_abi() {
    let abi = Abi::from_bin(&sample_abi().to_bin().unwrap()).unwrap();
    let row = json!({"from": "alice", "quantity": "12.3400 TOK"});
    let bytes = encode_value(&abi, "account", &row).unwrap();
    assert_eq!(bytes.len(), 24);
    assert_eq!(decode_value(&abi, "account", &bytes).unwrap(), row);

    let payload = json!(["transfer", row]);
    let bytes = encode_value(&abi, "payload", &payload).unwrap();
    assert_eq!(bytes[0], 1);
    assert_eq!(decode_value(&abi, "payload", &bytes).unwrap(), payload);
}
