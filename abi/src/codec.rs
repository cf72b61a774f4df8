use serde_json::{Map, Value};

use super::{
    abi::Abi,
    builtins::BuiltinType,
    error::CodecError,
    resolved::{NodeRef, TypeGraph, TypeKind},
    resolver::resolve_type,
    wire::{
        asset_to_string, name_to_string, string_to_asset, string_to_name, string_to_symbol,
        symbol_to_string, write_length, write_varuint32, Reader,
    },
};

/// Deepest nesting of values the codec accepts, counted in struct fields and variant
/// alternatives from the outermost value.
pub const MAX_DEPTH: usize = 128;

/// Encodes the structured-text `value` of type `type_name` into binary.
pub fn encode_value(abi: &Abi, type_name: &str, value: &Value) -> Result<Vec<u8>, CodecError> {
    let graph = resolve_type(abi, type_name);
    let mut out = Vec::new();
    encode(&graph, graph.root(), value, &mut out, 0)?;
    Ok(out)
}

/// Decodes binary `data` holding exactly one value of type `type_name`.
pub fn decode_value(abi: &Abi, type_name: &str, data: &[u8]) -> Result<Value, CodecError> {
    let graph = resolve_type(abi, type_name);
    let mut reader = Reader::new(data);
    let value = decode(&graph, graph.root(), &mut reader, 0)?.unwrap_or(Value::Null);
    reader.finish()?;
    Ok(value)
}

fn mismatch(graph: &TypeGraph, ref_: NodeRef, expected: &'static str) -> CodecError {
    CodecError::Mismatch {
        type_name: graph.path(ref_),
        expected,
    }
}

/// Writes `value` as the type at `ref_`. Modifiers apply outermost first: optional, then array.
fn encode(
    graph: &TypeGraph,
    ref_: NodeRef,
    value: &Value,
    out: &mut Vec<u8>,
    depth: usize,
) -> Result<(), CodecError> {
    if depth > MAX_DEPTH {
        return Err(CodecError::TooDeep(MAX_DEPTH));
    }
    let node = graph.get(ref_);
    if node.flags.optional {
        if value.is_null() {
            out.push(0);
            return Ok(());
        }
        out.push(1);
    }

    if node.flags.array {
        let items = value
            .as_array()
            .ok_or_else(|| mismatch(graph, ref_, "an array"))?;
        write_length(out, items.len(), &node.name)?;
        for item in items {
            encode_structure(graph, ref_, item, out, depth)?;
        }
        Ok(())
    } else {
        encode_structure(graph, ref_, value, out, depth)
    }
}

fn encode_structure(
    graph: &TypeGraph,
    ref_: NodeRef,
    value: &Value,
    out: &mut Vec<u8>,
    depth: usize,
) -> Result<(), CodecError> {
    let target = graph.structure(ref_);
    match &target.kind {
        TypeKind::Struct(fields) => {
            let object = value
                .as_object()
                .ok_or_else(|| mismatch(graph, ref_, "an object"))?;
            for field in fields {
                match object.get(&field.name) {
                    Some(value) => encode(graph, field.type_, value, out, depth + 1)?,
                    // Everything after a missing extension field is missing too.
                    None if graph.get(field.type_).flags.binary_extension => break,
                    None => {
                        return Err(CodecError::MissingField {
                            struct_name: target.name.clone(),
                            field: field.name.clone(),
                        })
                    }
                }
            }
            Ok(())
        }
        TypeKind::Variant(alternatives) => {
            let (alternative, inner) = match value.as_array().map(Vec::as_slice) {
                Some([Value::String(alternative), inner]) => (alternative, inner),
                _ => return Err(mismatch(graph, ref_, "a [type, value] pair")),
            };
            let index = alternatives
                .iter()
                .position(|a| graph.get(*a).full_name() == *alternative)
                .ok_or_else(|| CodecError::BadVariantName {
                    variant: target.name.clone(),
                    alternative: alternative.clone(),
                })?;
            write_length(out, index, &target.name)?;
            encode(graph, alternatives[index], inner, out, depth + 1)
        }
        TypeKind::Builtin(builtin) => encode_builtin(*builtin, value, out),
        TypeKind::Unknown => encode_primitive(graph, ref_, value, out),
        TypeKind::Other(_) => Err(CodecError::UnknownType(graph.path(ref_))),
    }
}

fn unsigned(value: &Value, builtin: BuiltinType, max: u64) -> Result<u64, CodecError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    let parsed = parsed.ok_or_else(|| CodecError::Mismatch {
        type_name: builtin.name().into(),
        expected: "an unsigned integer",
    })?;
    if parsed > max {
        return Err(CodecError::OutOfRange {
            type_name: builtin.name().into(),
            value: parsed.to_string(),
        });
    }
    Ok(parsed)
}

fn signed(value: &Value, builtin: BuiltinType, min: i64, max: i64) -> Result<i64, CodecError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    let parsed = parsed.ok_or_else(|| CodecError::Mismatch {
        type_name: builtin.name().into(),
        expected: "an integer",
    })?;
    if parsed < min || parsed > max {
        return Err(CodecError::OutOfRange {
            type_name: builtin.name().into(),
            value: parsed.to_string(),
        });
    }
    Ok(parsed)
}

fn text(value: &Value, builtin: BuiltinType) -> Result<&str, CodecError> {
    value.as_str().ok_or_else(|| CodecError::Mismatch {
        type_name: builtin.name().into(),
        expected: "a string",
    })
}

fn encode_builtin(
    builtin: BuiltinType,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    use BuiltinType::*;

    match builtin {
        Uint8 => out.push(unsigned(value, builtin, u8::MAX.into())? as u8),
        Uint16 => out.extend((unsigned(value, builtin, u16::MAX.into())? as u16).to_le_bytes()),
        Uint32 => out.extend((unsigned(value, builtin, u32::MAX.into())? as u32).to_le_bytes()),
        Uint64 => out.extend(unsigned(value, builtin, u64::MAX)?.to_le_bytes()),
        Int8 => out.extend(
            (signed(value, builtin, i8::MIN.into(), i8::MAX.into())? as i8).to_le_bytes(),
        ),
        Int16 => out.extend(
            (signed(value, builtin, i16::MIN.into(), i16::MAX.into())? as i16).to_le_bytes(),
        ),
        Int32 => out.extend(
            (signed(value, builtin, i32::MIN.into(), i32::MAX.into())? as i32).to_le_bytes(),
        ),
        Int64 => out.extend(signed(value, builtin, i64::MIN, i64::MAX)?.to_le_bytes()),
        String => {
            let text = text(value, builtin)?;
            write_length(out, text.len(), builtin.name())?;
            out.extend(text.as_bytes());
        }
        Name => out.extend(string_to_name(text(value, builtin)?)?.to_le_bytes()),
        Symbol => out.extend(string_to_symbol(text(value, builtin)?)?.to_le_bytes()),
        Asset => {
            let (amount, symbol) = string_to_asset(text(value, builtin)?)?;
            out.extend(amount.to_le_bytes());
            out.extend(symbol.to_le_bytes());
        }
        Checksum256 => {
            let text = text(value, builtin)?;
            let invalid = || CodecError::InvalidText {
                kind: "checksum256",
                text: text.into(),
            };
            let bytes = hex::decode(text).map_err(|_| invalid())?;
            if bytes.len() != 32 {
                return Err(invalid());
            }
            out.extend(bytes);
        }
    }
    Ok(())
}

/// Opaque names the codec still understands as wire primitives.
fn encode_primitive(
    graph: &TypeGraph,
    ref_: NodeRef,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    match graph.get(ref_).name.as_str() {
        "bool" => {
            let flag = value
                .as_bool()
                .ok_or_else(|| mismatch(graph, ref_, "a boolean"))?;
            out.push(u8::from(flag));
        }
        "varuint32" => {
            let number = match value {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            }
            .ok_or_else(|| mismatch(graph, ref_, "an unsigned integer"))?;
            let number = u32::try_from(number).map_err(|_| CodecError::OutOfRange {
                type_name: "varuint32".into(),
                value: number.to_string(),
            })?;
            write_varuint32(out, number);
        }
        "bytes" => {
            let text = value
                .as_str()
                .ok_or_else(|| mismatch(graph, ref_, "a hex string"))?;
            let bytes = hex::decode(text).map_err(|_| CodecError::InvalidText {
                kind: "bytes",
                text: text.into(),
            })?;
            write_length(out, bytes.len(), "bytes")?;
            out.extend(bytes);
        }
        _ => return Err(CodecError::UnknownType(graph.path(ref_))),
    }
    Ok(())
}

/// Reads a value of the type at `ref_`. Returns `None` for a binary extension that is missing
/// because the data already ended.
fn decode(
    graph: &TypeGraph,
    ref_: NodeRef,
    reader: &mut Reader,
    depth: usize,
) -> Result<Option<Value>, CodecError> {
    if depth > MAX_DEPTH {
        return Err(CodecError::TooDeep(MAX_DEPTH));
    }
    let node = graph.get(ref_);
    if node.flags.binary_extension && reader.is_empty() {
        return Ok(None);
    }
    if node.flags.optional && reader.read_u8("optional flag")? == 0 {
        return Ok(Some(Value::Null));
    }

    let value = if node.flags.array {
        let len = reader.read_varuint32()?;
        // The count is untrusted; let the reader run out instead of preallocating it.
        let mut items = Vec::new();
        for _ in 0..len {
            items.push(decode_structure(graph, ref_, reader, depth)?);
        }
        Value::Array(items)
    } else {
        decode_structure(graph, ref_, reader, depth)?
    };
    Ok(Some(value))
}

fn decode_structure(
    graph: &TypeGraph,
    ref_: NodeRef,
    reader: &mut Reader,
    depth: usize,
) -> Result<Value, CodecError> {
    let target = graph.structure(ref_);
    match &target.kind {
        TypeKind::Struct(fields) => {
            let mut object = Map::new();
            for field in fields {
                match decode(graph, field.type_, reader, depth + 1)? {
                    Some(value) => {
                        object.insert(field.name.clone(), value);
                    }
                    None => break,
                }
            }
            Ok(Value::Object(object))
        }
        TypeKind::Variant(alternatives) => {
            let index = reader.read_varuint32()?;
            let alternative = *alternatives.get(index as usize).ok_or_else(|| {
                CodecError::BadVariantIndex {
                    variant: target.name.clone(),
                    index,
                }
            })?;
            let inner = decode(graph, alternative, reader, depth + 1)?.unwrap_or(Value::Null);
            Ok(Value::Array(vec![
                Value::String(graph.get(alternative).full_name()),
                inner,
            ]))
        }
        TypeKind::Builtin(builtin) => decode_builtin(*builtin, reader),
        TypeKind::Unknown => decode_primitive(graph, ref_, reader),
        TypeKind::Other(_) => Err(CodecError::UnknownType(graph.path(ref_))),
    }
}

fn decode_builtin(builtin: BuiltinType, reader: &mut Reader) -> Result<Value, CodecError> {
    use BuiltinType::*;

    let what = builtin.name();
    let value = match builtin {
        Uint8 => Value::from(reader.read_u8(what)?),
        Uint16 => Value::from(u16::from_le_bytes(reader.read_array(what)?)),
        Uint32 => Value::from(u32::from_le_bytes(reader.read_array(what)?)),
        // 64-bit integers are strings in text form so they survive JSON number precision.
        Uint64 => Value::from(u64::from_le_bytes(reader.read_array(what)?).to_string()),
        Int8 => Value::from(i8::from_le_bytes(reader.read_array(what)?)),
        Int16 => Value::from(i16::from_le_bytes(reader.read_array(what)?)),
        Int32 => Value::from(i32::from_le_bytes(reader.read_array(what)?)),
        Int64 => Value::from(i64::from_le_bytes(reader.read_array(what)?).to_string()),
        String => {
            let len = reader.read_varuint32()?;
            let bytes = reader.read_bytes(len as usize, what)?;
            let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
            Value::from(text)
        }
        Name => Value::from(name_to_string(u64::from_le_bytes(reader.read_array(what)?))),
        Symbol => Value::from(symbol_to_string(u64::from_le_bytes(reader.read_array(what)?))),
        Asset => {
            let amount = i64::from_le_bytes(reader.read_array(what)?);
            let symbol = u64::from_le_bytes(reader.read_array(what)?);
            Value::from(asset_to_string(amount, symbol))
        }
        Checksum256 => Value::from(hex::encode(reader.read_array::<32>(what)?)),
    };
    Ok(value)
}

fn decode_primitive(
    graph: &TypeGraph,
    ref_: NodeRef,
    reader: &mut Reader,
) -> Result<Value, CodecError> {
    let value = match graph.get(ref_).name.as_str() {
        "bool" => Value::from(reader.read_u8("bool")? != 0),
        "varuint32" => Value::from(reader.read_varuint32()?),
        "bytes" => {
            let len = reader.read_varuint32()?;
            Value::from(hex::encode(reader.read_bytes(len as usize, "bytes")?))
        }
        _ => return Err(CodecError::UnknownType(graph.path(ref_))),
    };
    Ok(value)
}
