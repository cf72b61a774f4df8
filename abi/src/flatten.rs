use std::collections::{HashSet, VecDeque};

use tracing::warn;

use super::{
    abi::{Abi, FieldDef, StructDef},
    error::FlattenError,
};

/// Collects the effective fields of struct `name`: those of its root ancestor first, its own
/// fields last. Duplicate field names are kept as declared.
///
/// An empty `base` ends the walk, as does a base name that is not a defined struct. A base chain
/// that comes back to a struct already walked is reported as [`FlattenError::CircularReference`].
pub fn flatten_struct(abi: &Abi, name: &str) -> Result<Vec<FieldDef>, FlattenError> {
    let fields = flatten_with(name, |name| abi.find_struct(name))?;
    Ok(fields.into_iter().cloned().collect())
}

/// [`flatten_struct`] over any first-match struct lookup, borrowing the fields it collects.
pub(crate) fn flatten_with<'a>(
    name: &str,
    find_struct: impl Fn(&str) -> Option<&'a StructDef>,
) -> Result<Vec<&'a FieldDef>, FlattenError> {
    let mut current = find_struct(name).ok_or_else(|| FlattenError::NotFound(name.into()))?;

    let mut fields = VecDeque::new();
    let mut visited = HashSet::new();

    loop {
        for field in current.fields.iter().rev() {
            fields.push_front(field);
        }
        visited.insert(current.name.as_str());

        if current.base.is_empty() {
            break;
        }
        if visited.contains(current.base.as_str()) {
            warn!(struct_name = name, base = %current.base, "circular struct inheritance");
            return Err(FlattenError::CircularReference(name.into()));
        }

        match find_struct(&current.base) {
            Some(base) => current = base,
            None => break,
        }
    }

    Ok(fields.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::StructDef;

    fn field(name: &str, type_: &str) -> FieldDef {
        FieldDef {
            name: name.into(),
            type_: type_.into(),
        }
    }

    fn struct_def(name: &str, base: &str, fields: &[(&str, &str)]) -> StructDef {
        StructDef {
            name: name.into(),
            base: base.into(),
            fields: fields.iter().map(|(n, t)| field(n, t)).collect(),
        }
    }

    fn abi_with(structs: Vec<StructDef>) -> Abi {
        Abi {
            structs,
            ..Abi::default()
        }
    }

    #[test]
    fn root_fields_come_first() {
        let abi = abi_with(vec![
            struct_def("child", "parent", &[("c", "uint8")]),
            struct_def("parent", "root", &[("p1", "uint16"), ("p2", "uint32")]),
            struct_def("root", "", &[("r", "string")]),
        ]);
        let fields = flatten_struct(&abi, "child").unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["r", "p1", "p2", "c"]);
    }

    #[test]
    fn duplicates_are_preserved() {
        let abi = abi_with(vec![
            struct_def("child", "parent", &[("x", "uint8")]),
            struct_def("parent", "", &[("x", "uint16")]),
        ]);
        let fields = flatten_struct(&abi, "child").unwrap();
        assert_eq!(fields, vec![field("x", "uint16"), field("x", "uint8")]);
    }

    #[test]
    fn unknown_base_ends_the_chain() {
        let abi = abi_with(vec![struct_def("s", "missing", &[("a", "name")])]);
        assert_eq!(flatten_struct(&abi, "s").unwrap(), vec![field("a", "name")]);
    }

    #[test]
    fn empty_base_is_not_a_struct_name() {
        let abi = abi_with(vec![
            struct_def("token", "", &[("owner", "name")]),
            struct_def("", "", &[("x", "uint8")]),
        ]);
        assert_eq!(
            flatten_struct(&abi, "token").unwrap(),
            vec![field("owner", "name")]
        );
    }

    #[test]
    fn first_struct_of_a_name_wins() {
        let abi = abi_with(vec![
            struct_def("child", "parent", &[("c", "uint8")]),
            struct_def("parent", "", &[("first", "uint8")]),
            struct_def("parent", "", &[("second", "uint8")]),
        ]);
        let fields = flatten_struct(&abi, "child").unwrap();
        assert_eq!(fields, vec![field("first", "uint8"), field("c", "uint8")]);
    }

    #[test]
    fn missing_struct_is_not_found() {
        let abi = abi_with(vec![]);
        assert_eq!(
            flatten_struct(&abi, "nope"),
            Err(FlattenError::NotFound("nope".into()))
        );
    }

    #[test]
    fn self_base_is_circular() {
        let abi = abi_with(vec![struct_def("s", "s", &[("a", "name")])]);
        assert_eq!(
            flatten_struct(&abi, "s"),
            Err(FlattenError::CircularReference("s".into()))
        );
    }

    #[test]
    fn long_cycle_is_circular() {
        let abi = abi_with(vec![
            struct_def("a", "b", &[]),
            struct_def("b", "c", &[]),
            struct_def("c", "a", &[]),
        ]);
        assert!(matches!(
            flatten_struct(&abi, "b"),
            Err(FlattenError::CircularReference(_))
        ));
    }

    #[test]
    fn cycle_above_the_start_is_circular() {
        let abi = abi_with(vec![
            struct_def("leaf", "a", &[]),
            struct_def("a", "b", &[]),
            struct_def("b", "a", &[]),
        ]);
        assert!(matches!(
            flatten_struct(&abi, "leaf"),
            Err(FlattenError::CircularReference(_))
        ));
    }
}
