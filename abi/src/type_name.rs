/// The modifier suffixes a type reference may carry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeFlags {
    /// `[]`: a length-prefixed sequence of the base type
    pub array: bool,
    /// `?`: a presence byte followed by the value, if present
    pub optional: bool,
    /// `$`: the value may be missing entirely at the end of older binary data
    pub binary_extension: bool,
}

impl TypeFlags {
    pub const NONE: Self = Self {
        array: false,
        optional: false,
        binary_extension: false,
    };
}

/// Splits a type reference into its base name and modifier flags.
///
/// Suffixes are stripped in a fixed order: `$`, then `?`, then `[]`. Anything else, including the
/// empty string, is returned unchanged with no flags set.
pub fn parse_type_name(reference: &str) -> (&str, TypeFlags) {
    let mut flags = TypeFlags::NONE;
    let mut base = reference;

    if let Some(stripped) = base.strip_suffix('$') {
        flags.binary_extension = true;
        base = stripped;
    }
    if let Some(stripped) = base.strip_suffix('?') {
        flags.optional = true;
        base = stripped;
    }
    if let Some(stripped) = base.strip_suffix("[]") {
        flags.array = true;
        base = stripped;
    }

    (base, flags)
}

/// Inverse of [`parse_type_name`].
pub fn format_type_name(base: &str, flags: TypeFlags) -> String {
    let mut name = String::with_capacity(base.len() + 4);
    name.push_str(base);
    if flags.array {
        name.push_str("[]");
    }
    if flags.optional {
        name.push('?');
    }
    if flags.binary_extension {
        name.push('$');
    }
    name
}
