//! Reading parameter lists out of JVM method descriptors.
//!
//! Method keys in a remap table carry the descriptor of the unmapped method, e.g.
//! `(ILnet/minecraft/server/v1_7_R4/Entity;[B)V`. Parameter types are returned in the
//! naming used by [`crate::runtime::TypeRef`]: primitives by keyword, classes by
//! slash-delimited internal name, arrays with a `[]` suffix per dimension.

/// Read the parameter types of a method descriptor.
///
/// # Arguments
///
/// * `descriptor` - A descriptor starting with `(`
///
/// # Returns
///
/// The parameter types in declaration order, or `None` if the descriptor is malformed.
///
/// # Examples
///
/// ```rust
/// use hostreflect::remap::parameter_types;
///
/// let params = parameter_types("(ILnet/minecraft/server/Entity;[[B)V").unwrap();
/// assert_eq!(params, vec!["int", "net/minecraft/server/Entity", "byte[][]"]);
/// assert!(parameter_types("ILjava/lang/String;").is_none());
/// ```
#[must_use]
pub fn parameter_types(descriptor: &str) -> Option<Vec<String>> {
    let body = descriptor.strip_prefix('(')?;
    let end = body.find(')')?;
    let mut rest = &body[..end];
    let mut parameters = Vec::new();

    while !rest.is_empty() {
        let dimensions = rest.len() - rest.trim_start_matches('[').len();
        rest = &rest[dimensions..];

        let (element, consumed) = match rest.as_bytes().first()? {
            b'L' => {
                let end = rest.find(';')?;
                if end == 1 {
                    return None;
                }
                (rest[1..end].to_string(), end + 1)
            }
            code => (primitive(*code)?.to_string(), 1),
        };

        rest = &rest[consumed..];
        parameters.push(format!("{}{}", element, "[]".repeat(dimensions)));
    }

    Some(parameters)
}

fn primitive(code: u8) -> Option<&'static str> {
    Some(match code {
        b'Z' => "boolean",
        b'B' => "byte",
        b'C' => "char",
        b'S' => "short",
        b'I' => "int",
        b'J' => "long",
        b'F' => "float",
        b'D' => "double",
        _ => return None,
    })
}
