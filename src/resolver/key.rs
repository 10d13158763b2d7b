//! Cache keys for resolved members.

use std::fmt;

use strum::Display;

use crate::runtime::TypeRef;

/// The kind of symbol a lookup is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SymbolKind {
    /// A type
    Type,
    /// A field
    Field,
    /// A method
    Method,
    /// A constructor
    Constructor,
}

/// Identity of a member lookup: owning type, name and, for methods and constructors, the
/// exact parameter types.
///
/// Parameter lists compare element-wise by type name, so two keys built independently from
/// equal parts hit the same cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolKey {
    /// What is being looked up
    pub kind: SymbolKind,
    /// The declaring type
    pub owner: TypeRef,
    /// The member name; `<init>` for constructors
    pub name: String,
    /// Parameter types, `None` for fields
    pub parameters: Option<Vec<TypeRef>>,
}

impl SymbolKey {
    /// Key for field `name` on `owner`.
    #[must_use]
    pub fn field(owner: &TypeRef, name: &str) -> Self {
        SymbolKey {
            kind: SymbolKind::Field,
            owner: owner.clone(),
            name: name.to_string(),
            parameters: None,
        }
    }

    /// Key for method `name` on `owner` taking `parameters`.
    #[must_use]
    pub fn method(owner: &TypeRef, name: &str, parameters: &[TypeRef]) -> Self {
        SymbolKey {
            kind: SymbolKind::Method,
            owner: owner.clone(),
            name: name.to_string(),
            parameters: Some(parameters.to_vec()),
        }
    }

    /// Key for the constructor of `owner` taking `parameters`.
    #[must_use]
    pub fn constructor(owner: &TypeRef, parameters: &[TypeRef]) -> Self {
        SymbolKey {
            kind: SymbolKind::Constructor,
            owner: owner.clone(),
            name: "<init>".to_string(),
            parameters: Some(parameters.to_vec()),
        }
    }

    /// Returns the parameter types, empty for fields.
    #[must_use]
    pub fn parameter_types(&self) -> &[TypeRef] {
        self.parameters.as_deref().unwrap_or(&[])
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)?;
        if let Some(parameters) = &self.parameters {
            let names: Vec<&str> = parameters.iter().map(TypeRef::name).collect();
            write!(f, "({})", names.join(", "))?;
        }
        Ok(())
    }
}
