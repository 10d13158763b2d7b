//! Resolved handles, including memoized misses.

use std::{fmt, sync::Arc};

use crate::{
    resolver::{SymbolKey, SymbolKind},
    runtime::{RuntimeConstructor, RuntimeField, RuntimeMethod, TypeRef},
    Error,
};

/// Result of a type lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHandle {
    /// The name that was asked for
    name: String,
    /// The live type, `None` if the lookup failed
    ty: Option<TypeRef>,
}

impl TypeHandle {
    pub(crate) fn new(name: &str, ty: Option<TypeRef>) -> Self {
        TypeHandle {
            name: name.to_string(),
            ty,
        }
    }

    /// Returns the name that was looked up.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the type exists.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.ty.is_some()
    }

    /// Returns the live type.
    #[must_use]
    pub fn type_ref(&self) -> Option<&TypeRef> {
        self.ty.as_ref()
    }

    /// Returns the live type, or the miss as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SymbolNotFound`] if the lookup failed.
    pub fn require(&self) -> crate::Result<&TypeRef> {
        self.ty.as_ref().ok_or_else(|| {
            let (package, simple) = self.name.rsplit_once('.').unwrap_or(("", &self.name));
            Error::SymbolNotFound {
                kind: SymbolKind::Type,
                owner: package.to_string(),
                name: simple.to_string(),
            }
        })
    }
}

/// Result of a member lookup.
///
/// The key records what was asked for after translation. An empty handle is a memoized
/// miss: the resolver hands out the same empty handle for the key without looking again.
pub struct Handle<T: ?Sized> {
    key: SymbolKey,
    target: Option<Arc<T>>,
}

/// A resolved field.
pub type FieldHandle = Handle<dyn RuntimeField>;
/// A resolved method.
pub type MethodHandle = Handle<dyn RuntimeMethod>;
/// A resolved constructor.
pub type ConstructorHandle = Handle<dyn RuntimeConstructor>;

impl<T: ?Sized> Handle<T> {
    pub(crate) fn new(key: SymbolKey, target: Option<Arc<T>>) -> Self {
        Handle { key, target }
    }

    /// Returns the lookup key.
    #[must_use]
    pub fn key(&self) -> &SymbolKey {
        &self.key
    }

    /// Returns `true` if the member exists.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.target.is_some()
    }

    /// Returns the live member.
    #[must_use]
    pub fn get(&self) -> Option<&Arc<T>> {
        self.target.as_ref()
    }

    /// Returns the live member, or the miss as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SymbolNotFound`] for an empty handle.
    pub fn require(&self) -> crate::Result<&Arc<T>> {
        self.target.as_ref().ok_or_else(|| self.missing())
    }

    fn missing(&self) -> Error {
        let name = match &self.key.parameters {
            Some(parameters) if self.key.kind != SymbolKind::Field => {
                let names: Vec<&str> = parameters.iter().map(TypeRef::name).collect();
                format!("{}({})", self.key.name, names.join(", "))
            }
            _ => self.key.name.clone(),
        };

        Error::SymbolNotFound {
            kind: self.key.kind,
            owner: self.key.owner.name().to_string(),
            name,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("key", &self.key)
            .field("found", &self.is_found())
            .finish()
    }
}
