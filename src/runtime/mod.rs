//! The reflective surface of the host process.
//!
//! Everything the resolver looks up is found through a [`HostRuntime`]: types by binary
//! name, and fields, methods and constructors declared on a type. Members come back as
//! trait objects that can be read, written, invoked or constructed with [`HostValue`]
//! arguments.
//!
//! # Key Components
//!
//! - [`TypeRef`] - Identity of a type, by its binary name
//! - [`HostValue`] / [`HostObject`] - Values crossing the reflective boundary
//! - [`RuntimeField`], [`RuntimeMethod`], [`RuntimeConstructor`] - Live members
//! - [`HostRuntime`] - Declared-member lookup, the way `getDeclaredMethod` works: members
//!   are found only on the type that declares them, with an exact parameter list
//! - [`MemoryRuntime`] - A complete in-memory runtime
//!
//! # Access Rules
//!
//! Members without [`Modifiers::PUBLIC`] refuse every read, write or call with
//! [`crate::Error::IllegalAccess`] until `set_accessible(true)` is called on them. The
//! resolver does that for every member it hands out.

mod memory;
mod value;

use std::{fmt, sync::Arc};

use bitflags::bitflags;

pub use memory::{ConstructorFn, LookupStats, MemoryRuntime, MethodFn, TypeDef};
pub use value::{HostObject, HostValue, ObjectRef};

use crate::Result;

bitflags! {
    /// Access and storage modifiers of a member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        /// Accessible without `set_accessible`
        const PUBLIC = 0x0001;
        /// Visible only inside the declaring type
        const PRIVATE = 0x0002;
        /// Visible to subclasses and the package
        const PROTECTED = 0x0004;
        /// Belongs to the type, not to an instance
        const STATIC = 0x0008;
        /// Cannot be written after construction
        const FINAL = 0x0010;
    }
}

/// Binary names of the primitive types.
const PRIMITIVES: [&str; 9] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Identity of a host type.
///
/// Two `TypeRef`s are equal iff their binary names are equal, so parameter lists compare
/// element-wise by name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(Arc<str>);

impl TypeRef {
    /// Creates a reference from a dotted binary name such as `net.minecraft.server.v1_8_R3.Packet`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        TypeRef(Arc::from(name))
    }

    /// Returns the dotted binary name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns the slash-delimited internal name, e.g. `net/minecraft/server/v1_8_R3/Packet`.
    #[must_use]
    pub fn internal_name(&self) -> String {
        self.0.replace('.', "/")
    }

    /// Returns the name without its package.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Returns `true` for `int`, `boolean` and the other primitive types.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.contains(&self.name())
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A field declared on a host type.
pub trait RuntimeField: Send + Sync {
    /// The declaring type.
    fn owner(&self) -> &TypeRef;

    /// The field name.
    fn name(&self) -> &str;

    /// The declared type of the field.
    fn field_type(&self) -> &TypeRef;

    /// The field modifiers.
    fn modifiers(&self) -> Modifiers;

    /// Allow or forbid access regardless of visibility.
    fn set_accessible(&self, accessible: bool);

    /// Read the field.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The instance to read from, `None` for static fields
    ///
    /// # Errors
    ///
    /// Fails if the field is inaccessible or an instance field is read without an object.
    fn get(&self, receiver: Option<&HostValue>) -> Result<HostValue>;

    /// Write the field.
    ///
    /// # Errors
    ///
    /// Fails if the field is inaccessible, final, or the value does not fit its type.
    fn set(&self, receiver: Option<&HostValue>, value: HostValue) -> Result<()>;
}

/// A method declared on a host type.
pub trait RuntimeMethod: Send + Sync {
    /// The declaring type.
    fn owner(&self) -> &TypeRef;

    /// The method name.
    fn name(&self) -> &str;

    /// The declared parameter types.
    fn parameters(&self) -> &[TypeRef];

    /// The declared return type.
    fn return_type(&self) -> &TypeRef;

    /// The method modifiers.
    fn modifiers(&self) -> Modifiers;

    /// Allow or forbid access regardless of visibility.
    fn set_accessible(&self, accessible: bool);

    /// Call the method.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The instance to call on, `None` for static methods
    /// * `args` - The arguments, matching [`RuntimeMethod::parameters`]
    ///
    /// # Errors
    ///
    /// Fails on access violations, argument mismatches, or a failure inside the method.
    fn invoke(&self, receiver: Option<&HostValue>, args: &[HostValue]) -> Result<HostValue>;
}

/// A constructor declared on a host type.
pub trait RuntimeConstructor: Send + Sync {
    /// The type being constructed.
    fn owner(&self) -> &TypeRef;

    /// The declared parameter types.
    fn parameters(&self) -> &[TypeRef];

    /// The constructor modifiers.
    fn modifiers(&self) -> Modifiers;

    /// Allow or forbid access regardless of visibility.
    fn set_accessible(&self, accessible: bool);

    /// Construct a new instance.
    ///
    /// # Errors
    ///
    /// Fails on access violations, argument mismatches, or a failure inside the constructor.
    fn new_instance(&self, args: &[HostValue]) -> Result<HostValue>;
}

/// Live, name-based lookup into the host process.
///
/// Implementations report a missing symbol as [`crate::Error::SymbolNotFound`]. Lookups are
/// expected to be pure: the same question always yields an equivalent answer.
pub trait HostRuntime: Send + Sync {
    /// Find a type by dotted binary name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SymbolNotFound`] if no such type is loaded.
    fn find_type(&self, name: &str) -> Result<TypeRef>;

    /// Find a field declared on `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SymbolNotFound`] if `owner` declares no such field.
    fn declared_field(&self, owner: &TypeRef, name: &str) -> Result<Arc<dyn RuntimeField>>;

    /// Find a method declared on `owner` with exactly the given parameter types.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SymbolNotFound`] if `owner` declares no such method.
    fn declared_method(
        &self,
        owner: &TypeRef,
        name: &str,
        parameters: &[TypeRef],
    ) -> Result<Arc<dyn RuntimeMethod>>;

    /// Find a constructor of `owner` with exactly the given parameter types.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SymbolNotFound`] if `owner` declares no such constructor.
    fn declared_constructor(
        &self,
        owner: &TypeRef,
        parameters: &[TypeRef],
    ) -> Result<Arc<dyn RuntimeConstructor>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typeref_names() {
        let packet = TypeRef::new("net.minecraft.server.v1_8_R3.Packet");
        assert_eq!(packet.simple_name(), "Packet");
        assert_eq!(packet.internal_name(), "net/minecraft/server/v1_8_R3/Packet");
        assert!(!packet.is_primitive());
        assert!(TypeRef::new("int").is_primitive());
        assert_eq!(TypeRef::new("Packet").simple_name(), "Packet");
    }

    #[test]
    fn test_typeref_equality() {
        let params_a = vec![TypeRef::new("int"), TypeRef::new("java.lang.String")];
        let params_b = vec![TypeRef::new("int"), TypeRef::new("java.lang.String")];
        assert_eq!(params_a, params_b);
        assert_ne!(params_a, vec![TypeRef::new("int")]);
    }
}
