//! Values passed to and returned from host members.

use std::{any::Any, fmt, sync::Arc};

use dashmap::DashMap;

use crate::runtime::TypeRef;

/// A shared reference to a host object.
pub type ObjectRef = Arc<HostObject>;

/// A value crossing the reflective boundary.
///
/// Objects compare by identity; all other variants compare by value.
#[derive(Clone)]
pub enum HostValue {
    /// The null reference, also the result of `void` methods.
    Null,
    /// A `boolean`.
    Bool(bool),
    /// An `int`.
    Int(i32),
    /// A `long`.
    Long(i64),
    /// A `double`.
    Double(f64),
    /// A `java.lang.String`.
    Str(Arc<str>),
    /// Any other object.
    Object(ObjectRef),
}

impl HostValue {
    /// Returns the binary name of the value's runtime type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            HostValue::Null => "null",
            HostValue::Bool(_) => "boolean",
            HostValue::Int(_) => "int",
            HostValue::Long(_) => "long",
            HostValue::Double(_) => "double",
            HostValue::Str(_) => "java.lang.String",
            HostValue::Object(object) => object.class().name(),
        }
    }

    /// Returns `true` for [`HostValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }

    /// Returns the object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            HostValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            HostValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a `boolean`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string, if this is a `java.lang.String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Check whether this value may be passed for a parameter of type `parameter`.
    ///
    /// Primitives must match exactly. Reference parameters accept null, strings where a
    /// string is expected, and any object: the object hierarchy is not known here.
    #[must_use]
    pub fn fits(&self, parameter: &TypeRef) -> bool {
        if parameter.is_primitive() {
            return self.type_name() == parameter.name();
        }

        match self {
            HostValue::Null | HostValue::Object(_) => true,
            HostValue::Str(_) => matches!(
                parameter.name(),
                "java.lang.String" | "java.lang.Object" | "java.lang.CharSequence"
            ),
            _ => false,
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::Null, HostValue::Null) => true,
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::Int(a), HostValue::Int(b)) => a == b,
            (HostValue::Long(a), HostValue::Long(b)) => a == b,
            (HostValue::Double(a), HostValue::Double(b)) => a == b,
            (HostValue::Str(a), HostValue::Str(b)) => a == b,
            (HostValue::Object(a), HostValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Null => write!(f, "null"),
            HostValue::Bool(value) => write!(f, "{}", value),
            HostValue::Int(value) => write!(f, "{}", value),
            HostValue::Long(value) => write!(f, "{}L", value),
            HostValue::Double(value) => write!(f, "{}D", value),
            HostValue::Str(value) => write!(f, "{:?}", value),
            HostValue::Object(object) => write!(f, "{}@{:p}", object.class(), Arc::as_ptr(object)),
        }
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        HostValue::Bool(value)
    }
}

impl From<i32> for HostValue {
    fn from(value: i32) -> Self {
        HostValue::Int(value)
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        HostValue::Long(value)
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        HostValue::Double(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::Str(Arc::from(value))
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        HostValue::Str(Arc::from(value))
    }
}

impl From<ObjectRef> for HostValue {
    fn from(value: ObjectRef) -> Self {
        HostValue::Object(value)
    }
}

impl From<HostObject> for HostValue {
    fn from(value: HostObject) -> Self {
        HostValue::Object(Arc::new(value))
    }
}

/// An instance of a host type with per-instance field storage.
///
/// An optional payload carries native data for objects that wrap something outside the
/// field model, such as a network channel.
pub struct HostObject {
    /// The runtime type of the object
    class: TypeRef,
    /// Instance field values by name
    fields: DashMap<String, HostValue>,
    /// Native data attached to the object
    payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl HostObject {
    /// Creates an object of type `class` with no fields set.
    #[must_use]
    pub fn new(class: TypeRef) -> Self {
        HostObject {
            class,
            fields: DashMap::new(),
            payload: None,
        }
    }

    /// Sets an instance field while building the object.
    #[must_use]
    pub fn with_field(self, name: &str, value: impl Into<HostValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Attaches native data while building the object.
    #[must_use]
    pub fn with_payload<T: Any + Send + Sync>(mut self, payload: T) -> Self {
        self.payload = Some(Arc::new(payload));
        self
    }

    /// Returns the runtime type.
    #[must_use]
    pub fn class(&self) -> &TypeRef {
        &self.class
    }

    /// Returns the value of an instance field, if it was ever set.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<HostValue> {
        self.fields.get(name).map(|value| value.clone())
    }

    /// Sets an instance field.
    pub fn set_field(&self, name: &str, value: HostValue) {
        self.fields.insert(name.to_string(), value);
    }

    /// Returns the payload if it is of type `T`.
    #[must_use]
    pub fn payload<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|payload| payload.downcast_ref::<T>())
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("class", &self.class)
            .field("fields", &self.fields.len())
            .finish()
    }
}
