//! An in-memory [`HostRuntime`].
//!
//! [`MemoryRuntime`] holds type definitions built with [`TypeDef`]. Method and constructor
//! bodies are closures, the way emulation hooks are registered, so an embedder can model any
//! host surface it needs to drive the resolver: a real bridge into a running server, a
//! recorded snapshot of one, or a fixture in tests.
//!
//! Every lookup is counted in [`LookupStats`], which makes memoization in the layers above
//! observable.
//!
//! # Examples
//!
//! ```rust
//! use hostreflect::runtime::{HostRuntime, HostValue, MemoryRuntime, Modifiers, TypeDef};
//!
//! let runtime = MemoryRuntime::new();
//! let owner = runtime.define(
//!     TypeDef::new("net.minecraft.server.v1_8_R3.MinecraftServer").method(
//!         "getVersion",
//!         &[],
//!         "java.lang.String",
//!         Modifiers::PUBLIC | Modifiers::STATIC,
//!         |_, _| Ok(HostValue::from("1.8.8")),
//!     ),
//! );
//!
//! let method = runtime.declared_method(&owner, "getVersion", &[])?;
//! assert_eq!(method.invoke(None, &[])?, HostValue::from("1.8.8"));
//! assert_eq!(runtime.stats().methods(), 1);
//! # Ok::<(), hostreflect::Error>(())
//! ```

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use dashmap::DashMap;

use crate::{
    resolver::SymbolKind,
    runtime::{
        HostObject, HostRuntime, HostValue, Modifiers, RuntimeConstructor, RuntimeField,
        RuntimeMethod, TypeRef,
    },
    Error, Result,
};

/// Body of a method: receives the receiver (for instance methods) and the arguments.
pub type MethodFn =
    Arc<dyn Fn(Option<&HostValue>, &[HostValue]) -> Result<HostValue> + Send + Sync>;

/// Body of a constructor: receives the fresh, field-less instance and the arguments, and
/// returns the constructed value.
pub type ConstructorFn = Arc<dyn Fn(HostObject, &[HostValue]) -> Result<HostValue> + Send + Sync>;

/// Counters of live lookups performed against a [`MemoryRuntime`].
#[derive(Debug, Default)]
pub struct LookupStats {
    types: AtomicUsize,
    fields: AtomicUsize,
    methods: AtomicUsize,
    constructors: AtomicUsize,
}

impl LookupStats {
    /// Number of type lookups.
    #[must_use]
    pub fn types(&self) -> usize {
        self.types.load(Ordering::Relaxed)
    }

    /// Number of field lookups.
    #[must_use]
    pub fn fields(&self) -> usize {
        self.fields.load(Ordering::Relaxed)
    }

    /// Number of method lookups.
    #[must_use]
    pub fn methods(&self) -> usize {
        self.methods.load(Ordering::Relaxed)
    }

    /// Number of constructor lookups.
    #[must_use]
    pub fn constructors(&self) -> usize {
        self.constructors.load(Ordering::Relaxed)
    }

    /// Number of lookups of any kind.
    #[must_use]
    pub fn total(&self) -> usize {
        self.types() + self.fields() + self.methods() + self.constructors()
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.types.store(0, Ordering::Relaxed);
        self.fields.store(0, Ordering::Relaxed);
        self.methods.store(0, Ordering::Relaxed);
        self.constructors.store(0, Ordering::Relaxed);
    }
}

struct FieldDef {
    name: String,
    field_type: TypeRef,
    modifiers: Modifiers,
    initial: Option<HostValue>,
}

struct MethodDef {
    name: String,
    parameters: Vec<TypeRef>,
    return_type: TypeRef,
    modifiers: Modifiers,
    body: MethodFn,
}

struct ConstructorDef {
    parameters: Vec<TypeRef>,
    modifiers: Modifiers,
    body: ConstructorFn,
}

/// Builder for a type registered with [`MemoryRuntime::define`].
pub struct TypeDef {
    name: TypeRef,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
    constructors: Vec<ConstructorDef>,
}

impl TypeDef {
    /// Starts a definition for the type with dotted binary name `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        TypeDef {
            name: TypeRef::new(name),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Declares an instance field. Its value lives on each [`HostObject`].
    #[must_use]
    pub fn field(mut self, name: &str, field_type: &str, modifiers: Modifiers) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
            field_type: TypeRef::new(field_type),
            modifiers: modifiers - Modifiers::STATIC,
            initial: None,
        });
        self
    }

    /// Declares a static field with an initial value.
    #[must_use]
    pub fn static_field(
        mut self,
        name: &str,
        field_type: &str,
        modifiers: Modifiers,
        initial: impl Into<HostValue>,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
            field_type: TypeRef::new(field_type),
            modifiers: modifiers | Modifiers::STATIC,
            initial: Some(initial.into()),
        });
        self
    }

    /// Declares a method.
    ///
    /// # Arguments
    ///
    /// * `name` - Method name
    /// * `parameters` - Dotted binary names of the parameter types
    /// * `return_type` - Dotted binary name of the return type (`void` for none)
    /// * `modifiers` - Access and storage modifiers
    /// * `body` - The implementation
    #[must_use]
    pub fn method<F>(
        mut self,
        name: &str,
        parameters: &[&str],
        return_type: &str,
        modifiers: Modifiers,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&HostValue>, &[HostValue]) -> Result<HostValue> + Send + Sync + 'static,
    {
        self.methods.push(MethodDef {
            name: name.to_string(),
            parameters: parameters.iter().map(|p| TypeRef::new(p)).collect(),
            return_type: TypeRef::new(return_type),
            modifiers,
            body: Arc::new(body),
        });
        self
    }

    /// Declares a constructor.
    #[must_use]
    pub fn constructor<F>(mut self, parameters: &[&str], modifiers: Modifiers, body: F) -> Self
    where
        F: Fn(HostObject, &[HostValue]) -> Result<HostValue> + Send + Sync + 'static,
    {
        self.constructors.push(ConstructorDef {
            parameters: parameters.iter().map(|p| TypeRef::new(p)).collect(),
            modifiers,
            body: Arc::new(body),
        });
        self
    }
}

/// Shared gate for the access rule of every member kind.
struct Access {
    member: String,
    modifiers: Modifiers,
    accessible: AtomicBool,
}

impl Access {
    fn new(member: String, modifiers: Modifiers) -> Self {
        Access {
            member,
            modifiers,
            accessible: AtomicBool::new(false),
        }
    }

    fn check(&self) -> Result<()> {
        if self.modifiers.contains(Modifiers::PUBLIC) || self.accessible.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(Error::IllegalAccess {
                member: self.member.clone(),
            })
        }
    }

    fn set(&self, accessible: bool) {
        self.accessible.store(accessible, Ordering::Release);
    }

    fn receiver<'a>(&self, receiver: Option<&'a HostValue>) -> Result<Option<&'a HostObject>> {
        if self.modifiers.contains(Modifiers::STATIC) {
            return Ok(None);
        }

        match receiver {
            Some(HostValue::Object(object)) => Ok(Some(object)),
            _ => Err(Error::NullReceiver {
                member: self.member.clone(),
            }),
        }
    }

    fn arguments(&self, parameters: &[TypeRef], args: &[HostValue]) -> Result<()> {
        let fits = parameters.len() == args.len()
            && parameters
                .iter()
                .zip(args)
                .all(|(parameter, arg)| arg.fits(parameter));

        if fits {
            Ok(())
        } else {
            Err(Error::ArgumentMismatch {
                member: self.member.clone(),
                expected: describe(parameters.iter().map(TypeRef::name)),
                actual: describe(args.iter().map(HostValue::type_name)),
            })
        }
    }
}

fn describe<'a>(names: impl Iterator<Item = &'a str>) -> String {
    format!("({})", names.collect::<Vec<_>>().join(", "))
}

struct MemoryField {
    owner: TypeRef,
    name: String,
    field_type: TypeRef,
    access: Access,
    statics: Arc<DashMap<String, HostValue>>,
}

impl RuntimeField for MemoryField {
    fn owner(&self) -> &TypeRef {
        &self.owner
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field_type(&self) -> &TypeRef {
        &self.field_type
    }

    fn modifiers(&self) -> Modifiers {
        self.access.modifiers
    }

    fn set_accessible(&self, accessible: bool) {
        self.access.set(accessible);
    }

    fn get(&self, receiver: Option<&HostValue>) -> Result<HostValue> {
        self.access.check()?;

        let value = match self.access.receiver(receiver)? {
            Some(object) => object.field(&self.name),
            None => self.statics.get(&self.name).map(|value| value.clone()),
        };
        Ok(value.unwrap_or(HostValue::Null))
    }

    fn set(&self, receiver: Option<&HostValue>, value: HostValue) -> Result<()> {
        self.access.check()?;
        if self.access.modifiers.contains(Modifiers::FINAL) {
            return Err(Error::IllegalAccess {
                member: self.access.member.clone(),
            });
        }
        self.access
            .arguments(std::slice::from_ref(&self.field_type), std::slice::from_ref(&value))?;

        match self.access.receiver(receiver)? {
            Some(object) => object.set_field(&self.name, value),
            None => {
                self.statics.insert(self.name.clone(), value);
            }
        }
        Ok(())
    }
}

struct MemoryMethod {
    owner: TypeRef,
    name: String,
    parameters: Vec<TypeRef>,
    return_type: TypeRef,
    access: Access,
    body: MethodFn,
}

impl RuntimeMethod for MemoryMethod {
    fn owner(&self) -> &TypeRef {
        &self.owner
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[TypeRef] {
        &self.parameters
    }

    fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    fn modifiers(&self) -> Modifiers {
        self.access.modifiers
    }

    fn set_accessible(&self, accessible: bool) {
        self.access.set(accessible);
    }

    fn invoke(&self, receiver: Option<&HostValue>, args: &[HostValue]) -> Result<HostValue> {
        self.access.check()?;
        let receiver = match self.access.receiver(receiver)? {
            Some(_) => receiver,
            None => None,
        };
        self.access.arguments(&self.parameters, args)?;

        (self.body)(receiver, args)
    }
}

struct MemoryConstructor {
    owner: TypeRef,
    parameters: Vec<TypeRef>,
    access: Access,
    body: ConstructorFn,
}

impl RuntimeConstructor for MemoryConstructor {
    fn owner(&self) -> &TypeRef {
        &self.owner
    }

    fn parameters(&self) -> &[TypeRef] {
        &self.parameters
    }

    fn modifiers(&self) -> Modifiers {
        self.access.modifiers
    }

    fn set_accessible(&self, accessible: bool) {
        self.access.set(accessible);
    }

    fn new_instance(&self, args: &[HostValue]) -> Result<HostValue> {
        self.access.check()?;
        self.access.arguments(&self.parameters, args)?;

        (self.body)(HostObject::new(self.owner.clone()), args)
    }
}

struct MemoryType {
    fields: HashMap<String, Arc<MemoryField>>,
    methods: Vec<Arc<MemoryMethod>>,
    constructors: Vec<Arc<MemoryConstructor>>,
}

/// A thread-safe in-memory host runtime.
#[derive(Default)]
pub struct MemoryRuntime {
    /// Defined types by dotted binary name
    types: DashMap<String, Arc<MemoryType>>,
    /// Lookup counters
    stats: LookupStats,
}

impl MemoryRuntime {
    /// Creates an empty runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type, replacing any earlier definition with the same name.
    ///
    /// # Returns
    ///
    /// The [`TypeRef`] of the defined type.
    pub fn define(&self, def: TypeDef) -> TypeRef {
        let owner = def.name;
        let statics = Arc::new(DashMap::new());

        let mut fields = HashMap::new();
        for field in def.fields {
            if let Some(initial) = field.initial {
                statics.insert(field.name.clone(), initial);
            }
            let member = format!("{}.{}", owner, field.name);
            fields.insert(
                field.name.clone(),
                Arc::new(MemoryField {
                    owner: owner.clone(),
                    name: field.name,
                    field_type: field.field_type,
                    access: Access::new(member, field.modifiers),
                    statics: statics.clone(),
                }),
            );
        }

        let methods = def
            .methods
            .into_iter()
            .map(|method| {
                let member = format!("{}.{}{}", owner, method.name, signature(&method.parameters));
                Arc::new(MemoryMethod {
                    owner: owner.clone(),
                    name: method.name,
                    parameters: method.parameters,
                    return_type: method.return_type,
                    access: Access::new(member, method.modifiers),
                    body: method.body,
                })
            })
            .collect();

        let constructors = def
            .constructors
            .into_iter()
            .map(|constructor| {
                let member = format!("{}.<init>{}", owner, signature(&constructor.parameters));
                Arc::new(MemoryConstructor {
                    owner: owner.clone(),
                    parameters: constructor.parameters,
                    access: Access::new(member, constructor.modifiers),
                    body: constructor.body,
                })
            })
            .collect();

        self.types.insert(
            owner.name().to_string(),
            Arc::new(MemoryType {
                fields,
                methods,
                constructors,
            }),
        );
        owner
    }

    /// Returns the lookup counters.
    #[must_use]
    pub fn stats(&self) -> &LookupStats {
        &self.stats
    }

    /// Returns the number of defined types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn definition(&self, owner: &TypeRef, kind: SymbolKind, name: &str) -> Result<Arc<MemoryType>> {
        self.types
            .get(owner.name())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::SymbolNotFound {
                kind,
                owner: owner.name().to_string(),
                name: name.to_string(),
            })
    }
}

fn signature(parameters: &[TypeRef]) -> String {
    describe(parameters.iter().map(TypeRef::name))
}

impl HostRuntime for MemoryRuntime {
    fn find_type(&self, name: &str) -> Result<TypeRef> {
        self.stats.types.fetch_add(1, Ordering::Relaxed);

        if self.types.contains_key(name) {
            return Ok(TypeRef::new(name));
        }

        let (package, simple) = name.rsplit_once('.').unwrap_or(("", name));
        Err(Error::SymbolNotFound {
            kind: SymbolKind::Type,
            owner: package.to_string(),
            name: simple.to_string(),
        })
    }

    fn declared_field(&self, owner: &TypeRef, name: &str) -> Result<Arc<dyn RuntimeField>> {
        self.stats.fields.fetch_add(1, Ordering::Relaxed);

        let definition = self.definition(owner, SymbolKind::Field, name)?;
        match definition.fields.get(name) {
            Some(field) => Ok(field.clone() as Arc<dyn RuntimeField>),
            None => Err(Error::SymbolNotFound {
                kind: SymbolKind::Field,
                owner: owner.name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    fn declared_method(
        &self,
        owner: &TypeRef,
        name: &str,
        parameters: &[TypeRef],
    ) -> Result<Arc<dyn RuntimeMethod>> {
        self.stats.methods.fetch_add(1, Ordering::Relaxed);

        let definition = self.definition(owner, SymbolKind::Method, name)?;
        definition
            .methods
            .iter()
            .find(|method| method.name == name && method.parameters == parameters)
            .map(|method| method.clone() as Arc<dyn RuntimeMethod>)
            .ok_or_else(|| Error::SymbolNotFound {
                kind: SymbolKind::Method,
                owner: owner.name().to_string(),
                name: format!("{}{}", name, signature(parameters)),
            })
    }

    fn declared_constructor(
        &self,
        owner: &TypeRef,
        parameters: &[TypeRef],
    ) -> Result<Arc<dyn RuntimeConstructor>> {
        self.stats.constructors.fetch_add(1, Ordering::Relaxed);

        let definition = self.definition(owner, SymbolKind::Constructor, "<init>")?;
        definition
            .constructors
            .iter()
            .find(|constructor| constructor.parameters == parameters)
            .map(|constructor| constructor.clone() as Arc<dyn RuntimeConstructor>)
            .ok_or_else(|| Error::SymbolNotFound {
                kind: SymbolKind::Constructor,
                owner: owner.name().to_string(),
                name: format!("<init>{}", signature(parameters)),
            })
    }
}
