//! The memoizing symbol resolver.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace, warn};

use crate::{
    config::ResolverConfig,
    host::{Capsule, HostEnvironment, HostProbe, HostVariantDetector},
    remap::{HostRemapper, RemappingProvider},
    resolver::{
        ConstructorHandle, DirectLookup, FieldHandle, Handle, MethodHandle, RemappedLookup,
        SymbolKey, SymbolSource, TypeHandle,
    },
    runtime::{HostRuntime, HostValue, TypeRef},
    Error, Result,
};

/// Number of entries held in each resolver cache, misses included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachedCounts {
    /// Type handles
    pub types: usize,
    /// Field handles
    pub fields: usize,
    /// Method handles
    pub methods: usize,
    /// Constructor handles
    pub constructors: usize,
}

impl CachedCounts {
    /// Total number of cached handles.
    #[must_use]
    pub fn total(&self) -> usize {
        self.types + self.fields + self.methods + self.constructors
    }
}

/// Resolves and caches types and members of the running host.
///
/// Every lookup is memoized by key, successes and misses alike: a key moves from
/// unresolved to found or missing exactly once and never back. Lookups are permissive.
/// A missing symbol yields an empty handle and a debug log line, and a failing invocation
/// yields `None` and a warning. Only configuration errors are returned as [`Error`].
///
/// The resolver is `Send + Sync`; concurrent first lookups of one key may both reach the
/// runtime, but the first handle stored is the one every caller gets from then on.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use hostreflect::{
///     host::{HostEnvironment, HostVariant, Version},
///     resolver::SymbolResolver,
///     runtime::{HostValue, MemoryRuntime, Modifiers, TypeDef},
/// };
///
/// let runtime = Arc::new(MemoryRuntime::new());
/// runtime.define(TypeDef::new("net.minecraft.server.v1_8_R3.MinecraftServer").method(
///     "getServer",
///     &[],
///     "java.lang.String",
///     Modifiers::PUBLIC | Modifiers::STATIC,
///     |_, _| Ok(HostValue::from("server")),
/// ));
///
/// let environment = HostEnvironment::new(
///     HostVariant::Spigot,
///     Some(Version::from_parts(&[1, 8])),
///     Some("v1_8_R3"),
/// );
/// let resolver = SymbolResolver::direct(environment, runtime);
///
/// let server = resolver.get_internal_type("MinecraftServer")?;
/// let owner = server.type_ref().expect("type is defined");
/// let method = resolver.get_method(owner, "getServer", &[]);
/// assert_eq!(resolver.invoke_static(&method, &[]), Some(HostValue::from("server")));
/// # Ok::<(), hostreflect::Error>(())
/// ```
pub struct SymbolResolver {
    /// The host the resolver was built for
    environment: HostEnvironment,
    /// Package roots and overload policy
    config: ResolverConfig,
    /// How names are translated and found
    source: Arc<dyn SymbolSource>,
    /// Type handles by requested name
    types: DashMap<String, Arc<TypeHandle>>,
    /// Field handles by translated key
    fields: DashMap<SymbolKey, Arc<FieldHandle>>,
    /// Method handles by translated key
    methods: DashMap<SymbolKey, Arc<MethodHandle>>,
    /// Constructor handles by key
    constructors: DashMap<SymbolKey, Arc<ConstructorHandle>>,
}

impl SymbolResolver {
    /// Creates a resolver over an explicit lookup strategy.
    #[must_use]
    pub fn new(environment: HostEnvironment, source: Arc<dyn SymbolSource>) -> Self {
        Self::with_config(environment, source, ResolverConfig::default())
    }

    /// Creates a resolver over an explicit lookup strategy and configuration.
    #[must_use]
    pub fn with_config(
        environment: HostEnvironment,
        source: Arc<dyn SymbolSource>,
        config: ResolverConfig,
    ) -> Self {
        SymbolResolver {
            environment,
            config,
            source,
            types: DashMap::new(),
            fields: DashMap::new(),
            methods: DashMap::new(),
            constructors: DashMap::new(),
        }
    }

    /// Creates a resolver that looks names up unchanged.
    #[must_use]
    pub fn direct(environment: HostEnvironment, runtime: Arc<dyn HostRuntime>) -> Self {
        Self::new(environment, Arc::new(DirectLookup::new(runtime)))
    }

    /// Creates a resolver for a detected host, remapping when the host supports it.
    ///
    /// When a [`RemappingProvider`] cannot be built, the reason is logged and the resolver
    /// falls back to direct lookups.
    ///
    /// # Arguments
    ///
    /// * `environment` - The detected host
    /// * `runtime` - The host's reflective surface
    /// * `remapper` - The remapper the host exposes, if any
    /// * `config` - Package roots and overload policy
    #[must_use]
    pub fn for_host(
        environment: HostEnvironment,
        runtime: Arc<dyn HostRuntime>,
        remapper: Option<Arc<dyn HostRemapper>>,
        config: ResolverConfig,
    ) -> Self {
        let source: Arc<dyn SymbolSource> = match RemappingProvider::new(&environment, remapper) {
            Ok(provider) => {
                let provider = provider.with_strict_overloads(config.strict_overloads);
                Arc::new(RemappedLookup::new(runtime, provider))
            }
            Err(error) => {
                debug!(variant = %environment.variant(), %error, "resolving without remapping");
                Arc::new(DirectLookup::new(runtime))
            }
        };

        Self::with_config(environment, source, config)
    }

    /// Detects the host through `detector` and creates a resolver for it.
    ///
    /// The remapper is the one captured by detection; `probe` is not read again.
    #[must_use]
    pub fn from_probe(
        detector: &HostVariantDetector,
        probe: &dyn HostProbe,
        runtime: Arc<dyn HostRuntime>,
        config: ResolverConfig,
    ) -> Self {
        let environment = detector.detect(probe).clone();
        let remapper = environment.remapper().cloned();

        Self::for_host(environment, runtime, remapper, config)
    }

    /// Returns the host environment.
    #[must_use]
    pub fn environment(&self) -> &HostEnvironment {
        &self.environment
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the active remapping provider, if any.
    #[must_use]
    pub fn remapper(&self) -> Option<&RemappingProvider> {
        self.source.remapper()
    }

    /// Returns the number of cached handles of each kind.
    #[must_use]
    pub fn cached_counts(&self) -> CachedCounts {
        CachedCounts {
            types: self.types.len(),
            fields: self.fields.len(),
            methods: self.methods.len(),
            constructors: self.constructors.len(),
        }
    }

    /// Look up a type by dotted binary name.
    ///
    /// Never fails: a missing type is logged and memoized as an empty handle.
    pub fn get_type(&self, name: &str) -> Arc<TypeHandle> {
        if let Some(handle) = self.types.get(name) {
            trace!(name, "type cache hit");
            return handle.value().clone();
        }

        let ty = match self.source.find_type(name) {
            Ok(ty) => Some(ty),
            Err(error) => {
                debug!(name, %error, "type not found");
                None
            }
        };

        self.types
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(TypeHandle::new(name, ty)))
            .clone()
    }

    /// Look up a type of the server internals, e.g. `EntityPlayer`.
    ///
    /// The name is composed as `<internal package>.<package tag>.<simple name>`, the tag
    /// omitted when the host has none. With remapping active, the translated name is tried
    /// first and the composed name second.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCapsule`] on an unknown host, [`Error::UnsupportedCapsule`] on a
    /// Sponge host, or [`Error::Translation`] if the remapper fails.
    pub fn get_internal_type(&self, simple_name: &str) -> Result<Arc<TypeHandle>> {
        let package = self.versioned_package(&self.config.internal_package, "internal types")?;
        self.get_versioned_type(&package, simple_name)
    }

    /// Look up a type of the API implementation, e.g. `entity.CraftPlayer`.
    ///
    /// # Errors
    ///
    /// See [`SymbolResolver::get_internal_type`].
    pub fn get_api_impl_type(&self, simple_name: &str) -> Result<Arc<TypeHandle>> {
        let package =
            self.versioned_package(&self.config.api_impl_package, "API implementation types")?;
        self.get_versioned_type(&package, simple_name)
    }

    fn versioned_package(&self, root: &str, capability: &'static str) -> Result<String> {
        match self.environment.require_capsule()? {
            Capsule::BaseApi => {}
            capsule @ Capsule::SpongeApi => {
                return Err(Error::UnsupportedCapsule {
                    capsule,
                    capability,
                })
            }
        }

        Ok(match self.environment.package_tag() {
            Some(tag) => format!("{}.{}", root, tag),
            None => root.to_string(),
        })
    }

    fn get_versioned_type(&self, package: &str, simple_name: &str) -> Result<Arc<TypeHandle>> {
        let name = format!("{}.{}", package, simple_name);

        if self.source.remapper().is_some() {
            let translated = self.source.translate_type(&name)?;
            if translated != name {
                let handle = self.get_type(&translated);
                if handle.is_found() {
                    return Ok(handle);
                }
                debug!(name = %name, translated = %translated, "translated type missing, trying original");
            }
        }

        Ok(self.get_type(&name))
    }

    /// Look up a method declared on `owner` with exactly `parameters`.
    ///
    /// With remapping active the name is translated first; the handle is cached under the
    /// translated name. Found methods are made accessible.
    pub fn get_method(&self, owner: &TypeRef, name: &str, parameters: &[TypeRef]) -> Arc<MethodHandle> {
        let translated = self.source.translate_method(owner, name, parameters);
        let key = SymbolKey::method(owner, &translated, parameters);

        if let Some(handle) = self.methods.get(&key) {
            trace!(key = %key, "method cache hit");
            return handle.value().clone();
        }

        let target = match self.source.find_method(owner, &translated, parameters) {
            Ok(method) => {
                method.set_accessible(true);
                Some(method)
            }
            Err(error) => {
                debug!(key = %key, %error, "method not found");
                None
            }
        };

        self.methods
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Handle::new(key, target)))
            .clone()
    }

    /// Look up a field declared on `owner`.
    ///
    /// Same caching and translation rules as [`SymbolResolver::get_method`], without
    /// parameter types.
    pub fn get_field(&self, owner: &TypeRef, name: &str) -> Arc<FieldHandle> {
        let translated = self.source.translate_field(owner, name);
        let key = SymbolKey::field(owner, &translated);

        if let Some(handle) = self.fields.get(&key) {
            trace!(key = %key, "field cache hit");
            return handle.value().clone();
        }

        let target = match self.source.find_field(owner, &translated) {
            Ok(field) => {
                field.set_accessible(true);
                Some(field)
            }
            Err(error) => {
                debug!(key = %key, %error, "field not found");
                None
            }
        };

        self.fields
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Handle::new(key, target)))
            .clone()
    }

    /// Look up a constructor of `owner` with exactly `parameters`.
    pub fn get_constructor(&self, owner: &TypeRef, parameters: &[TypeRef]) -> Arc<ConstructorHandle> {
        let key = SymbolKey::constructor(owner, parameters);

        if let Some(handle) = self.constructors.get(&key) {
            trace!(key = %key, "constructor cache hit");
            return handle.value().clone();
        }

        let target = match self.source.find_constructor(owner, parameters) {
            Ok(constructor) => {
                constructor.set_accessible(true);
                Some(constructor)
            }
            Err(error) => {
                debug!(key = %key, %error, "constructor not found");
                None
            }
        };

        self.constructors
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Handle::new(key, target)))
            .clone()
    }

    /// Read a field through a resolved handle.
    ///
    /// # Arguments
    ///
    /// * `handle` - The field
    /// * `instance` - The object to read from, `None` for static fields
    ///
    /// # Errors
    ///
    /// Returns the miss for an empty handle, or the failure of the read.
    pub fn try_get_field_value(
        &self,
        handle: &FieldHandle,
        instance: Option<&HostValue>,
    ) -> Result<HostValue> {
        handle.require()?.get(instance)
    }

    /// Read a field through a resolved handle, `None` on any failure.
    pub fn get_field_value(&self, handle: &FieldHandle, instance: Option<&HostValue>) -> Option<HostValue> {
        match self.try_get_field_value(handle, instance) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key = %handle.key(), %error, "field read failed");
                None
            }
        }
    }

    /// Read the field `name` declared on the runtime type of `instance`.
    ///
    /// Returns `None` if `instance` is not an object, the field does not exist, or the read
    /// fails.
    pub fn get_field_value_by_name(&self, instance: &HostValue, name: &str) -> Option<HostValue> {
        let Some(object) = instance.as_object() else {
            warn!(name, value = ?instance, "field read on a non-object");
            return None;
        };

        let handle = self.get_field(object.class(), name);
        self.get_field_value(&handle, Some(instance))
    }

    /// Write a field through a resolved handle.
    ///
    /// # Returns
    ///
    /// `true` if the value was written; failures are logged.
    pub fn set_field_value(
        &self,
        handle: &FieldHandle,
        instance: Option<&HostValue>,
        value: HostValue,
    ) -> bool {
        let result = handle
            .require()
            .and_then(|field| field.set(instance, value));
        match result {
            Ok(()) => true,
            Err(error) => {
                warn!(key = %handle.key(), %error, "field write failed");
                false
            }
        }
    }

    /// Invoke a method through a resolved handle.
    ///
    /// # Errors
    ///
    /// Returns the miss for an empty handle, or the failure of the invocation.
    pub fn try_invoke(
        &self,
        handle: &MethodHandle,
        instance: Option<&HostValue>,
        args: &[HostValue],
    ) -> Result<HostValue> {
        handle.require()?.invoke(instance, args)
    }

    /// Invoke an instance method, `None` on any failure.
    ///
    /// Failures are logged and never memoized; the next call tries again.
    pub fn invoke(&self, handle: &MethodHandle, instance: &HostValue, args: &[HostValue]) -> Option<HostValue> {
        self.invoke_logged(handle, Some(instance), args)
    }

    /// Invoke a static method, `None` on any failure.
    pub fn invoke_static(&self, handle: &MethodHandle, args: &[HostValue]) -> Option<HostValue> {
        self.invoke_logged(handle, None, args)
    }

    fn invoke_logged(
        &self,
        handle: &MethodHandle,
        instance: Option<&HostValue>,
        args: &[HostValue],
    ) -> Option<HostValue> {
        match self.try_invoke(handle, instance, args) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key = %handle.key(), %error, "invocation failed");
                None
            }
        }
    }

    /// Construct an object through a resolved handle.
    ///
    /// # Errors
    ///
    /// Returns the miss for an empty handle, or the failure of the constructor.
    pub fn try_new_instance(&self, handle: &ConstructorHandle, args: &[HostValue]) -> Result<HostValue> {
        handle.require()?.new_instance(args)
    }

    /// Construct an object, `None` on any failure.
    pub fn new_instance(&self, handle: &ConstructorHandle, args: &[HostValue]) -> Option<HostValue> {
        match self.try_new_instance(handle, args) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key = %handle.key(), %error, "construction failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for SymbolResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolResolver")
            .field("environment", &self.environment)
            .field("remapping", &self.remapper().is_some())
            .field("cached", &self.cached_counts())
            .finish()
    }
}
