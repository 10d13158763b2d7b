//! Lookup strategies behind the resolver.
//!
//! A [`SymbolSource`] answers two questions: what is this symbol called in the running host,
//! and does it exist. [`DirectLookup`] asks the runtime under the plugin-facing name;
//! [`RemappedLookup`] translates through a [`RemappingProvider`] first.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use crate::{
    remap::RemappingProvider,
    resolver::SymbolKey,
    runtime::{HostRuntime, RuntimeConstructor, RuntimeField, RuntimeMethod, TypeRef},
    Result,
};

/// Strategy used by [`crate::resolver::SymbolResolver`] to name and find symbols.
///
/// The `translate_*` hooks default to the identity, so a source without remapping only
/// implements the four lookups.
pub trait SymbolSource: Send + Sync {
    /// Find a type by dotted binary name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SymbolNotFound`] if the type does not exist.
    fn find_type(&self, name: &str) -> Result<TypeRef>;

    /// Find a field declared on `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SymbolNotFound`] if the field does not exist.
    fn find_field(&self, owner: &TypeRef, name: &str) -> Result<Arc<dyn RuntimeField>>;

    /// Find a method declared on `owner` with exactly `parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SymbolNotFound`] if the method does not exist.
    fn find_method(
        &self,
        owner: &TypeRef,
        name: &str,
        parameters: &[TypeRef],
    ) -> Result<Arc<dyn RuntimeMethod>>;

    /// Find a constructor of `owner` with exactly `parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SymbolNotFound`] if the constructor does not exist.
    fn find_constructor(
        &self,
        owner: &TypeRef,
        parameters: &[TypeRef],
    ) -> Result<Arc<dyn RuntimeConstructor>>;

    /// Translate a dotted type name into the host's naming.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Translation`] if an active remapper fails.
    fn translate_type(&self, name: &str) -> Result<String> {
        Ok(name.to_string())
    }

    /// Translate a field name on the live type `owner`.
    fn translate_field(&self, _owner: &TypeRef, name: &str) -> String {
        name.to_string()
    }

    /// Translate a method name on the live type `owner`.
    fn translate_method(&self, _owner: &TypeRef, name: &str, _parameters: &[TypeRef]) -> String {
        name.to_string()
    }

    /// Returns the active remapping provider, if any.
    fn remapper(&self) -> Option<&RemappingProvider> {
        None
    }
}

/// Looks symbols up under the names the caller uses.
pub struct DirectLookup {
    runtime: Arc<dyn HostRuntime>,
}

impl DirectLookup {
    /// Creates a direct lookup against `runtime`.
    #[must_use]
    pub fn new(runtime: Arc<dyn HostRuntime>) -> Self {
        DirectLookup { runtime }
    }
}

impl SymbolSource for DirectLookup {
    fn find_type(&self, name: &str) -> Result<TypeRef> {
        self.runtime.find_type(name)
    }

    fn find_field(&self, owner: &TypeRef, name: &str) -> Result<Arc<dyn RuntimeField>> {
        self.runtime.declared_field(owner, name)
    }

    fn find_method(
        &self,
        owner: &TypeRef,
        name: &str,
        parameters: &[TypeRef],
    ) -> Result<Arc<dyn RuntimeMethod>> {
        self.runtime.declared_method(owner, name, parameters)
    }

    fn find_constructor(
        &self,
        owner: &TypeRef,
        parameters: &[TypeRef],
    ) -> Result<Arc<dyn RuntimeConstructor>> {
        self.runtime.declared_constructor(owner, parameters)
    }
}

/// Translates names through a [`RemappingProvider`] before looking them up.
///
/// Member translations are memoized per original key, so repeated resolver calls never
/// repeat the verification scan of [`RemappingProvider::translate_method`].
pub struct RemappedLookup {
    runtime: Arc<dyn HostRuntime>,
    provider: RemappingProvider,
    /// Original method key to translated name
    method_names: DashMap<SymbolKey, String>,
    /// Original field key to translated name
    field_names: DashMap<SymbolKey, String>,
}

impl RemappedLookup {
    /// Creates a remapping lookup.
    #[must_use]
    pub fn new(runtime: Arc<dyn HostRuntime>, provider: RemappingProvider) -> Self {
        RemappedLookup {
            runtime,
            provider,
            method_names: DashMap::new(),
            field_names: DashMap::new(),
        }
    }
}

impl SymbolSource for RemappedLookup {
    fn find_type(&self, name: &str) -> Result<TypeRef> {
        self.runtime.find_type(name)
    }

    fn find_field(&self, owner: &TypeRef, name: &str) -> Result<Arc<dyn RuntimeField>> {
        self.runtime.declared_field(owner, name)
    }

    fn find_method(
        &self,
        owner: &TypeRef,
        name: &str,
        parameters: &[TypeRef],
    ) -> Result<Arc<dyn RuntimeMethod>> {
        self.runtime.declared_method(owner, name, parameters)
    }

    fn find_constructor(
        &self,
        owner: &TypeRef,
        parameters: &[TypeRef],
    ) -> Result<Arc<dyn RuntimeConstructor>> {
        self.runtime.declared_constructor(owner, parameters)
    }

    fn translate_type(&self, name: &str) -> Result<String> {
        let translated = self.provider.translate_type(&name.replace('.', "/"))?;
        Ok(translated.replace('/', "."))
    }

    fn translate_field(&self, owner: &TypeRef, name: &str) -> String {
        let key = SymbolKey::field(owner, name);
        if let Some(translated) = self.field_names.get(&key) {
            return translated.value().clone();
        }

        let unmapped_owner = self.provider.unmap_type_name(owner);
        let translated = self.provider.translate_field(&unmapped_owner, name);
        trace!(owner = %owner, name, translated = %translated, "translated field");
        self.field_names.entry(key).or_insert(translated).clone()
    }

    fn translate_method(&self, owner: &TypeRef, name: &str, parameters: &[TypeRef]) -> String {
        let key = SymbolKey::method(owner, name, parameters);
        if let Some(translated) = self.method_names.get(&key) {
            return translated.value().clone();
        }

        let translated = self
            .provider
            .translate_method(self.runtime.as_ref(), owner, name, parameters);
        trace!(owner = %owner, name, translated = %translated, "translated method");
        self.method_names.entry(key).or_insert(translated).clone()
    }

    fn remapper(&self) -> Option<&RemappingProvider> {
        Some(&self.provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        host::{HostEnvironment, HostVariant},
        remap::{RemapTable, TableRemapper},
        runtime::{HostValue, MemoryRuntime, Modifiers, TypeDef},
    };

    fn remapped() -> (Arc<MemoryRuntime>, RemappedLookup, TypeRef) {
        let runtime = Arc::new(MemoryRuntime::new());
        let world = runtime.define(
            TypeDef::new("net.minecraft.world.World")
                .field("field_72995_K", "boolean", Modifiers::PUBLIC)
                .method("func_72838_d", &["int"], "boolean", Modifiers::PUBLIC, |_, _| {
                    Ok(HostValue::Bool(true))
                }),
        );

        let table = RemapTable::default()
            .with_type("net/minecraft/server/v1_7_R4/World", "net/minecraft/world/World")
            .with_field("net/minecraft/server/v1_7_R4/World", "isStatic", "field_72995_K")
            .with_method("net/minecraft/server/v1_7_R4/World", "addEntity", "(I)Z", "func_72838_d");
        let environment = HostEnvironment::new(HostVariant::Cauldron, None, Some("v1_7_R4"))
            .with_remapper(Arc::new(TableRemapper::new(table)));
        let provider = RemappingProvider::from_environment(&environment).unwrap();

        let lookup = RemappedLookup::new(runtime.clone(), provider);
        (runtime, lookup, world)
    }

    #[test]
    fn test_direct_lookup_is_identity() {
        let runtime = Arc::new(MemoryRuntime::new());
        let owner = runtime.define(TypeDef::new("a.B").field("c", "int", Modifiers::PUBLIC));
        let direct = DirectLookup::new(runtime);

        assert_eq!(direct.translate_type("a.B").unwrap(), "a.B");
        assert_eq!(direct.translate_field(&owner, "c"), "c");
        assert!(direct.remapper().is_none());
        assert!(direct.find_field(&owner, "c").is_ok());
        assert!(direct.find_field(&owner, "d").err().unwrap().is_miss());
    }

    #[test]
    fn test_remapped_translation() {
        let (_, lookup, world) = remapped();

        assert_eq!(
            lookup.translate_type("net.minecraft.server.v1_7_R4.World").unwrap(),
            "net.minecraft.world.World"
        );
        assert_eq!(lookup.translate_field(&world, "isStatic"), "field_72995_K");
        assert_eq!(
            lookup.translate_method(&world, "addEntity", &[TypeRef::new("int")]),
            "func_72838_d"
        );
        assert!(lookup.remapper().is_some());
    }

    #[test]
    fn test_method_translation_is_memoized() {
        let (runtime, lookup, world) = remapped();
        let params = [TypeRef::new("int")];

        lookup.translate_method(&world, "addEntity", &params);
        let after_first = runtime.stats().methods();
        assert_eq!(after_first, 1);

        for _ in 0..5 {
            assert_eq!(lookup.translate_method(&world, "addEntity", &params), "func_72838_d");
        }
        assert_eq!(runtime.stats().methods(), after_first);
    }
}
