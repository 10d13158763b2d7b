//! Name translation for hosts that remap plugin symbols.
//!
//! The remapping fork loads plugins through a class loader that rewrites every reference
//! from the plugin-facing names (`net/minecraft/server/v1_7_R4/World`) to the names the
//! server was actually built with (`net/minecraft/world/World`). Reflective lookups bypass
//! that rewriting, so the resolver has to apply the same translation itself before asking
//! the runtime.

use std::sync::Arc;

use strum::Display;
use tracing::debug;

use crate::{
    host::{HostEnvironment, HostVariant},
    remap::{parameter_types, RemapTable},
    runtime::{HostRuntime, TypeRef},
    Error, Result,
};

/// Why a [`RemappingProvider`] could not be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RemapUnavailableReason {
    /// The host is not the remapping fork.
    #[strum(serialize = "fork not present")]
    ForkNotPresent,
    /// The host is the fork, but its plugin remap table is switched off.
    #[strum(serialize = "remap table disabled")]
    RemapTableDisabled,
}

/// The remapper object a remapping host attaches to its plugin class loader.
pub trait HostRemapper: Send + Sync {
    /// The three read-only mapping tables.
    fn tables(&self) -> Arc<RemapTable>;

    /// Map a slash-delimited type name.
    ///
    /// # Errors
    ///
    /// Implementations fail only when the remapper itself is broken.
    fn map_type_name(&self, name: &str) -> Result<String>;

    /// Map a field name declared on the unmapped type `owner`.
    ///
    /// Returns `name` unchanged if the field is not remapped.
    fn map_field_name(&self, owner: &str, name: &str, descriptor: Option<&str>) -> String;
}

/// A [`HostRemapper`] backed by a [`RemapTable`].
///
/// Inner classes without an entry of their own are mapped through their outer class, so
/// `a/B$C` becomes `x/Y$C` when only `a/B -> x/Y` is known.
///
/// # Examples
///
/// ```rust
/// use hostreflect::remap::{HostRemapper, RemapTable, TableRemapper};
///
/// let remapper = TableRemapper::new(RemapTable::default().with_type("a/B", "x/Y"));
/// assert_eq!(remapper.map_type_name("a/B$Inner")?, "x/Y$Inner");
/// assert_eq!(remapper.map_type_name("a/Other")?, "a/Other");
/// # Ok::<(), hostreflect::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TableRemapper {
    table: Arc<RemapTable>,
}

impl TableRemapper {
    /// Creates a remapper over `table`.
    #[must_use]
    pub fn new(table: RemapTable) -> Self {
        TableRemapper {
            table: Arc::new(table),
        }
    }
}

impl HostRemapper for TableRemapper {
    fn tables(&self) -> Arc<RemapTable> {
        self.table.clone()
    }

    fn map_type_name(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(Error::Translation {
                name: String::new(),
                message: "empty type name".to_string(),
            });
        }

        if let Some(mapped) = self.table.map_type(name) {
            return Ok(mapped.to_string());
        }

        if let Some((outer, inner)) = name.split_once('$') {
            if let Some(mapped) = self.table.map_type(outer) {
                return Ok(format!("{}${}", mapped, inner));
            }
        }

        Ok(name.to_string())
    }

    fn map_field_name(&self, owner: &str, name: &str, _descriptor: Option<&str>) -> String {
        self.table
            .map_field(owner, name)
            .unwrap_or(name)
            .to_string()
    }
}

/// Translation of plugin-facing symbol names into the names present in a remapping host.
///
/// Only exists when the host is [`HostVariant::Cauldron`] and its plugin remapper is
/// switched on. Everything else is a construction error with a
/// [`RemapUnavailableReason`].
pub struct RemappingProvider {
    /// The host's remapper
    remapper: Arc<dyn HostRemapper>,
    /// Tables extracted from the remapper at construction
    table: Arc<RemapTable>,
    /// Require a candidate's descriptor to match the caller's parameter types
    strict_overloads: bool,
}

impl RemappingProvider {
    /// Creates a provider for the detected host.
    ///
    /// # Arguments
    ///
    /// * `environment` - The detected host environment
    /// * `remapper` - The remapper exposed by the host, `None` if remapping is switched off
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemapUnavailable`] with [`RemapUnavailableReason::ForkNotPresent`]
    /// on any other host, or [`RemapUnavailableReason::RemapTableDisabled`] when the fork
    /// exposes no remapper.
    pub fn new(
        environment: &HostEnvironment,
        remapper: Option<Arc<dyn HostRemapper>>,
    ) -> Result<Self> {
        if environment.variant() != HostVariant::Cauldron {
            return Err(Error::RemapUnavailable(
                RemapUnavailableReason::ForkNotPresent,
            ));
        }

        let remapper = remapper.ok_or(Error::RemapUnavailable(
            RemapUnavailableReason::RemapTableDisabled,
        ))?;
        let table = remapper.tables();

        Ok(RemappingProvider {
            remapper,
            table,
            strict_overloads: true,
        })
    }

    /// Creates a provider from the remapper captured in a detected environment.
    ///
    /// # Errors
    ///
    /// See [`RemappingProvider::new`].
    pub fn from_environment(environment: &HostEnvironment) -> Result<Self> {
        Self::new(environment, environment.remapper().cloned())
    }

    /// Sets whether method translation compares descriptors before the live check.
    #[must_use]
    pub fn with_strict_overloads(mut self, strict: bool) -> Self {
        self.strict_overloads = strict;
        self
    }

    /// Returns the mapping tables.
    #[must_use]
    pub fn table(&self) -> &RemapTable {
        &self.table
    }

    /// Returns `true` if method translation compares descriptors.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict_overloads
    }

    /// Translate a slash-delimited type name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Translation`] if the host remapper fails. A provider that exists is
    /// expected to always translate, so this is a configuration error and not a miss.
    pub fn translate_type(&self, name: &str) -> Result<String> {
        self.remapper.map_type_name(name).map_err(|error| match error {
            Error::Translation { .. } => error,
            other => Error::Translation {
                name: name.to_string(),
                message: other.to_string(),
            },
        })
    }

    /// Translate a field name declared on the unmapped type `owner`.
    ///
    /// No descriptor is passed: fields are never disambiguated by type.
    #[must_use]
    pub fn translate_field(&self, owner: &str, field: &str) -> String {
        self.remapper.map_field_name(owner, field, None)
    }

    /// Translate a method name on the live type `owner`.
    ///
    /// Scans the method table for keys starting with `unmapped_owner/name ` and accepts
    /// the first candidate that exists on `owner` with exactly `parameters`. In strict mode
    /// a candidate whose descriptor names other parameter types is skipped before the live
    /// check, so two overloads of equal arity cannot be confused.
    ///
    /// # Arguments
    ///
    /// * `runtime` - Used to verify candidates
    /// * `owner` - The live (mapped) declaring type
    /// * `name` - The plugin-facing method name
    /// * `parameters` - The live parameter types
    ///
    /// # Returns
    ///
    /// The verified mapped name, or `name` itself if no candidate verifies.
    pub fn translate_method(
        &self,
        runtime: &dyn HostRuntime,
        owner: &TypeRef,
        name: &str,
        parameters: &[TypeRef],
    ) -> String {
        let prefix = format!("{}/{} ", self.unmap_type_name(owner), name);
        let expected: Vec<String> = if self.strict_overloads {
            parameters.iter().map(|p| self.unmap_type_name(p)).collect()
        } else {
            Vec::new()
        };

        for (key, mapped) in self.table.methods_with_prefix(&prefix) {
            if self.strict_overloads {
                let descriptor = &key[prefix.len()..];
                if let Some(declared) = parameter_types(descriptor) {
                    if declared != expected {
                        continue;
                    }
                }
            }

            if runtime.declared_method(owner, mapped, parameters).is_ok() {
                return mapped.to_string();
            }
        }

        debug!(owner = %owner, name, "no verified method translation, keeping original name");
        name.to_string()
    }

    /// Reverse-map a live type to its slash-delimited plugin-facing name.
    ///
    /// Array types keep their `[]` suffix and inner classes are reversed through their
    /// outer class. Types absent from the table come back as their own slash name.
    #[must_use]
    pub fn unmap_type_name(&self, ty: &TypeRef) -> String {
        let internal = ty.internal_name();
        let element = internal.trim_end_matches("[]");
        let dimensions = &internal[element.len()..];

        if let Some(unmapped) = self.table.unmap_type(element) {
            return format!("{}{}", unmapped, dimensions);
        }

        if let Some((outer, inner)) = element.split_once('$') {
            if let Some(unmapped) = self.table.unmap_type(outer) {
                return format!("{}${}{}", unmapped, inner, dimensions);
            }
        }

        internal
    }
}

impl std::fmt::Debug for RemappingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemappingProvider")
            .field("entries", &self.table.len())
            .field("strict_overloads", &self.strict_overloads)
            .finish()
    }
}
