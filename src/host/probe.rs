//! Inputs the host hands to detection.

use std::sync::Arc;

use crate::remap::HostRemapper;

/// What the hosting server exposes about itself.
///
/// Detection reads a probe exactly once per process; everything after that works from the
/// cached [`crate::host::HostEnvironment`].
pub trait HostProbe: Send + Sync {
    /// The server banner, e.g. `git-Spigot-1234 (MC: 1.8)`.
    ///
    /// `None` means no host API could be loaded at all.
    fn descriptor(&self) -> Option<String>;

    /// The package of the API implementation, e.g. `org.bukkit.craftbukkit.v1_8_R3`.
    fn implementation_package(&self) -> Option<String> {
        None
    }

    /// The remapper attached to the plugin class loader, if the host ships one and has
    /// plugin remapping switched on.
    fn remapper(&self) -> Option<Arc<dyn HostRemapper>> {
        None
    }
}

/// A probe over fixed values.
///
/// # Examples
///
/// ```rust
/// use hostreflect::host::{HostProbe, StaticProbe};
///
/// let probe = StaticProbe::new("git-Spigot-1234 (MC: 1.8)")
///     .with_package("org.bukkit.craftbukkit.v1_8_R3");
/// assert_eq!(probe.descriptor().as_deref(), Some("git-Spigot-1234 (MC: 1.8)"));
/// ```
#[derive(Clone, Default)]
pub struct StaticProbe {
    descriptor: Option<String>,
    package: Option<String>,
    remapper: Option<Arc<dyn HostRemapper>>,
}

impl StaticProbe {
    /// Creates a probe reporting the given banner.
    #[must_use]
    pub fn new(descriptor: &str) -> Self {
        StaticProbe {
            descriptor: Some(descriptor.to_string()),
            package: None,
            remapper: None,
        }
    }

    /// Creates a probe for a process in which no host API is loadable.
    #[must_use]
    pub fn unloadable() -> Self {
        StaticProbe::default()
    }

    /// Sets the implementation package.
    #[must_use]
    pub fn with_package(mut self, package: &str) -> Self {
        self.package = Some(package.to_string());
        self
    }

    /// Sets the plugin remapper.
    #[must_use]
    pub fn with_remapper(mut self, remapper: Arc<dyn HostRemapper>) -> Self {
        self.remapper = Some(remapper);
        self
    }
}

impl HostProbe for StaticProbe {
    fn descriptor(&self) -> Option<String> {
        self.descriptor.clone()
    }

    fn implementation_package(&self) -> Option<String> {
        self.package.clone()
    }

    fn remapper(&self) -> Option<Arc<dyn HostRemapper>> {
        self.remapper.clone()
    }
}
