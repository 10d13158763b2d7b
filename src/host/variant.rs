//! Host runtime families and their API capsules.

use strum::{Display, EnumIter, EnumString};

/// The broad public API family a host exposes, independent of the concrete build or fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Capsule {
    /// The Bukkit API family (CraftBukkit, Spigot and forks built on them).
    #[strum(serialize = "BaseAPI")]
    BaseApi,
    /// The Sponge API family.
    #[strum(serialize = "SpongeAPI")]
    SpongeApi,
}

/// The closed set of host runtimes the resolver knows how to work with.
///
/// Variants are listed in detection priority: a fork marker wins over a distribution
/// marker, which wins over the generic base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum HostVariant {
    /// A Forge hybrid fork of CraftBukkit that remaps plugin symbols to its own
    /// deobfuscated names.
    Cauldron,
    /// The Spigot distribution of CraftBukkit.
    Spigot,
    /// A Sponge implementation.
    Sponge,
    /// Plain CraftBukkit, the generic base of the Bukkit family.
    CraftBukkit,
    /// No host API could be loaded.
    Unknown,
}

impl HostVariant {
    /// Returns the API family of this variant, or `None` for [`HostVariant::Unknown`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hostreflect::host::{Capsule, HostVariant};
    ///
    /// assert_eq!(HostVariant::Spigot.capsule(), Some(Capsule::BaseApi));
    /// assert_eq!(HostVariant::Unknown.capsule(), None);
    /// ```
    #[must_use]
    pub fn capsule(self) -> Option<Capsule> {
        match self {
            HostVariant::Cauldron | HostVariant::Spigot | HostVariant::CraftBukkit => {
                Some(Capsule::BaseApi)
            }
            HostVariant::Sponge => Some(Capsule::SpongeApi),
            HostVariant::Unknown => None,
        }
    }

    /// Returns the API family, failing for variants without one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoCapsule`] for [`HostVariant::Unknown`].
    pub fn require_capsule(self) -> crate::Result<Capsule> {
        self.capsule().ok_or(crate::Error::NoCapsule(self))
    }

    /// Returns `true` if this variant may expose a plugin remapping table.
    #[must_use]
    pub fn supports_remapping(self) -> bool {
        matches!(self, HostVariant::Cauldron)
    }
}
