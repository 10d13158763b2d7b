//! Host identification: which server is running us, and which version it is.
//!
//! # Key Components
//!
//! - [`Version`] - Zero-padded ordered version identifiers
//! - [`HostVariant`] / [`Capsule`] - The closed set of known hosts and their API families
//! - [`HostProbe`] - What the host tells us about itself
//! - [`HostVariantDetector`] - One-shot, cached detection producing a [`HostEnvironment`]
//!
//! # Detection Policy
//!
//! In priority order: a fork marker in the banner selects [`HostVariant::Cauldron`], a
//! distribution marker selects [`HostVariant::Spigot`], a Sponge marker selects
//! [`HostVariant::Sponge`], anything else is [`HostVariant::CraftBukkit`]. A host without
//! a loadable API is [`HostVariant::Unknown`], which has no capsule.

mod detector;
mod probe;
mod variant;
mod version;

pub use detector::{HostEnvironment, HostVariantDetector};
pub use probe::{HostProbe, StaticProbe};
pub use variant::{Capsule, HostVariant};
pub use version::Version;
