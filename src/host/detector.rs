//! One-shot host detection.
//!
//! The [`HostVariantDetector`] reads a [`HostProbe`] the first time it is asked and keeps the
//! resulting [`HostEnvironment`] for the rest of the process. Later calls return the cached
//! environment even if the probe would now answer differently.

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use tracing::{info, warn};

use crate::{
    config::DetectionConfig,
    host::{Capsule, HostProbe, HostVariant, Version},
    remap::HostRemapper,
    Result,
};

/// Everything detection learned about the running host.
///
/// The plugin remapper is captured together with the rest, so a resolver built from this
/// environment never consults the host again.
#[derive(Clone)]
pub struct HostEnvironment {
    /// The detected runtime family
    variant: HostVariant,
    /// The banner detection was run on
    descriptor: Option<String>,
    /// Minecraft version announced in the banner
    version: Option<Version>,
    /// Versioned package segment of the implementation, e.g. `v1_8_R3`
    package_tag: Option<String>,
    /// The plugin remapper the host exposed at detection time
    remapper: Option<Arc<dyn HostRemapper>>,
}

impl HostEnvironment {
    /// Creates an environment from already known parts.
    ///
    /// Mostly useful for embedding the resolver without a probe, and in tests.
    #[must_use]
    pub fn new(variant: HostVariant, version: Option<Version>, package_tag: Option<&str>) -> Self {
        HostEnvironment {
            variant,
            descriptor: None,
            version,
            package_tag: package_tag.map(str::to_string),
            remapper: None,
        }
    }

    /// Attaches the plugin remapper the host exposes.
    #[must_use]
    pub fn with_remapper(mut self, remapper: Arc<dyn HostRemapper>) -> Self {
        self.remapper = Some(remapper);
        self
    }

    /// The environment of a process without any loadable host API.
    #[must_use]
    pub fn unknown() -> Self {
        HostEnvironment::new(HostVariant::Unknown, None, None)
    }

    /// Returns the detected variant.
    #[must_use]
    pub fn variant(&self) -> HostVariant {
        self.variant
    }

    /// Returns the variant's API family, if any.
    #[must_use]
    pub fn capsule(&self) -> Option<Capsule> {
        self.variant.capsule()
    }

    /// Returns the variant's API family.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoCapsule`] when the host is unknown.
    pub fn require_capsule(&self) -> Result<Capsule> {
        self.variant.require_capsule()
    }

    /// Returns the banner detection ran on.
    #[must_use]
    pub fn descriptor(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    /// Returns the Minecraft version announced in the banner.
    #[must_use]
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Returns the versioned package segment, e.g. `v1_8_R3`.
    #[must_use]
    pub fn package_tag(&self) -> Option<&str> {
        self.package_tag.as_deref()
    }

    /// Returns the package tag read as a version, e.g. `[1, 8, 3]` for `v1_8_R3`.
    #[must_use]
    pub fn package_version(&self) -> Option<Version> {
        self.package_tag
            .as_deref()
            .and_then(|tag| Version::from_package_tag(tag).ok())
    }

    /// Returns `true` if the host exposed a plugin remapper at detection time.
    #[must_use]
    pub fn has_remapping(&self) -> bool {
        self.remapper.is_some()
    }

    /// Returns the plugin remapper captured at detection time.
    #[must_use]
    pub fn remapper(&self) -> Option<&Arc<dyn HostRemapper>> {
        self.remapper.as_ref()
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("variant", &self.variant)
            .field("descriptor", &self.descriptor)
            .field("version", &self.version)
            .field("package_tag", &self.package_tag)
            .field("remapping", &self.has_remapping())
            .finish()
    }
}

/// Detects the host variant once and caches the answer.
///
/// # Examples
///
/// ```rust
/// use hostreflect::host::{Capsule, HostVariant, HostVariantDetector, StaticProbe};
///
/// let detector = HostVariantDetector::new();
/// let environment = detector.detect(&StaticProbe::new("git-Spigot-1234 (MC: 1.8)"));
///
/// assert_eq!(environment.variant(), HostVariant::Spigot);
/// assert_eq!(environment.capsule(), Some(Capsule::BaseApi));
/// assert_eq!(environment.version().unwrap().parts(), &[1, 8]);
/// ```
pub struct HostVariantDetector {
    /// Marker configuration
    config: DetectionConfig,
    /// The cached detection result
    detected: OnceLock<HostEnvironment>,
}

impl Default for HostVariantDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl HostVariantDetector {
    /// Creates a detector with the default markers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DetectionConfig::default())
    }

    /// Creates a detector with custom markers.
    #[must_use]
    pub fn with_config(config: DetectionConfig) -> Self {
        HostVariantDetector {
            config,
            detected: OnceLock::new(),
        }
    }

    /// Returns the process-wide detector.
    pub fn global() -> &'static HostVariantDetector {
        static GLOBAL: OnceLock<HostVariantDetector> = OnceLock::new();
        GLOBAL.get_or_init(HostVariantDetector::new)
    }

    /// Detect the host, or return the environment detected earlier.
    ///
    /// Only the first call reads `probe`, each of its inputs exactly once. Concurrent first
    /// calls block until that read is done and then share its result.
    ///
    /// # Arguments
    ///
    /// * `probe` - The host's self-description
    ///
    /// # Returns
    ///
    /// The cached [`HostEnvironment`].
    pub fn detect(&self, probe: &dyn HostProbe) -> &HostEnvironment {
        self.detected.get_or_init(|| {
            let environment = self.inspect(probe);
            info!(
                variant = %environment.variant,
                version = ?environment.version.as_ref().map(ToString::to_string),
                package_tag = ?environment.package_tag,
                remapping = environment.has_remapping(),
                "detected host environment"
            );
            environment
        })
    }

    /// Returns the cached environment without detecting.
    #[must_use]
    pub fn detected(&self) -> Option<&HostEnvironment> {
        self.detected.get()
    }

    /// Forget the cached environment.
    ///
    /// Requires exclusive access, so a detector shared across threads can never be reset
    /// underneath its readers.
    pub fn reset(&mut self) {
        self.detected.take();
    }

    /// Classify a descriptor without touching the cache.
    ///
    /// # Arguments
    ///
    /// * `descriptor` - The banner, or `None` if no host API is loadable
    #[must_use]
    pub fn classify(&self, descriptor: Option<&str>) -> HostVariant {
        let Some(descriptor) = descriptor else {
            return HostVariant::Unknown;
        };

        let contains_any =
            |markers: &[String]| markers.iter().any(|marker| descriptor.contains(marker.as_str()));

        if contains_any(&self.config.fork_markers) {
            HostVariant::Cauldron
        } else if contains_any(&self.config.distribution_markers) {
            HostVariant::Spigot
        } else if contains_any(&self.config.sponge_markers) {
            HostVariant::Sponge
        } else {
            HostVariant::CraftBukkit
        }
    }

    /// Read the Minecraft version out of a banner such as `git-Spigot-1234 (MC: 1.8)`.
    #[must_use]
    pub fn banner_version(&self, descriptor: &str) -> Option<Version> {
        let start = descriptor.find(self.config.version_prefix.as_str())?
            + self.config.version_prefix.len();
        let rest = &descriptor[start..];
        let raw = rest.find(')').map_or(rest, |end| &rest[..end]).trim();

        match Version::parse(raw) {
            Ok(version) => Some(version),
            Err(error) => {
                warn!(descriptor, %error, "host banner carries an unreadable version");
                None
            }
        }
    }

    fn inspect(&self, probe: &dyn HostProbe) -> HostEnvironment {
        let descriptor = probe.descriptor();
        let variant = self.classify(descriptor.as_deref());
        if variant == HostVariant::Unknown {
            return HostEnvironment::unknown();
        }

        let version = descriptor
            .as_deref()
            .and_then(|descriptor| self.banner_version(descriptor));
        let package_tag = probe
            .implementation_package()
            .as_deref()
            .and_then(package_tag)
            .map(str::to_string);
        let remapper = if variant.supports_remapping() {
            probe.remapper()
        } else {
            None
        };

        HostEnvironment {
            variant,
            descriptor,
            version,
            package_tag,
            remapper,
        }
    }
}

/// The last package segment if it looks like `v1_8_R3`.
fn package_tag(package: &str) -> Option<&str> {
    let last = package.rsplit('.').next()?;
    let mut chars = last.chars();
    match (chars.next(), chars.next()) {
        (Some('v'), Some(digit)) if digit.is_ascii_digit() => Some(last),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::{
        host::StaticProbe,
        remap::{RemapTable, TableRemapper},
        Error,
    };

    /// A probe whose banner changes every time it is read.
    struct ShiftingProbe {
        reads: AtomicUsize,
    }

    impl HostProbe for ShiftingProbe {
        fn descriptor(&self) -> Option<String> {
            match self.reads.fetch_add(1, Ordering::SeqCst) {
                0 => Some("git-Spigot-1234 (MC: 1.8)".to_string()),
                _ => Some("Cauldron-1.7.10 (MC: 1.7.10)".to_string()),
            }
        }
    }

    #[test]
    fn test_classify_priority() {
        let detector = HostVariantDetector::new();

        assert_eq!(
            detector.classify(Some("git-Spigot-1234 (MC: 1.8)")),
            HostVariant::Spigot
        );
        assert_eq!(
            detector.classify(Some("git-Bukkit-1.7.2-R0.3 (MC: 1.7.2)")),
            HostVariant::CraftBukkit
        );
        assert_eq!(
            detector.classify(Some("Cauldron-MCPC-Plus-1.7.10 (MC: 1.7.10)")),
            HostVariant::Cauldron
        );
        // A fork built on Spigot still classifies as the fork
        assert_eq!(
            detector.classify(Some("git-Thermos-Spigot-58 (MC: 1.7.10)")),
            HostVariant::Cauldron
        );
        assert_eq!(
            detector.classify(Some("SpongeVanilla-1.12.2-7.1.0 (MC: 1.12.2)")),
            HostVariant::Sponge
        );
        assert_eq!(detector.classify(None), HostVariant::Unknown);
    }

    #[test]
    fn test_detect_spigot() {
        let detector = HostVariantDetector::new();
        let probe = StaticProbe::new("git-Spigot-1234 (MC: 1.8)")
            .with_package("org.bukkit.craftbukkit.v1_8_R3");

        let environment = detector.detect(&probe);
        assert_eq!(environment.variant(), HostVariant::Spigot);
        assert_eq!(environment.capsule(), Some(Capsule::BaseApi));
        assert_eq!(environment.version().unwrap().parts(), &[1, 8]);
        assert_eq!(environment.package_tag(), Some("v1_8_R3"));
        assert_eq!(environment.package_version().unwrap().parts(), &[1, 8, 3]);
        assert!(!environment.has_remapping());
        assert!(environment
            .version()
            .unwrap()
            .is_compatible(&Version::parse("1.7.5").unwrap()));
    }

    #[test]
    fn test_detect_is_cached() {
        let detector = HostVariantDetector::new();
        let probe = ShiftingProbe {
            reads: AtomicUsize::new(0),
        };

        let first = detector.detect(&probe).clone();
        let second = detector.detect(&probe).clone();

        assert_eq!(first.variant(), HostVariant::Spigot);
        assert_eq!(first.package_tag(), second.package_tag());
        assert_eq!(probe.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reset() {
        let mut detector = HostVariantDetector::new();
        let probe = ShiftingProbe {
            reads: AtomicUsize::new(0),
        };

        assert_eq!(detector.detect(&probe).variant(), HostVariant::Spigot);
        detector.reset();
        assert!(detector.detected().is_none());
        assert_eq!(detector.detect(&probe).variant(), HostVariant::Cauldron);
    }

    #[test]
    fn test_detect_unknown() {
        let detector = HostVariantDetector::new();
        let environment = detector.detect(&StaticProbe::unloadable());

        assert_eq!(environment.variant(), HostVariant::Unknown);
        assert!(environment.capsule().is_none());
        assert!(matches!(
            environment.require_capsule(),
            Err(Error::NoCapsule(HostVariant::Unknown))
        ));
    }

    #[test]
    fn test_detect_remapping() {
        let remapper = Arc::new(TableRemapper::new(RemapTable::default()));

        let detector = HostVariantDetector::new();
        let probe = StaticProbe::new("Cauldron-1.7.10 (MC: 1.7.10)").with_remapper(remapper.clone());
        assert!(detector.detect(&probe).has_remapping());

        // Only the fork exposes remapping, even if something answers the probe
        let detector = HostVariantDetector::new();
        let probe = StaticProbe::new("git-Spigot-1234 (MC: 1.8)").with_remapper(remapper);
        assert!(!detector.detect(&probe).has_remapping());
    }

    #[test]
    fn test_banner_version() {
        let detector = HostVariantDetector::new();
        assert_eq!(
            detector
                .banner_version("git-Spigot-1234 (MC: 1.7.10)")
                .unwrap()
                .parts(),
            &[1, 7, 10]
        );
        assert!(detector.banner_version("git-Spigot-1234").is_none());
        assert!(detector.banner_version("git-Spigot (MC: 1.9-pre)").is_none());
    }

    #[test]
    fn test_package_tag() {
        assert_eq!(package_tag("org.bukkit.craftbukkit.v1_8_R3"), Some("v1_8_R3"));
        assert_eq!(package_tag("org.bukkit.craftbukkit"), None);
        assert_eq!(package_tag("v1_7_R4"), Some("v1_7_R4"));
    }
}
