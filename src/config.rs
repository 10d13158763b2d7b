//! Configuration for host detection, symbol resolution and packet dispatch.
//!
//! All settings have defaults matching the Bukkit family layout of the 1.7 to 1.16 era:
//! internal types live under `net.minecraft.server.<tag>` and the API implementation under
//! `org.bukkit.craftbukkit.<tag>`.

/// Configuration for [`crate::resolver::SymbolResolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Package root of internal server types (default: `net.minecraft.server`).
    pub internal_package: String,

    /// Package root of the API implementation types (default: `org.bukkit.craftbukkit`).
    pub api_impl_package: String,

    /// Compare parameter types, not just names, when choosing among remapped method
    /// candidates (default: `true`).
    ///
    /// Remap tables key methods by name and descriptor. With this off, the first candidate
    /// that exists live with the caller's parameter list is taken.
    pub strict_overloads: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            internal_package: "net.minecraft.server".to_string(),
            api_impl_package: "org.bukkit.craftbukkit".to_string(),
            strict_overloads: true,
        }
    }
}

impl ResolverConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that accepts the first live remapped method candidate.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            strict_overloads: false,
            ..Self::default()
        }
    }
}

/// Descriptor markers used by [`crate::host::HostVariantDetector`].
///
/// Each list is checked with a substring match, in the order fork, distribution, Sponge.
/// A descriptor matching none of them is the generic CraftBukkit base.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Markers of the remapping fork (default: `Cauldron`, `MCPC`, `Thermos`).
    pub fork_markers: Vec<String>,

    /// Markers of the secondary Bukkit distribution (default: `Spigot`, `Paper`).
    pub distribution_markers: Vec<String>,

    /// Markers of a Sponge host (default: `Sponge`).
    pub sponge_markers: Vec<String>,

    /// Text preceding the Minecraft version in the banner (default: `(MC: `).
    pub version_prefix: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fork_markers: vec![
                "Cauldron".to_string(),
                "MCPC".to_string(),
                "Thermos".to_string(),
            ],
            distribution_markers: vec!["Spigot".to_string(), "Paper".to_string()],
            sponge_markers: vec!["Sponge".to_string()],
            version_prefix: "(MC: ".to_string(),
        }
    }
}

/// Names of the internal connection triad that [`crate::bridge::PacketBridge`] walks.
///
/// `recipient.<handle_method>()` yields the internal player, whose `<connection_field>`
/// holds the connection, whose `<dispatch_method>(<packet_type>)` sends the message.
#[derive(Debug, Clone)]
pub struct ConnectionPath {
    /// Accessor on the API player returning the internal player (default: `getHandle`).
    pub handle_method: String,
    /// Field on the internal player holding the connection (default: `playerConnection`).
    pub connection_field: String,
    /// Dispatch method on the connection (default: `sendPacket`).
    pub dispatch_method: String,
    /// Simple name of the internal packet base type (default: `Packet`).
    pub packet_type: String,
}

impl Default for ConnectionPath {
    fn default() -> Self {
        Self {
            handle_method: "getHandle".to_string(),
            connection_field: "playerConnection".to_string(),
            dispatch_method: "sendPacket".to_string(),
            packet_type: "Packet".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.internal_package, "net.minecraft.server");
        assert!(config.strict_overloads);
        assert!(!ResolverConfig::lenient().strict_overloads);

        let detection = DetectionConfig::default();
        assert_eq!(detection.version_prefix, "(MC: ");
        assert!(detection.fork_markers.iter().any(|m| m == "Cauldron"));
    }
}
