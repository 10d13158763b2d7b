//! Sending outbound packets to a player through the server internals.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    config::ConnectionPath,
    resolver::{SymbolResolver, TypeHandle},
    runtime::HostValue,
    Error, Result,
};

/// The high-level host API for sending a packet, when the host offers one.
pub trait DirectDispatch: Send + Sync {
    /// Send `packet` to `recipient`.
    ///
    /// # Errors
    ///
    /// Any failure makes [`PacketBridge`] fall back to the resolved connection path.
    fn send_packet(&self, recipient: &HostValue, packet: &HostValue) -> Result<()>;
}

/// Delivers internal packet objects to players.
///
/// [`PacketBridge::send`] tries the [`DirectDispatch`] fast path first, if one is set. On
/// failure it walks the connection path through the resolver:
///
/// ```text
/// recipient.getHandle().playerConnection.sendPacket(packet)
/// ```
///
/// An error is returned only when both paths fail.
pub struct PacketBridge {
    resolver: Arc<SymbolResolver>,
    direct: Option<Arc<dyn DirectDispatch>>,
    path: ConnectionPath,
}

impl PacketBridge {
    /// Creates a bridge with the default connection path and no fast path.
    #[must_use]
    pub fn new(resolver: Arc<SymbolResolver>) -> Self {
        PacketBridge {
            resolver,
            direct: None,
            path: ConnectionPath::default(),
        }
    }

    /// Sets the fast path.
    #[must_use]
    pub fn with_direct(mut self, direct: Arc<dyn DirectDispatch>) -> Self {
        self.direct = Some(direct);
        self
    }

    /// Sets the connection path names.
    #[must_use]
    pub fn with_path(mut self, path: ConnectionPath) -> Self {
        self.path = path;
        self
    }

    /// Returns the resolver the bridge walks the connection path with.
    #[must_use]
    pub fn resolver(&self) -> &SymbolResolver {
        &self.resolver
    }

    /// Locate an internal packet type by simple name, e.g. `PacketPlayOutChat`.
    ///
    /// # Errors
    ///
    /// Returns the configuration error of [`SymbolResolver::get_internal_type`]. A missing
    /// type is an empty handle, not an error.
    pub fn packet_type(&self, simple_name: &str) -> Result<Arc<TypeHandle>> {
        self.resolver.get_internal_type(simple_name)
    }

    /// Resolve the internal connection object of `recipient`.
    ///
    /// # Errors
    ///
    /// Fails if any step of the connection path is missing, fails, or yields null.
    pub fn connection(&self, recipient: &HostValue) -> Result<HostValue> {
        let api_player = recipient.as_object().ok_or_else(|| Error::NullReceiver {
            member: self.path.handle_method.clone(),
        })?;
        let get_handle = self
            .resolver
            .get_method(api_player.class(), &self.path.handle_method, &[]);
        let player = self.resolver.try_invoke(&get_handle, Some(recipient), &[])?;

        let internal_player = player.as_object().ok_or_else(|| Error::NullReceiver {
            member: self.path.connection_field.clone(),
        })?;
        let field = self
            .resolver
            .get_field(internal_player.class(), &self.path.connection_field);
        let connection = self.resolver.try_get_field_value(&field, Some(&player))?;

        if connection.is_null() {
            return Err(Error::NullReceiver {
                member: self.path.dispatch_method.clone(),
            });
        }
        Ok(connection)
    }

    /// Send `packet` to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error of the resolver, such as [`Error::NoCapsule`], as is.
    /// Otherwise returns [`Error::Dispatch`] carrying both failures if neither path delivers
    /// the packet.
    pub fn send(&self, recipient: &HostValue, packet: &HostValue) -> Result<()> {
        let fast_path = match &self.direct {
            Some(direct) => match direct.send_packet(recipient, packet) {
                Ok(()) => return Ok(()),
                Err(error) => {
                    warn!(%error, "direct packet dispatch failed, using resolved connection");
                    Some(error.to_string())
                }
            },
            None => None,
        };

        self.send_resolved(recipient, packet).map_err(|resolved| {
            if resolved.is_configuration() {
                resolved
            } else {
                Error::Dispatch {
                    fast_path,
                    resolved: Box::new(resolved),
                }
            }
        })
    }

    fn send_resolved(&self, recipient: &HostValue, packet: &HostValue) -> Result<()> {
        let connection = self.connection(recipient)?;

        let packet_handle = self.packet_type(&self.path.packet_type)?;
        let packet_type = packet_handle.require()?;

        let Some(connection_object) = connection.as_object() else {
            return Err(Error::NullReceiver {
                member: self.path.dispatch_method.clone(),
            });
        };
        let dispatch = self.resolver.get_method(
            connection_object.class(),
            &self.path.dispatch_method,
            std::slice::from_ref(packet_type),
        );

        self.resolver
            .try_invoke(&dispatch, Some(&connection), std::slice::from_ref(packet))?;
        debug!(packet = packet.type_name(), "packet sent through resolved connection");
        Ok(())
    }
}
