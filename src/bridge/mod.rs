//! Consumers of the resolver that reach into the server internals.
//!
//! [`PacketBridge`] is the main reason the resolver exists: the server API offers no way to
//! send an arbitrary internal packet, so the bridge finds the player's connection by name
//! and calls its dispatch method reflectively.

mod packet;

pub use packet::{DirectDispatch, PacketBridge};
