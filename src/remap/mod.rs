//! Symbol remapping for hosts that rename the server internals plugins see.
//!
//! The remapping fork runs a deobfuscated server, but plugins are compiled against the
//! versioned CraftBukkit names. This module holds the mapping tables, a reader for the SRG
//! files they are shipped in, and the [`RemappingProvider`] the resolver consults before a
//! first-time lookup.
//!
//! # Key Components
//!
//! - [`RemapTable`] - Type, field and method mappings
//! - [`parse_srg`] - Reads SRG text into a [`RemapTable`]
//! - [`parameter_types`] - Reads parameter lists out of JVM method descriptors
//! - [`HostRemapper`] / [`TableRemapper`] - The remapper object a host exposes
//! - [`RemappingProvider`] - Type, field and method translation with live verification
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use hostreflect::{
//!     host::{HostEnvironment, HostVariant},
//!     remap::{parse_srg, RemappingProvider, TableRemapper},
//! };
//!
//! let table = parse_srg("CL: net/minecraft/server/v1_7_R4/World net/minecraft/world/World\n")?;
//! let environment = HostEnvironment::new(HostVariant::Cauldron, None, Some("v1_7_R4"));
//! let provider = RemappingProvider::new(&environment, Some(Arc::new(TableRemapper::new(table))))?;
//!
//! assert_eq!(
//!     provider.translate_type("net/minecraft/server/v1_7_R4/World")?,
//!     "net/minecraft/world/World"
//! );
//! # Ok::<(), hostreflect::Error>(())
//! ```

mod descriptor;
mod provider;
mod srg;
mod table;

pub use descriptor::parameter_types;
pub use provider::{HostRemapper, RemapUnavailableReason, RemappingProvider, TableRemapper};
pub use srg::parse_srg;
pub use table::RemapTable;
