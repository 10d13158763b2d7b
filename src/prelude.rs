//! # hostreflect Prelude
//!
//! The types most plugin code needs: detection, the resolver, the runtime surface and the
//! packet bridge. Import with `use hostreflect::prelude::*;`.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all hostreflect operations
pub use crate::Error;

/// The result type used throughout hostreflect
pub use crate::Result;

/// Configuration
pub use crate::config::{ConnectionPath, DetectionConfig, ResolverConfig};

// ================================================================================================
// Host Detection
// ================================================================================================

/// Host identification
pub use crate::host::{
    Capsule, HostEnvironment, HostProbe, HostVariant, HostVariantDetector, StaticProbe, Version,
};

// ================================================================================================
// Remapping
// ================================================================================================

/// Mapping tables and translation
pub use crate::remap::{
    parse_srg, HostRemapper, RemapTable, RemapUnavailableReason, RemappingProvider,
    TableRemapper,
};

// ================================================================================================
// Runtime Surface
// ================================================================================================

/// Types, values and members of the host process
pub use crate::runtime::{
    HostObject, HostRuntime, HostValue, MemoryRuntime, Modifiers, RuntimeConstructor,
    RuntimeField, RuntimeMethod, TypeDef, TypeRef,
};

// ================================================================================================
// Resolution
// ================================================================================================

/// The resolver and its handles
pub use crate::resolver::{
    ConstructorHandle, FieldHandle, MethodHandle, SymbolKey, SymbolKind, SymbolResolver,
    SymbolSource, TypeHandle,
};

// ================================================================================================
// Packet Dispatch
// ================================================================================================

/// Sending internal packets
pub use crate::bridge::{DirectDispatch, PacketBridge};
