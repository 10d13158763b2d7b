//! Cached, permissive resolution of host symbols by name.
//!
//! Plugin code names internal symbols the way they are spelled in its own version of the
//! server (`EntityPlayer`, `playerConnection`, `sendPacket`). The [`SymbolResolver`] turns
//! those names into live handles, translating them first when the host remaps symbols, and
//! remembers every answer.
//!
//! # Key Components
//!
//! - [`SymbolKey`] / [`SymbolKind`] - Cache identity of a member lookup
//! - [`TypeHandle`], [`FieldHandle`], [`MethodHandle`], [`ConstructorHandle`] - Resolved
//!   handles; an empty handle is a memoized miss
//! - [`SymbolSource`] - The lookup strategy, with [`DirectLookup`] and [`RemappedLookup`]
//! - [`SymbolResolver`] - The cache in front of a source
//!
//! # Error Policy
//!
//! Misses and invocation failures are absorbed: lookups return empty handles and the
//! permissive invocation methods return `None`. The `try_*` methods return the failure for
//! callers that need to choose a fallback. Configuration errors, such as asking for a
//! versioned type on a host without a capsule, are always returned.

mod handle;
mod key;
mod source;
mod symbols;

pub use handle::{ConstructorHandle, FieldHandle, Handle, MethodHandle, TypeHandle};
pub use key::{SymbolKey, SymbolKind};
pub use source::{DirectLookup, RemappedLookup, SymbolSource};
pub use symbols::{CachedCounts, SymbolResolver};
