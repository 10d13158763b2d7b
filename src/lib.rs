// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # hostreflect
//!
//! Cross-version symbol resolution for Minecraft server plugins.
//!
//! Plugins that need more than the stable server API have to reach into the server
//! internals, whose package names carry the build (`net.minecraft.server.v1_8_R3`) and whose
//! symbols are renamed outright on remapping forks. `hostreflect` finds those symbols by
//! name at run time, translates names when the host remaps them, and caches every answer.
//!
//! ## Features
//!
//! - **Host detection** - Classify the running server once from its banner, with its
//!   Minecraft version and implementation package tag
//! - **Version ordering** - Zero-padded comparison and compatibility checks
//! - **Remapping** - SRG mapping tables, type/field/method translation with live
//!   verification, and reverse mapping of live types
//! - **Memoized resolution** - Types, fields, methods and constructors resolved once per
//!   key; misses are cached as well
//! - **Permissive invocation** - Failing reads and calls degrade to `None` with a log line
//! - **Packet dispatch** - Send internal packets through the player's connection, with a
//!   fast path and a resolved fallback
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use hostreflect::prelude::*;
//!
//! let detector = HostVariantDetector::new();
//! let probe = StaticProbe::new("git-Spigot-1234 (MC: 1.8)")
//!     .with_package("org.bukkit.craftbukkit.v1_8_R3");
//!
//! let environment = detector.detect(&probe);
//! assert_eq!(environment.variant(), HostVariant::Spigot);
//! assert!(environment.version().unwrap().is_compatible(&Version::parse("1.7.5")?));
//!
//! let runtime = Arc::new(MemoryRuntime::new());
//! runtime.define(TypeDef::new("net.minecraft.server.v1_8_R3.EntityPlayer"));
//!
//! let resolver = SymbolResolver::for_host(
//!     environment.clone(),
//!     runtime,
//!     None,
//!     ResolverConfig::default(),
//! );
//! assert!(resolver.get_internal_type("EntityPlayer")?.is_found());
//! assert!(!resolver.get_internal_type("EntityHuman")?.is_found());
//! # Ok::<(), hostreflect::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`host`] - Detection of the host variant, its version and package tag
//! - [`remap`] - Mapping tables and the remapping provider
//! - [`runtime`] - The reflective surface resolution runs against
//! - [`resolver`] - The memoizing resolver and its lookup strategies
//! - [`bridge`] - Packet dispatch on top of the resolver
//! - [`config`] - Package roots, detection markers and connection path names
//!
//! ## Error Handling
//!
//! Configuration errors are returned as [`Error`]. Missing symbols and failing invocations
//! are absorbed by the resolver and logged through `tracing`; install a subscriber to see
//! them.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use hostreflect::prelude::*;
///
/// let version = Version::parse("1.8.8")?;
/// assert!(version.is_compatible(&Version::from_parts(&[1, 8])));
/// # Ok::<(), hostreflect::Error>(())
/// ```
pub mod prelude;

pub mod bridge;
pub mod config;
pub mod host;
pub mod remap;
pub mod resolver;
pub mod runtime;

/// `hostreflect` Result type.
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `hostreflect` Error type.
///
/// The main error type for all operations in this crate, covering configuration errors,
/// resolution misses and invocation failures.
pub use error::Error;
