use thiserror::Error;

use crate::{
    host::{Capsule, HostVariant},
    remap::RemapUnavailableReason,
    resolver::SymbolKind,
};

macro_rules! mapping_error {
    // Single string version
    ($line:expr, $msg:expr) => {
        crate::Error::Mapping {
            line: $line,
            message: $msg.to_string(),
            file: file!(),
            source_line: line!(),
        }
    };

    // Format string with arguments version
    ($line:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::Mapping {
            line: $line,
            message: format!($fmt, $($arg)*),
            file: file!(),
            source_line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors fall into three classes with different propagation rules:
///
/// ## Configuration Errors
/// Returned to the caller because the subsystem cannot function at all.
/// - [`Error::VersionParse`] - A version string contained a non-numeric segment
/// - [`Error::RemapUnavailable`] - A remapping provider could not be constructed
/// - [`Error::NoCapsule`] - The host variant belongs to no API family
/// - [`Error::UnsupportedCapsule`] - The capability only exists for the other API family
/// - [`Error::Translation`] - The host remapper failed while translating a type name
/// - [`Error::Mapping`] - A mapping file could not be read
///
/// ## Resolution Misses
/// Absorbed by [`crate::resolver::SymbolResolver`] and memoized as empty handles.
/// - [`Error::SymbolNotFound`] - A type, field, method or constructor does not exist
///
/// ## Invocation Failures
/// Absorbed by the permissive resolver entry points, never memoized.
/// - [`Error::Invocation`] - The member itself failed
/// - [`Error::IllegalAccess`] - The member is not accessible
/// - [`Error::ArgumentMismatch`] - Wrong argument count or kind
/// - [`Error::NullReceiver`] - Instance member used without a receiver
/// - [`Error::Dispatch`] - Both packet dispatch paths failed
///
/// # Examples
///
/// ```rust
/// use hostreflect::{Error, host::Version};
///
/// match Version::parse("1.8.x") {
///     Ok(version) => println!("Parsed {}", version),
///     Err(Error::VersionParse { input, segment }) => {
///         eprintln!("'{}' has a bad segment '{}'", input, segment);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    /// A version string contained a segment that is not an unsigned integer.
    ///
    /// Leading non-digit characters of a segment are ignored (`R3` reads as `3`), but a
    /// segment that has no digit tail, or trailing garbage after its digits, is rejected.
    #[error("Invalid version '{input}' - segment '{segment}' is not numeric")]
    VersionParse {
        /// The complete version string that failed to parse
        input: String,
        /// The offending segment
        segment: String,
    },

    /// The remapping provider could not be constructed.
    ///
    /// The associated reason tells apart a host that is not the remapping fork from a fork
    /// that ships with plugin remapping switched off.
    #[error("Remapping is unavailable - {0}")]
    RemapUnavailable(RemapUnavailableReason),

    /// The detected host variant belongs to no API family.
    ///
    /// Raised whenever a capsule-dependent capability is requested while the host is
    /// [`HostVariant::Unknown`].
    #[error("Host variant {0} has no capsule")]
    NoCapsule(HostVariant),

    /// The capability only exists for hosts of another API family.
    #[error("{capability} is not available on the {capsule} capsule")]
    UnsupportedCapsule {
        /// The capsule of the running host
        capsule: Capsule,
        /// Short description of the capability that was requested
        capability: &'static str,
    },

    /// The host remapper failed to translate a type name.
    ///
    /// A remapping provider that exists is expected to always translate, so this is treated
    /// as a broken host configuration and not as a miss.
    #[error("Failed to translate type '{name}' - {message}")]
    Translation {
        /// The slash-delimited type name that was being translated
        name: String,
        /// Description of the underlying failure
        message: String,
    },

    /// A mapping file could not be read.
    ///
    /// # Fields
    ///
    /// * `line` - 1-based line of the mapping input
    /// * `message` - What was wrong with the line
    /// * `file` - Source file where the error was detected
    /// * `source_line` - Source line where the error was detected
    #[error("Mapping line {line} - {file}:{source_line}: {message}")]
    Mapping {
        /// 1-based line number inside the mapping input
        line: usize,
        /// The message to be printed for the Mapping error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        source_line: u32,
    },

    // Resolution misses
    /// A symbol does not exist under the requested name.
    #[error("{kind} '{name}' not found on '{owner}'")]
    SymbolNotFound {
        /// What kind of symbol was looked up
        kind: SymbolKind,
        /// The owning type, or the package root for type lookups
        owner: String,
        /// The name that was looked up
        name: String,
    },

    // Invocation failures
    /// The member raised a failure while running.
    #[error("Invocation of '{member}' failed - {message}")]
    Invocation {
        /// Qualified name of the member
        member: String,
        /// The failure reported by the member
        message: String,
    },

    /// The member is not public and was never made accessible.
    #[error("Member '{member}' is not accessible")]
    IllegalAccess {
        /// Qualified name of the member
        member: String,
    },

    /// The supplied arguments do not fit the member's parameter list.
    #[error("Argument mismatch for '{member}' - expected {expected}, got {actual}")]
    ArgumentMismatch {
        /// Qualified name of the member
        member: String,
        /// Description of the expected arguments
        expected: String,
        /// Description of the supplied arguments
        actual: String,
    },

    /// An instance member was used without a receiver, or with a receiver that is not an
    /// object.
    #[error("Member '{member}' requires an object receiver")]
    NullReceiver {
        /// Qualified name of the member
        member: String,
    },

    /// Both the direct and the resolved packet dispatch paths failed.
    #[error("Packet dispatch failed - {resolved}")]
    Dispatch {
        /// Why the direct host API path failed, if it was attempted
        fast_path: Option<String>,
        /// Why the resolved connection path failed
        resolved: Box<Error>,
    },
}

impl Error {
    /// Returns `true` for the configuration class of errors that surfaces to callers.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::VersionParse { .. }
                | Error::RemapUnavailable(_)
                | Error::NoCapsule(_)
                | Error::UnsupportedCapsule { .. }
                | Error::Translation { .. }
                | Error::Mapping { .. }
        )
    }

    /// Returns `true` if this error reports a symbol that does not exist.
    #[must_use]
    pub fn is_miss(&self) -> bool {
        matches!(self, Error::SymbolNotFound { .. })
    }
}
