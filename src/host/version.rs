//! Numeric version identifiers for host builds.
//!
//! Host banners, Minecraft releases and implementation package tags all carry versions of
//! the shape `1.8`, `1.7.10` or `v1_8_R3`. [`Version`] reads them into an ordered sequence of
//! unsigned integers and compares them with zero padding, so `1.7` and `1.7.0` are the same
//! version.
//!
//! # Parsing Rules
//!
//! - The input is split on `.` and `-`
//! - Every segment drops its leading non-digit characters (`R3` reads as `3`)
//! - What remains must be a non-empty unsigned integer, otherwise parsing fails with
//!   [`crate::Error::VersionParse`]
//!
//! # Examples
//!
//! ```rust
//! use hostreflect::host::Version;
//!
//! let current = Version::parse("1.8")?;
//! let minimum = Version::parse("1.7.5")?;
//!
//! assert_eq!(current.parts(), &[1, 8]);
//! assert!(current.is_compatible(&minimum));
//! assert_eq!(Version::parse("1.7")?, Version::parse("1.7.0")?);
//! # Ok::<(), hostreflect::Error>(())
//! ```

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use crate::{Error, Result};

/// An ordered, immutable version identifier.
///
/// Equality, ordering and hashing all ignore trailing zero components, keeping them
/// consistent with each other. The original source string is kept for display and
/// diagnostics only.
#[derive(Debug, Clone)]
pub struct Version {
    /// Numeric components, most significant first
    parts: Vec<u32>,
    /// The text this version was read from
    source: String,
}

impl Version {
    /// Parse a version string.
    ///
    /// # Arguments
    ///
    /// * `input` - Dot and/or dash separated version text
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionParse`] if any segment has no digit tail or carries
    /// non-digit characters after its digits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hostreflect::host::Version;
    ///
    /// assert_eq!(Version::parse("1.7.10")?.parts(), &[1, 7, 10]);
    /// assert_eq!(Version::parse("v1.8-R3")?.parts(), &[1, 8, 3]);
    /// assert!(Version::parse("1.8-SNAPSHOT").is_err());
    /// # Ok::<(), hostreflect::Error>(())
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = Vec::new();

        for segment in input.split(['.', '-']) {
            let digits = segment.trim_start_matches(|c: char| !c.is_ascii_digit());
            let value = digits
                .parse::<u32>()
                .map_err(|_| Error::VersionParse {
                    input: input.to_string(),
                    segment: segment.to_string(),
                })?;
            parts.push(value);
        }

        Ok(Version {
            parts,
            source: input.to_string(),
        })
    }

    /// Build a version from its numeric components.
    ///
    /// The source string is the dotted rendering of `parts`.
    #[must_use]
    pub fn from_parts(parts: &[u32]) -> Self {
        let source = parts
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".");

        Version {
            parts: parts.to_vec(),
            source,
        }
    }

    /// Read an implementation package tag such as `v1_8_R3`.
    ///
    /// Underscores separate the components; the `v` and `R` markers are dropped by the
    /// normal leading non-digit rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionParse`] if the tag contains a non-numeric component.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hostreflect::host::Version;
    ///
    /// assert_eq!(Version::from_package_tag("v1_8_R3")?.parts(), &[1, 8, 3]);
    /// # Ok::<(), hostreflect::Error>(())
    /// ```
    pub fn from_package_tag(tag: &str) -> Result<Self> {
        let mut version = Version::parse(&tag.replace('_', "."))?;
        version.source = tag.to_string();
        Ok(version)
    }

    /// Returns the numeric components.
    #[must_use]
    pub fn parts(&self) -> &[u32] {
        &self.parts
    }

    /// Returns the text this version was read from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Compare two versions, treating missing components as zero.
    ///
    /// The first differing component decides the order.
    #[must_use]
    pub fn compare(&self, other: &Version) -> Ordering {
        let len = self.parts.len().max(other.parts.len());

        for index in 0..len {
            let left = self.parts.get(index).copied().unwrap_or(0);
            let right = other.parts.get(index).copied().unwrap_or(0);

            match left.cmp(&right) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }

        Ordering::Equal
    }

    /// Check whether this version satisfies a minimum.
    ///
    /// # Arguments
    ///
    /// * `minimum` - The lowest acceptable version
    ///
    /// # Returns
    ///
    /// `true` if `self >= minimum` under zero-padded comparison.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hostreflect::host::Version;
    ///
    /// let minimum = Version::parse("1.7.5")?;
    /// assert!(Version::parse("1.8")?.is_compatible(&minimum));
    /// assert!(!Version::parse("1.6")?.is_compatible(&minimum));
    /// # Ok::<(), hostreflect::Error>(())
    /// ```
    #[must_use]
    pub fn is_compatible(&self, minimum: &Version) -> bool {
        self.compare(minimum) != Ordering::Less
    }

    /// Check whether this version is at most `maximum`.
    #[must_use]
    pub fn is_supported_up_to(&self, maximum: &Version) -> bool {
        self.compare(maximum) != Ordering::Greater
    }

    /// Check whether both versions compare equal after zero padding.
    #[must_use]
    pub fn is_identical(&self, other: &Version) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// Components without trailing zeros, the canonical form used for hashing.
    fn significant(&self) -> &[u32] {
        let end = self
            .parts
            .iter()
            .rposition(|part| *part != 0)
            .map_or(0, |index| index + 1);
        &self.parts[..end]
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.is_identical(other)
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
