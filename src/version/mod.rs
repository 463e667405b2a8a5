//! Server build identification.
//!
//! A build is identified by a [`ServerVersion`]: a display-only dotted version
//! string plus an integer revision. Only the revision takes part in ordering;
//! two builds of "1.5.9" are told apart purely by their build counter.
//!
//! - [`comparison`] decides whether the installed build needs replacing
//! - [`extractor`] reads versions out of the listing page and the server's own output

pub mod comparison;
pub mod extractor;

use std::fmt;

pub use comparison::{UpdateStatus, compare};
pub use extractor::{LatestBuild, ListingScraper, VersionProbe};

/// A `(version, revision)` pair read from a listing page or a server binary.
///
/// Not `Ord`. The version string is cosmetic; ordering goes through
/// [`compare`], which looks at `revision` alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerVersion {
    /// Dotted version, e.g. `1.5.9`
    pub version: String,
    /// Monotonically increasing build counter
    pub revision: u64,
}

impl ServerVersion {
    /// Create a version from its parts.
    pub fn new(version: impl Into<String>, revision: u64) -> Self {
        Self {
            version: version.into(),
            revision,
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}-{}", self.version, self.revision)
    }
}
