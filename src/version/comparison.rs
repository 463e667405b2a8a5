//! Revision ordering between the latest nightly and the installed server.

use std::cmp::Ordering;

use super::ServerVersion;

/// Outcome of comparing the latest listed build with the installed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateStatus {
    /// The listing has a newer revision than the installed server.
    NeedsUpdate,
    /// Both revisions are equal.
    UpToDate,
    /// The installed server is newer than anything listed.
    ///
    /// Not a success state: the listing is stale or the local build came from
    /// somewhere else.
    Anomalous,
}

impl UpdateStatus {
    /// Whether the update pipeline should run.
    #[must_use]
    pub const fn needs_update(self) -> bool {
        matches!(self, Self::NeedsUpdate)
    }

    /// The status seen from the other side of the comparison.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::NeedsUpdate => Self::Anomalous,
            Self::UpToDate => Self::UpToDate,
            Self::Anomalous => Self::NeedsUpdate,
        }
    }
}

/// Compare the latest available build with the installed build by revision.
#[must_use]
pub fn compare(latest: &ServerVersion, current: &ServerVersion) -> UpdateStatus {
    match latest.revision.cmp(&current.revision) {
        Ordering::Greater => UpdateStatus::NeedsUpdate,
        Ordering::Equal => UpdateStatus::UpToDate,
        Ordering::Less => UpdateStatus::Anomalous,
    }
}
