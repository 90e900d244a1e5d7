//! Error taxonomy shared by every core component.
//!
//! Navigation misses are not errors; they are reported through
//! [`NavOutcome`](crate::navigate::NavOutcome).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A paragraph index outside the store. Indicates a caller bug.
    #[error("paragraph index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("segment {segment} of paragraph {index} out of range (len {len})")]
    SegmentOutOfRange {
        index: usize,
        segment: usize,
        len: usize,
    },

    /// An imported document is malformed or lacks a required field.
    #[error("invalid import file: {0}")]
    InvalidImportFile(String),

    /// Durable storage could not be read or written. In-memory state stays
    /// authoritative for the session.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A destructive operation was invoked without confirmation.
    #[error("{0} requires confirmation")]
    ConfirmationRequired(&'static str),

    #[error("no snapshot with timestamp {0}")]
    SnapshotNotFound(i64),

    #[error("{0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Caller-supplied consent for destructive operations.
///
/// Core operations that replace or erase state take a `Confirmation` and
/// refuse with [`CoreError::ConfirmationRequired`] unless it is
/// [`Confirmation::Granted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Granted,
    Denied,
}

impl Confirmation {
    pub fn from_flag(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Granted
        } else {
            Confirmation::Denied
        }
    }

    pub(crate) fn require(self, operation: &'static str) -> Result<()> {
        match self {
            Confirmation::Granted => Ok(()),
            Confirmation::Denied => Err(CoreError::ConfirmationRequired(operation)),
        }
    }
}
