//! The storage capability interface.
//!
//! All real work on a netCDF-4 dataset (file format, define/data mode, B-tree indexing of groups and variables, value encoding) is done by an underlying storage library.
//! This module defines the narrow set of blocking calls the handles in this crate need from it:
//!  - [`ReadableStorageTraits`]: enumeration and inquiry of groups, dimensions and variables,
//!  - [`WritableStorageTraits`]: define mode transitions and creation of groups, dimensions and variables.
//!
//! Every call carries the id of the group it acts on.
//! There is no process-wide "current file", so handles from different datasets can be used side by side.
//!
//! [`store::MemoryStore`] is an in-process implementation of both traits.
//! [`storage_adapter`]s wrap any storage to log or count the calls made through it.

pub mod status;
pub mod storage_adapter;
mod storage_sync;
pub mod store;

use std::sync::Arc;

use derive_more::{Display, From};
use thiserror::Error;

pub use self::storage_sync::{
    ReadableStorageTraits, ReadableWritableStorageTraits, WritableStorageTraits,
};

/// [`Arc`] wrapped readable and writable storage.
pub type ReadableWritableStorage = Arc<dyn ReadableWritableStorageTraits>;

/// The dimension length requesting an unlimited (growable) dimension.
pub const UNLIMITED: u64 = 0;

/// The storage id of a group.
#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub i32);

/// The storage id of a dimension.
///
/// Dimension ids are unique within a dataset.
#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DimId(pub i32);

/// The storage id of a variable.
///
/// Variable ids are only unique within the group that owns the variable.
#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub i32);

/// The storage id of a data type.
#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub i32);

/// A storage error.
///
/// Errors reported by the storage library are passed through unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// An error status returned by the storage library.
    #[error("{message} (status {code})")]
    Library {
        /// The status code.
        code: i32,
        /// The status message.
        message: String,
    },
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl StorageError {
    /// Create a [`StorageError::Library`] error from a status code, using the message of [`status::message`].
    #[must_use]
    pub fn from_status(code: i32) -> Self {
        Self::Library {
            code,
            message: status::message(code).to_string(),
        }
    }

    /// Returns the storage library status code, if any.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Library { code, .. } => Some(*code),
            Self::Other(_) => None,
        }
    }
}

impl From<&str> for StorageError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for StorageError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.to_string())
    }
}
