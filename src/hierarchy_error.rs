//! Errors of group, dimension and variable handle operations.

use derive_more::Display;
use thiserror::Error;

use crate::storage::StorageError;

/// The kind of entity a handle refers to.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A group.
    #[display("group")]
    Group,
    /// A dimension.
    #[display("dimension")]
    Dimension,
    /// A variable.
    #[display("variable")]
    Variable,
}

/// An operation was invoked on a null handle.
///
/// No storage call is made before this error is returned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("attempt to invoke {operation} on a null {entity}")]
pub struct NullHandleError {
    entity: EntityKind,
    operation: &'static str,
}

impl NullHandleError {
    /// Create a new null handle error.
    #[must_use]
    pub const fn new(entity: EntityKind, operation: &'static str) -> Self {
        Self { entity, operation }
    }

    /// Returns the kind of the null handle.
    #[must_use]
    pub const fn entity(&self) -> EntityKind {
        self.entity
    }

    /// Returns the name of the invoked operation.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }
}

/// An argument of a definition operation is invalid.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The data type is a null handle.
    #[error("the data type is null")]
    NullType,
    /// No data type has the given name.
    #[error("no data type is named `{0}`")]
    UnresolvedType(String),
    /// A dimension is a null handle.
    #[error("a dimension is null")]
    NullDimension,
    /// No dimension with the given name is visible from the group.
    #[error("no dimension named `{0}` is visible from the group")]
    UnresolvedDimension(String),
    /// A dimension handle is not defined in the group.
    #[error("dimension `{0}` is not defined in the group")]
    DimensionNotInGroup(String),
}

/// A group, dimension or variable handle error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// An operation was invoked on a null handle.
    #[error(transparent)]
    NullHandle(#[from] NullHandleError),
    /// The storage library reported an error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// An argument was invalid.
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    /// An index was out of range.
    #[error("index {index} is out of range for size {size}")]
    IndexOutOfRange {
        /// The index.
        index: usize,
        /// The size.
        size: usize,
    },
    /// A traversal went deeper than the configured traversal depth limit.
    #[error("group traversal exceeded the depth limit of {0}")]
    DepthLimitExceeded(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::status::NC_EBADID;

    #[test]
    fn null_handle_message() {
        let err = NullHandleError::new(EntityKind::Group, "add_group");
        assert_eq!(err.entity(), EntityKind::Group);
        assert_eq!(err.operation(), "add_group");
        assert_eq!(
            HierarchyError::from(err).to_string(),
            "attempt to invoke add_group on a null group"
        );
    }

    #[test]
    fn hierarchy_error_transparent() {
        let err = HierarchyError::from(StorageError::from_status(NC_EBADID));
        assert_eq!(err.to_string(), "NetCDF: Not a valid ID (status -33)");
        let err = HierarchyError::from(ValidationError::UnresolvedDimension("x".to_string()));
        assert_eq!(
            err.to_string(),
            "no dimension named `x` is visible from the group"
        );
    }
}
