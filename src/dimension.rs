//! netCDF-4 dimensions.
//!
//! A dimension is a named axis defined in a group, with a length.
//! It is visible in its group and in every descendant of that group, and variables there may use it in their shape.
//! An unlimited dimension grows as records are written, so [`Dimension::size`] queries the storage on every call.

use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    group::Group,
    hierarchy_error::{EntityKind, HierarchyError, NullHandleError},
    storage::{DimId, GroupId, ReadableStorageTraits, ReadableWritableStorageTraits},
};

/// A dimension handle.
///
/// A handle is either null or identifies a dimension and the group it was obtained through.
/// Dimension ids are unique within a dataset, so handles compare equal if they identify the same dimension.
pub struct Dimension<TStorage: ?Sized> {
    handle: Option<(Arc<TStorage>, GroupId, DimId)>,
}

impl<TStorage: ?Sized> Dimension<TStorage> {
    /// Create a handle to dimension `id` defined in group `group` of `storage`.
    #[must_use]
    pub fn new(storage: Arc<TStorage>, group: GroupId, id: DimId) -> Self {
        Self {
            handle: Some((storage, group, id)),
        }
    }

    /// Create a null dimension handle.
    #[must_use]
    pub fn null() -> Self {
        Self { handle: None }
    }

    /// Returns true if the handle is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.handle.is_none()
    }

    /// Make the handle null.
    pub fn set_null(&mut self) {
        self.handle = None;
    }

    /// Returns the storage id of the dimension.
    ///
    /// # Errors
    /// Returns [`HierarchyError::NullHandle`] if the handle is null.
    pub fn id(&self) -> Result<DimId, HierarchyError> {
        Ok(self.live("id")?.2)
    }

    /// Returns the group the dimension is defined in.
    ///
    /// # Errors
    /// Returns [`HierarchyError::NullHandle`] if the handle is null.
    pub fn parent_group(&self) -> Result<Group<TStorage>, HierarchyError> {
        let (storage, group, _) = self.live("parent_group")?;
        Ok(Group::new(Arc::clone(storage), group))
    }

    fn live(
        &self,
        operation: &'static str,
    ) -> Result<(&Arc<TStorage>, GroupId, DimId), NullHandleError> {
        self.handle
            .as_ref()
            .map(|(storage, group, id)| (storage, *group, *id))
            .ok_or_else(|| NullHandleError::new(EntityKind::Dimension, operation))
    }
}

impl<TStorage: ?Sized> Clone for Dimension<TStorage> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<TStorage: ?Sized> core::fmt::Debug for Dimension<TStorage> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.handle {
            Some((_, group, id)) => write!(f, "Dimension({id} in group {group})"),
            None => write!(f, "Dimension(null)"),
        }
    }
}

impl<TStorage: ?Sized> PartialEq for Dimension<TStorage> {
    fn eq(&self, other: &Self) -> bool {
        self.handle.as_ref().map(|(_, _, id)| id) == other.handle.as_ref().map(|(_, _, id)| id)
    }
}

impl<TStorage: ?Sized> Eq for Dimension<TStorage> {}

impl<TStorage: ?Sized> Hash for Dimension<TStorage> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.as_ref().map(|(_, _, id)| id).hash(state);
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> Dimension<TStorage> {
    /// Returns the name of the dimension.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn name(&self) -> Result<String, HierarchyError> {
        let (storage, group, id) = self.live("name")?;
        Ok(storage.dimension_name(group, id)?)
    }

    /// Returns the current length of the dimension.
    ///
    /// For an unlimited dimension, this is the current number of records.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn size(&self) -> Result<u64, HierarchyError> {
        let (storage, group, id) = self.live("size")?;
        Ok(storage.dimension_length(group, id)?)
    }

    /// Returns true if the dimension is unlimited.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn is_unlimited(&self) -> Result<bool, HierarchyError> {
        let (storage, group, id) = self.live("is_unlimited")?;
        Ok(storage.unlimited_dimension_ids(group)?.contains(&id))
    }

    /// Returns true if the dimension is defined in `group` itself.
    ///
    /// Dimensions of the ancestors of `group` are not valid in `group`, even though they are visible there by name.
    /// Neither is a dimension obtained from a different storage.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if this handle or `group` is null, or there is a storage error.
    pub fn is_valid_in(&self, group: &Group<TStorage>) -> Result<bool, HierarchyError> {
        let (dimension_storage, _, id) = self.live("is_valid_in")?;
        let (storage, group) = group.live("is_valid_in")?;
        if !Arc::ptr_eq(dimension_storage, storage) {
            return Ok(false);
        }
        Ok(storage.dimension_ids(group, false)?.contains(&id))
    }
}

impl<TStorage: ?Sized + ReadableWritableStorageTraits> Dimension<TStorage> {
    /// Rename the dimension.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, or the storage rejects the name.
    pub fn rename(&self, name: &str) -> Result<(), HierarchyError> {
        let (storage, group, id) = self.live("rename")?;
        storage.enter_define_mode(group)?;
        Ok(storage.rename_dimension(group, id, name)?)
    }
}
