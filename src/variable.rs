//! netCDF-4 variables.
//!
//! A variable is a named, typed array defined in a group.
//! Its shape is an ordered list of dimensions, each defined in the variable's group or one of its ancestors.

use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    data_type::Type,
    dimension::Dimension,
    group::Group,
    hierarchy_error::{EntityKind, HierarchyError, NullHandleError},
    storage::{status::NC_EBADDIM, GroupId, ReadableStorageTraits, StorageError, VarId},
};

/// A variable handle.
///
/// A handle is either null or identifies a variable and the group it is defined in.
/// Variable ids are only unique within a group, so handles compare equal if they identify the same group and variable.
pub struct Variable<TStorage: ?Sized> {
    handle: Option<(Arc<TStorage>, GroupId, VarId)>,
}

impl<TStorage: ?Sized> Variable<TStorage> {
    /// Create a handle to variable `id` of group `group` of `storage`.
    #[must_use]
    pub fn new(storage: Arc<TStorage>, group: GroupId, id: VarId) -> Self {
        Self {
            handle: Some((storage, group, id)),
        }
    }

    /// Create a null variable handle.
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

    /// Returns the storage id of the variable.
    ///
    /// # Errors
    /// Returns [`HierarchyError::NullHandle`] if the handle is null.
    pub fn id(&self) -> Result<VarId, HierarchyError> {
        Ok(self.live("id")?.2)
    }

    /// Returns the group the variable is defined in.
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
    ) -> Result<(&Arc<TStorage>, GroupId, VarId), NullHandleError> {
        self.handle
            .as_ref()
            .map(|(storage, group, id)| (storage, *group, *id))
            .ok_or_else(|| NullHandleError::new(EntityKind::Variable, operation))
    }
}

impl<TStorage: ?Sized> Clone for Variable<TStorage> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<TStorage: ?Sized> core::fmt::Debug for Variable<TStorage> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.handle {
            Some((_, group, id)) => write!(f, "Variable({id} in group {group})"),
            None => write!(f, "Variable(null)"),
        }
    }
}

impl<TStorage: ?Sized> PartialEq for Variable<TStorage> {
    fn eq(&self, other: &Self) -> bool {
        self.handle.as_ref().map(|(_, group, id)| (group, id))
            == other.handle.as_ref().map(|(_, group, id)| (group, id))
    }
}

impl<TStorage: ?Sized> Eq for Variable<TStorage> {}

impl<TStorage: ?Sized> Hash for Variable<TStorage> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle
            .as_ref()
            .map(|(_, group, id)| (group, id))
            .hash(state);
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> Variable<TStorage> {
    /// Returns the name of the variable.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn name(&self) -> Result<String, HierarchyError> {
        let (storage, group, id) = self.live("name")?;
        Ok(storage.variable_name(group, id)?)
    }

    /// Returns the data type of the variable.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn variable_type(&self) -> Result<Type, HierarchyError> {
        let (storage, group, id) = self.live("variable_type")?;
        Ok(Type::from_id(storage.variable_type(group, id)?))
    }

    /// Returns the number of dimensions of the variable. A scalar variable has none.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn dimension_count(&self) -> Result<usize, HierarchyError> {
        let (storage, group, id) = self.live("dimension_count")?;
        Ok(storage.variable_dimension_ids(group, id)?.len())
    }

    /// Returns the dimensions of the variable, in order.
    ///
    /// Each dimension handle refers to the group the dimension is defined in, which may be an ancestor of the variable's group.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn dimensions(&self) -> Result<Vec<Dimension<TStorage>>, HierarchyError> {
        let (storage, group, id) = self.live("dimensions")?;
        let dims = storage.variable_dimension_ids(group, id)?;

        // owning group of each dimension, searching from the variable's group upwards
        let mut owners = vec![None; dims.len()];
        let mut search = Some(group);
        while let Some(current) = search {
            if owners.iter().all(Option::is_some) {
                break;
            }
            let local = storage.dimension_ids(current, false)?;
            for (dim, owner) in dims.iter().zip(owners.iter_mut()) {
                if owner.is_none() && local.contains(dim) {
                    *owner = Some(current);
                }
            }
            search = storage.parent_group(current)?;
        }

        dims.into_iter()
            .zip(owners)
            .map(|(dim, owner)| -> Result<_, HierarchyError> {
                let owner = owner.ok_or_else(|| StorageError::from_status(NC_EBADDIM))?;
                Ok(Dimension::new(Arc::clone(storage), owner, dim))
            })
            .collect()
    }

    /// Returns the dimension at `index` of the variable.
    ///
    /// # Errors
    /// Returns [`HierarchyError::IndexOutOfRange`] if `index` is not less than the number of dimensions, or a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn dimension(&self, index: usize) -> Result<Dimension<TStorage>, HierarchyError> {
        self.live("dimension")?;
        let dimensions = self.dimensions()?;
        let size = dimensions.len();
        dimensions
            .into_iter()
            .nth(index)
            .ok_or(HierarchyError::IndexOutOfRange { index, size })
    }

    /// Returns the number of elements of the variable: the product of its current dimension sizes, or 1 for a scalar.
    ///
    /// The product saturates at [`u64::MAX`].
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn data_length(&self) -> Result<u64, HierarchyError> {
        let (storage, group, id) = self.live("data_length")?;
        let mut length = 1;
        for dim in storage.variable_dimension_ids(group, id)? {
            length = storage
                .dimension_length(group, dim)?
                .saturating_mul(length);
        }
        Ok(length)
    }
}
