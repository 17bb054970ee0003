use super::{DimId, GroupId, StorageError, TypeId, VarId};

/// Readable storage traits.
///
/// Enumeration and inquiry of the groups, dimensions and variables of an open dataset.
pub trait ReadableStorageTraits: Send + Sync {
    /// Returns the id of the root group.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn root_group(&self) -> Result<GroupId, StorageError>;

    /// Returns the ids of the immediate child groups of `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn child_groups(&self, group: GroupId) -> Result<Vec<GroupId>, StorageError>;

    /// Returns the local name of `group`. The root group is named `/`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn group_name(&self, group: GroupId) -> Result<String, StorageError>;

    /// Returns the full name of `group`, with `/` separating the names of its ancestors.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn group_full_name(&self, group: GroupId) -> Result<String, StorageError>;

    /// Returns the parent of `group`, or [`None`] if `group` is the root.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn parent_group(&self, group: GroupId) -> Result<Option<GroupId>, StorageError>;

    /// Returns the ids of the dimensions defined in `group`, and in its ancestors if `include_parents` is true.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn dimension_ids(
        &self,
        group: GroupId,
        include_parents: bool,
    ) -> Result<Vec<DimId>, StorageError>;

    /// Returns the number of dimensions defined in `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn dimension_count(&self, group: GroupId) -> Result<usize, StorageError> {
        Ok(self.dimension_ids(group, false)?.len())
    }

    /// Returns the name of a dimension visible from `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` or `dim` is not valid or there is an underlying storage error.
    fn dimension_name(&self, group: GroupId, dim: DimId) -> Result<String, StorageError>;

    /// Returns the current length of a dimension visible from `group`.
    ///
    /// For an unlimited dimension this is the current number of records.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` or `dim` is not valid or there is an underlying storage error.
    fn dimension_length(&self, group: GroupId, dim: DimId) -> Result<u64, StorageError>;

    /// Returns the ids of the unlimited dimensions defined in `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn unlimited_dimension_ids(&self, group: GroupId) -> Result<Vec<DimId>, StorageError>;

    /// Returns the ids of the variables defined in `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn variable_ids(&self, group: GroupId) -> Result<Vec<VarId>, StorageError>;

    /// Returns the number of variables defined in `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn variable_count(&self, group: GroupId) -> Result<usize, StorageError> {
        Ok(self.variable_ids(group)?.len())
    }

    /// Returns the name of variable `var` of `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` or `var` is not valid or there is an underlying storage error.
    fn variable_name(&self, group: GroupId, var: VarId) -> Result<String, StorageError>;

    /// Returns the data type id of variable `var` of `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` or `var` is not valid or there is an underlying storage error.
    fn variable_type(&self, group: GroupId, var: VarId) -> Result<TypeId, StorageError>;

    /// Returns the ordered dimension ids (the shape) of variable `var` of `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` or `var` is not valid or there is an underlying storage error.
    fn variable_dimension_ids(&self, group: GroupId, var: VarId)
        -> Result<Vec<DimId>, StorageError>;
}

/// Writable storage traits.
///
/// Define mode transitions and creation of groups, dimensions and variables.
pub trait WritableStorageTraits: Send + Sync {
    /// Put the dataset containing `group` into define mode.
    ///
    /// Calling this while already in define mode succeeds.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn enter_define_mode(&self, group: GroupId) -> Result<(), StorageError>;

    /// Take the dataset containing `group` out of define mode.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `group` is not valid or there is an underlying storage error.
    fn leave_define_mode(&self, group: GroupId) -> Result<(), StorageError>;

    /// Create a child group of `parent` named `name`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the name is invalid or in use, the dataset is not in define mode, or there is an underlying storage error.
    fn define_group(&self, parent: GroupId, name: &str) -> Result<GroupId, StorageError>;

    /// Create a dimension of `group` with `length`, or an unlimited dimension if `length` is [`UNLIMITED`](super::UNLIMITED).
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the name is invalid or in use, the length is invalid, the dataset is not in define mode, or there is an underlying storage error.
    fn define_dimension(
        &self,
        group: GroupId,
        name: &str,
        length: u64,
    ) -> Result<DimId, StorageError>;

    /// Rename a dimension of `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the name is invalid or in use, the dataset is not in define mode, or there is an underlying storage error.
    fn rename_dimension(&self, group: GroupId, dim: DimId, name: &str)
        -> Result<(), StorageError>;

    /// Create a variable of `group` with data type `type_id` and shape `dims`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the name is invalid or in use, the type or a dimension is invalid, the dataset is not in define mode, or there is an underlying storage error.
    fn define_variable(
        &self,
        group: GroupId,
        name: &str,
        type_id: TypeId,
        dims: &[DimId],
    ) -> Result<VarId, StorageError>;
}

/// A supertrait of [`ReadableStorageTraits`] and [`WritableStorageTraits`].
pub trait ReadableWritableStorageTraits: ReadableStorageTraits + WritableStorageTraits {}

impl<T> ReadableWritableStorageTraits for T where T: ReadableStorageTraits + WritableStorageTraits {}
