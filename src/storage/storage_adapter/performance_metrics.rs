//! A storage adapter which records performance metrics.

use crate::storage::{
    DimId, GroupId, ReadableStorageTraits, StorageError, TypeId, VarId, WritableStorageTraits,
};

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// The performance metrics storage adapter. Counts inquiry and definition calls.
///
/// It is intended to aid in testing by allowing the application to validate that the storage calls made by an operation match expected values.
/// Every [`ReadableStorageTraits`] call is a read and every [`WritableStorageTraits`] call is a write, whether or not it succeeds.
#[derive(Debug)]
pub struct PerformanceMetricsStorageAdapter<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl<TStorage: ?Sized> PerformanceMetricsStorageAdapter<TStorage> {
    /// Create a new performance metrics storage adapter.
    #[must_use]
    pub fn new(storage: Arc<TStorage>) -> Self {
        Self {
            storage,
            reads: AtomicUsize::default(),
            writes: AtomicUsize::default(),
        }
    }

    /// Returns the number of read requests.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of write requests.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the total number of requests.
    pub fn calls(&self) -> usize {
        self.reads() + self.writes()
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
    }

    fn read(&self) -> &TStorage {
        self.reads.fetch_add(1, Ordering::Relaxed);
        &self.storage
    }

    fn write(&self) -> &TStorage {
        self.writes.fetch_add(1, Ordering::Relaxed);
        &self.storage
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> ReadableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn root_group(&self) -> Result<GroupId, StorageError> {
        self.read().root_group()
    }

    fn child_groups(&self, group: GroupId) -> Result<Vec<GroupId>, StorageError> {
        self.read().child_groups(group)
    }

    fn group_name(&self, group: GroupId) -> Result<String, StorageError> {
        self.read().group_name(group)
    }

    fn group_full_name(&self, group: GroupId) -> Result<String, StorageError> {
        self.read().group_full_name(group)
    }

    fn parent_group(&self, group: GroupId) -> Result<Option<GroupId>, StorageError> {
        self.read().parent_group(group)
    }

    fn dimension_ids(
        &self,
        group: GroupId,
        include_parents: bool,
    ) -> Result<Vec<DimId>, StorageError> {
        self.read().dimension_ids(group, include_parents)
    }

    fn dimension_name(&self, group: GroupId, dim: DimId) -> Result<String, StorageError> {
        self.read().dimension_name(group, dim)
    }

    fn dimension_length(&self, group: GroupId, dim: DimId) -> Result<u64, StorageError> {
        self.read().dimension_length(group, dim)
    }

    fn unlimited_dimension_ids(&self, group: GroupId) -> Result<Vec<DimId>, StorageError> {
        self.read().unlimited_dimension_ids(group)
    }

    fn variable_ids(&self, group: GroupId) -> Result<Vec<VarId>, StorageError> {
        self.read().variable_ids(group)
    }

    fn variable_name(&self, group: GroupId, var: VarId) -> Result<String, StorageError> {
        self.read().variable_name(group, var)
    }

    fn variable_type(&self, group: GroupId, var: VarId) -> Result<TypeId, StorageError> {
        self.read().variable_type(group, var)
    }

    fn variable_dimension_ids(
        &self,
        group: GroupId,
        var: VarId,
    ) -> Result<Vec<DimId>, StorageError> {
        self.read().variable_dimension_ids(group, var)
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> WritableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn enter_define_mode(&self, group: GroupId) -> Result<(), StorageError> {
        self.write().enter_define_mode(group)
    }

    fn leave_define_mode(&self, group: GroupId) -> Result<(), StorageError> {
        self.write().leave_define_mode(group)
    }

    fn define_group(&self, parent: GroupId, name: &str) -> Result<GroupId, StorageError> {
        self.write().define_group(parent, name)
    }

    fn define_dimension(
        &self,
        group: GroupId,
        name: &str,
        length: u64,
    ) -> Result<DimId, StorageError> {
        self.write().define_dimension(group, name, length)
    }

    fn rename_dimension(
        &self,
        group: GroupId,
        dim: DimId,
        name: &str,
    ) -> Result<(), StorageError> {
        self.write().rename_dimension(group, dim, name)
    }

    fn define_variable(
        &self,
        group: GroupId,
        name: &str,
        type_id: TypeId,
        dims: &[DimId],
    ) -> Result<VarId, StorageError> {
        self.write().define_variable(group, name, type_id, dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store::MemoryStore;
    use std::error::Error;

    #[test]
    fn performance_metrics() -> Result<(), Box<dyn Error>> {
        let store = PerformanceMetricsStorageAdapter::new(Arc::new(MemoryStore::new()));
        let root = store.root_group()?;
        let usa = store.define_group(root, "USA")?;
        store.define_dimension(usa, "time", 2)?;
        assert!(store.define_dimension(usa, "time", 2).is_err());
        assert_eq!(store.dimension_count(usa)?, 1);
        assert_eq!(store.reads(), 2);
        assert_eq!(store.writes(), 3);
        assert_eq!(store.calls(), 5);
        store.reset();
        assert_eq!(store.calls(), 0);
        Ok(())
    }
}
