//! A storage adapter which prints function calls.

use std::{fmt::Debug, io::Write, sync::Arc};

use itertools::Itertools;
use parking_lot::Mutex;

use crate::storage::{
    DimId, GroupId, ReadableStorageTraits, StorageError, TypeId, VarId, WritableStorageTraits,
};

/// The usage log storage adapter. Logs storage method calls.
///
/// It is intended to aid in debugging by revealing the storage calls made by handle operations.
///
/// A failed log write is returned as a [`StorageError`] from inquiry calls.
/// Definition calls always return the result of the wrapped storage, because a definition made before the log write cannot be undone.
///
/// ### Example (log to stdout)
/// ```rust
/// # use std::sync::Arc;
/// # use parking_lot::Mutex;
/// # use netcdf4_hierarchy::storage::store::MemoryStore;
/// # use netcdf4_hierarchy::storage::storage_adapter::usage_log::UsageLogStorageAdapter;
/// let store = Arc::new(MemoryStore::new());
/// let log_writer = Arc::new(Mutex::new(
///     // std::io::BufWriter::new(
///     std::io::stdout(),
///     //    )
/// ));
/// let store = Arc::new(UsageLogStorageAdapter::new(store, log_writer, || {
///     chrono::Utc::now().format("[%T%.3f] ").to_string()
/// }));
/// ```
///
/// Applying group methods with the above [`UsageLogStorageAdapter`] prints outputs like:
/// ```text
/// [10:02:41.311] root_group() -> Ok(GroupId(0))
/// [10:02:41.311] enter_define_mode(0) -> Ok(())
/// [10:02:41.311] define_group(0, USA) -> Ok(GroupId(1))
/// [10:02:41.312] define_dimension(1, time, 2) -> Ok(DimId(0))
/// [10:02:41.312] child_groups(1) -> [2, 3, 4]
/// [10:02:41.312] dimension_ids(4, include_parents=false) -> [1, 2]
/// [10:02:41.312] dimension_name(4, 2) -> Ok("time")
/// [10:02:41.313] child_groups(9) -> Err(Library { code: -116, message: "NetCDF: Bad group ID" })
/// ```
pub struct UsageLogStorageAdapter<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    handle: Arc<Mutex<dyn Write + Send + Sync>>,
    prefix_func: fn() -> String,
}

impl<TStorage: ?Sized> core::fmt::Debug for UsageLogStorageAdapter<TStorage> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        writeln!(f, "usage log")
    }
}

impl<TStorage: ?Sized> UsageLogStorageAdapter<TStorage> {
    /// Create a new usage log storage adapter.
    pub fn new(
        storage: Arc<TStorage>,
        handle: Arc<Mutex<dyn Write + Send + Sync>>,
        prefix_func: fn() -> String,
    ) -> Self {
        Self {
            storage,
            handle,
            prefix_func,
        }
    }

    fn log(&self, call: core::fmt::Arguments) -> std::io::Result<()> {
        writeln!(self.handle.lock(), "{}{call}", (self.prefix_func)())
    }

    /// Log a definition call. The log write is best effort: the definition has already been made.
    fn log_definition<T: Debug>(
        &self,
        call: core::fmt::Arguments,
        result: Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let _ = self.log(format_args!("{call} -> {result:?}"));
        result
    }
}

/// Formats a list result as `[a, b]`, or as `Err(..)` if the call failed.
fn list<T: std::fmt::Display>(result: &Result<Vec<T>, StorageError>) -> String {
    match result {
        Ok(values) => format!("[{}]", values.iter().format(", ")),
        Err(err) => format!("Err({err:?})"),
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> ReadableStorageTraits
    for UsageLogStorageAdapter<TStorage>
{
    fn root_group(&self) -> Result<GroupId, StorageError> {
        let result = self.storage.root_group();
        self.log(format_args!("root_group() -> {result:?}"))?;
        result
    }

    fn child_groups(&self, group: GroupId) -> Result<Vec<GroupId>, StorageError> {
        let result = self.storage.child_groups(group);
        self.log(format_args!("child_groups({group}) -> {}", list(&result)))?;
        result
    }

    fn group_name(&self, group: GroupId) -> Result<String, StorageError> {
        let result = self.storage.group_name(group);
        self.log(format_args!("group_name({group}) -> {result:?}"))?;
        result
    }

    fn group_full_name(&self, group: GroupId) -> Result<String, StorageError> {
        let result = self.storage.group_full_name(group);
        self.log(format_args!("group_full_name({group}) -> {result:?}"))?;
        result
    }

    fn parent_group(&self, group: GroupId) -> Result<Option<GroupId>, StorageError> {
        let result = self.storage.parent_group(group);
        self.log(format_args!("parent_group({group}) -> {result:?}"))?;
        result
    }

    fn dimension_ids(
        &self,
        group: GroupId,
        include_parents: bool,
    ) -> Result<Vec<DimId>, StorageError> {
        let result = self.storage.dimension_ids(group, include_parents);
        self.log(format_args!(
            "dimension_ids({group}, include_parents={include_parents}) -> {}",
            list(&result)
        ))?;
        result
    }

    fn dimension_name(&self, group: GroupId, dim: DimId) -> Result<String, StorageError> {
        let result = self.storage.dimension_name(group, dim);
        self.log(format_args!("dimension_name({group}, {dim}) -> {result:?}"))?;
        result
    }

    fn dimension_length(&self, group: GroupId, dim: DimId) -> Result<u64, StorageError> {
        let result = self.storage.dimension_length(group, dim);
        self.log(format_args!("dimension_length({group}, {dim}) -> {result:?}"))?;
        result
    }

    fn unlimited_dimension_ids(&self, group: GroupId) -> Result<Vec<DimId>, StorageError> {
        let result = self.storage.unlimited_dimension_ids(group);
        self.log(format_args!(
            "unlimited_dimension_ids({group}) -> {}",
            list(&result)
        ))?;
        result
    }

    fn variable_ids(&self, group: GroupId) -> Result<Vec<VarId>, StorageError> {
        let result = self.storage.variable_ids(group);
        self.log(format_args!("variable_ids({group}) -> {}", list(&result)))?;
        result
    }

    fn variable_name(&self, group: GroupId, var: VarId) -> Result<String, StorageError> {
        let result = self.storage.variable_name(group, var);
        self.log(format_args!("variable_name({group}, {var}) -> {result:?}"))?;
        result
    }

    fn variable_type(&self, group: GroupId, var: VarId) -> Result<TypeId, StorageError> {
        let result = self.storage.variable_type(group, var);
        self.log(format_args!("variable_type({group}, {var}) -> {result:?}"))?;
        result
    }

    fn variable_dimension_ids(
        &self,
        group: GroupId,
        var: VarId,
    ) -> Result<Vec<DimId>, StorageError> {
        let result = self.storage.variable_dimension_ids(group, var);
        self.log(format_args!(
            "variable_dimension_ids({group}, {var}) -> {}",
            list(&result)
        ))?;
        result
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> WritableStorageTraits
    for UsageLogStorageAdapter<TStorage>
{
    fn enter_define_mode(&self, group: GroupId) -> Result<(), StorageError> {
        let result = self.storage.enter_define_mode(group);
        self.log_definition(format_args!("enter_define_mode({group})"), result)
    }

    fn leave_define_mode(&self, group: GroupId) -> Result<(), StorageError> {
        let result = self.storage.leave_define_mode(group);
        self.log_definition(format_args!("leave_define_mode({group})"), result)
    }

    fn define_group(&self, parent: GroupId, name: &str) -> Result<GroupId, StorageError> {
        let result = self.storage.define_group(parent, name);
        self.log_definition(format_args!("define_group({parent}, {name})"), result)
    }

    fn define_dimension(
        &self,
        group: GroupId,
        name: &str,
        length: u64,
    ) -> Result<DimId, StorageError> {
        let result = self.storage.define_dimension(group, name, length);
        self.log_definition(
            format_args!("define_dimension({group}, {name}, {length})"),
            result,
        )
    }

    fn rename_dimension(
        &self,
        group: GroupId,
        dim: DimId,
        name: &str,
    ) -> Result<(), StorageError> {
        let result = self.storage.rename_dimension(group, dim, name);
        self.log_definition(
            format_args!("rename_dimension({group}, {dim}, {name})"),
            result,
        )
    }

    fn define_variable(
        &self,
        group: GroupId,
        name: &str,
        type_id: TypeId,
        dims: &[DimId],
    ) -> Result<VarId, StorageError> {
        let result = self.storage.define_variable(group, name, type_id, dims);
        self.log_definition(
            format_args!(
                "define_variable({group}, {name}, {type_id}, [{}])",
                dims.iter().format(", ")
            ),
            result,
        )
    }
}
