//! An in-memory store.

use parking_lot::RwLock;

use crate::storage::{
    status::{
        NC_EBADDIM, NC_EBADGRPID, NC_EBADID, NC_EBADNAME, NC_EBADTYPE, NC_EDIMSIZE, NC_EINVAL,
        NC_ENAMEINUSE, NC_ENOTINDEFINE, NC_ENOTVAR,
    },
    DimId, GroupId, ReadableStorageTraits, StorageError, TypeId, VarId, WritableStorageTraits,
    UNLIMITED,
};

/// The largest atomic type id (string).
const MAX_ATOMIC_TYPE_ID: i32 = 12;

#[derive(Debug)]
struct GroupEntry {
    name: String,
    parent: Option<GroupId>,
    children: Vec<GroupId>,
    dimensions: Vec<DimId>,
    variables: Vec<VariableEntry>,
}

impl GroupEntry {
    fn new(name: &str, parent: Option<GroupId>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            dimensions: Vec::new(),
            variables: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct DimensionEntry {
    name: String,
    group: GroupId,
    length: u64,
    unlimited: bool,
}

#[derive(Debug)]
struct VariableEntry {
    name: String,
    type_id: TypeId,
    dimensions: Vec<DimId>,
}

#[derive(Debug)]
struct Dataset {
    groups: Vec<GroupEntry>,
    dimensions: Vec<DimensionEntry>,
    define_mode: bool,
    closed: bool,
}

fn new_id(len: usize) -> Result<i32, StorageError> {
    i32::try_from(len).map_err(|_| StorageError::from_status(NC_EINVAL))
}

fn check_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.contains('/') {
        Err(StorageError::from_status(NC_EBADNAME))
    } else {
        Ok(())
    }
}

impl Dataset {
    fn check_open(&self) -> Result<(), StorageError> {
        if self.closed {
            Err(StorageError::from_status(NC_EBADID))
        } else {
            Ok(())
        }
    }

    fn check_define_mode(&self) -> Result<(), StorageError> {
        if self.define_mode {
            Ok(())
        } else {
            Err(StorageError::from_status(NC_ENOTINDEFINE))
        }
    }

    fn group(&self, group: GroupId) -> Result<&GroupEntry, StorageError> {
        self.check_open()?;
        usize::try_from(group.0)
            .ok()
            .and_then(|index| self.groups.get(index))
            .ok_or_else(|| StorageError::from_status(NC_EBADGRPID))
    }

    fn group_mut(&mut self, group: GroupId) -> Result<&mut GroupEntry, StorageError> {
        self.check_open()?;
        usize::try_from(group.0)
            .ok()
            .and_then(|index| self.groups.get_mut(index))
            .ok_or_else(|| StorageError::from_status(NC_EBADGRPID))
    }

    fn dimension(&self, dim: DimId) -> Result<&DimensionEntry, StorageError> {
        usize::try_from(dim.0)
            .ok()
            .and_then(|index| self.dimensions.get(index))
            .ok_or_else(|| StorageError::from_status(NC_EBADDIM))
    }

    fn variable(&self, group: GroupId, var: VarId) -> Result<&VariableEntry, StorageError> {
        let group = self.group(group)?;
        usize::try_from(var.0)
            .ok()
            .and_then(|index| group.variables.get(index))
            .ok_or_else(|| StorageError::from_status(NC_ENOTVAR))
    }

    /// The ids of `group` and its ancestors, nearest first.
    fn lineage(&self, group: GroupId) -> Result<Vec<GroupId>, StorageError> {
        let mut lineage = vec![group];
        let mut parent = self.group(group)?.parent;
        while let Some(id) = parent {
            lineage.push(id);
            parent = self.group(id)?.parent;
        }
        Ok(lineage)
    }

    /// Returns the dimension `dim` if it is defined in `group` or one of its ancestors.
    fn visible_dimension(
        &self,
        group: GroupId,
        dim: DimId,
    ) -> Result<&DimensionEntry, StorageError> {
        let lineage = self.lineage(group)?;
        let entry = self.dimension(dim)?;
        if lineage.contains(&entry.group) {
            Ok(entry)
        } else {
            Err(StorageError::from_status(NC_EBADDIM))
        }
    }

    fn child_or_variable_named(&self, group: &GroupEntry, name: &str) -> Result<bool, StorageError> {
        for child in &group.children {
            if self.group(*child)?.name == name {
                return Ok(true);
            }
        }
        Ok(group.variables.iter().any(|variable| variable.name == name))
    }
}

/// An in-memory store.
///
/// A single dataset held in memory, with the validation behaviour of a netCDF-4 file opened by the netCDF-C library:
///  - it starts in define mode, and definitions outside define mode fail with [`NC_ENOTINDEFINE`],
///  - names must be non-empty and must not contain `/` ([`NC_EBADNAME`]),
///  - group and variable names share a namespace within their parent group, dimension names are unique within their group ([`NC_ENAMEINUSE`]),
///  - a variable may only use dimensions defined in its group or an ancestor ([`NC_EBADDIM`]),
///  - a variable must have an atomic data type ([`NC_EBADTYPE`]).
///
/// After [`close`](MemoryStore::close), every call fails with [`NC_EBADID`].
#[derive(Debug)]
pub struct MemoryStore {
    dataset: RwLock<Dataset>,
}

impl MemoryStore {
    /// Create a new memory store holding an empty root group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dataset: RwLock::new(Dataset {
                groups: vec![GroupEntry::new("/", None)],
                dimensions: Vec::new(),
                define_mode: true,
                closed: false,
            }),
        }
    }

    /// Close the dataset.
    ///
    /// Handles obtained from the store remain constructible, but every storage call made through them fails afterwards.
    pub fn close(&self) {
        self.dataset.write().closed = true;
    }

    /// Returns true if the dataset is in define mode.
    #[must_use]
    pub fn is_define_mode(&self) -> bool {
        self.dataset.read().define_mode
    }

    /// Append `count` records along the unlimited dimension `dim`, returning its new length.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is closed, `dim` is not valid, or `dim` is not unlimited.
    pub fn append_records(&self, dim: DimId, count: u64) -> Result<u64, StorageError> {
        let mut dataset = self.dataset.write();
        dataset.check_open()?;
        let index = usize::try_from(dim.0)
            .ok()
            .filter(|index| *index < dataset.dimensions.len())
            .ok_or_else(|| StorageError::from_status(NC_EBADDIM))?;
        let entry = &mut dataset.dimensions[index];
        if !entry.unlimited {
            return Err(StorageError::from_status(NC_EINVAL));
        }
        entry.length = entry
            .length
            .checked_add(count)
            .filter(|length| i64::try_from(*length).is_ok())
            .ok_or_else(|| StorageError::from_status(NC_EDIMSIZE))?;
        Ok(entry.length)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadableStorageTraits for MemoryStore {
    fn root_group(&self) -> Result<GroupId, StorageError> {
        self.dataset.read().check_open()?;
        Ok(GroupId(0))
    }

    fn child_groups(&self, group: GroupId) -> Result<Vec<GroupId>, StorageError> {
        Ok(self.dataset.read().group(group)?.children.clone())
    }

    fn group_name(&self, group: GroupId) -> Result<String, StorageError> {
        Ok(self.dataset.read().group(group)?.name.clone())
    }

    fn group_full_name(&self, group: GroupId) -> Result<String, StorageError> {
        let dataset = self.dataset.read();
        let lineage = dataset.lineage(group)?;
        let mut names = Vec::with_capacity(lineage.len());
        for id in lineage.iter().rev().skip(1) {
            names.push(dataset.group(*id)?.name.as_str());
        }
        Ok(format!("/{}", names.join("/")))
    }

    fn parent_group(&self, group: GroupId) -> Result<Option<GroupId>, StorageError> {
        Ok(self.dataset.read().group(group)?.parent)
    }

    fn dimension_ids(
        &self,
        group: GroupId,
        include_parents: bool,
    ) -> Result<Vec<DimId>, StorageError> {
        let dataset = self.dataset.read();
        if include_parents {
            let mut dims = Vec::new();
            for id in dataset.lineage(group)? {
                dims.extend_from_slice(&dataset.group(id)?.dimensions);
            }
            Ok(dims)
        } else {
            Ok(dataset.group(group)?.dimensions.clone())
        }
    }

    fn dimension_name(&self, group: GroupId, dim: DimId) -> Result<String, StorageError> {
        Ok(self
            .dataset
            .read()
            .visible_dimension(group, dim)?
            .name
            .clone())
    }

    fn dimension_length(&self, group: GroupId, dim: DimId) -> Result<u64, StorageError> {
        Ok(self.dataset.read().visible_dimension(group, dim)?.length)
    }

    fn unlimited_dimension_ids(&self, group: GroupId) -> Result<Vec<DimId>, StorageError> {
        let dataset = self.dataset.read();
        let mut dims = Vec::new();
        for dim in &dataset.group(group)?.dimensions {
            if dataset.dimension(*dim)?.unlimited {
                dims.push(*dim);
            }
        }
        Ok(dims)
    }

    fn variable_ids(&self, group: GroupId) -> Result<Vec<VarId>, StorageError> {
        let count = self.dataset.read().group(group)?.variables.len();
        (0..count).map(|index| Ok(VarId(new_id(index)?))).collect()
    }

    fn variable_name(&self, group: GroupId, var: VarId) -> Result<String, StorageError> {
        Ok(self.dataset.read().variable(group, var)?.name.clone())
    }

    fn variable_type(&self, group: GroupId, var: VarId) -> Result<TypeId, StorageError> {
        Ok(self.dataset.read().variable(group, var)?.type_id)
    }

    fn variable_dimension_ids(
        &self,
        group: GroupId,
        var: VarId,
    ) -> Result<Vec<DimId>, StorageError> {
        Ok(self.dataset.read().variable(group, var)?.dimensions.clone())
    }
}

impl WritableStorageTraits for MemoryStore {
    fn enter_define_mode(&self, group: GroupId) -> Result<(), StorageError> {
        let mut dataset = self.dataset.write();
        dataset.group(group)?;
        dataset.define_mode = true;
        Ok(())
    }

    fn leave_define_mode(&self, group: GroupId) -> Result<(), StorageError> {
        let mut dataset = self.dataset.write();
        dataset.group(group)?;
        dataset.define_mode = false;
        Ok(())
    }

    fn define_group(&self, parent: GroupId, name: &str) -> Result<GroupId, StorageError> {
        let mut dataset = self.dataset.write();
        let parent_entry = dataset.group(parent)?;
        dataset.check_define_mode()?;
        check_name(name)?;
        if dataset.child_or_variable_named(parent_entry, name)? {
            return Err(StorageError::from_status(NC_ENAMEINUSE));
        }
        let id = GroupId(new_id(dataset.groups.len())?);
        dataset.groups.push(GroupEntry::new(name, Some(parent)));
        dataset.group_mut(parent)?.children.push(id);
        Ok(id)
    }

    fn define_dimension(
        &self,
        group: GroupId,
        name: &str,
        length: u64,
    ) -> Result<DimId, StorageError> {
        let mut dataset = self.dataset.write();
        let group_entry = dataset.group(group)?;
        dataset.check_define_mode()?;
        check_name(name)?;
        for dim in &group_entry.dimensions {
            if dataset.dimension(*dim)?.name == name {
                return Err(StorageError::from_status(NC_ENAMEINUSE));
            }
        }
        if i64::try_from(length).is_err() {
            return Err(StorageError::from_status(NC_EDIMSIZE));
        }
        let id = DimId(new_id(dataset.dimensions.len())?);
        dataset.dimensions.push(DimensionEntry {
            name: name.to_string(),
            group,
            length,
            unlimited: length == UNLIMITED,
        });
        dataset.group_mut(group)?.dimensions.push(id);
        Ok(id)
    }

    fn rename_dimension(
        &self,
        group: GroupId,
        dim: DimId,
        name: &str,
    ) -> Result<(), StorageError> {
        let mut dataset = self.dataset.write();
        let group_entry = dataset.group(group)?;
        dataset.check_define_mode()?;
        check_name(name)?;
        if !group_entry.dimensions.contains(&dim) {
            return Err(StorageError::from_status(NC_EBADDIM));
        }
        for other in &group_entry.dimensions {
            if *other != dim && dataset.dimension(*other)?.name == name {
                return Err(StorageError::from_status(NC_ENAMEINUSE));
            }
        }
        let index = usize::try_from(dim.0).map_err(|_| StorageError::from_status(NC_EBADDIM))?;
        if let Some(entry) = dataset.dimensions.get_mut(index) {
            entry.name = name.to_string();
        }
        Ok(())
    }

    fn define_variable(
        &self,
        group: GroupId,
        name: &str,
        type_id: TypeId,
        dims: &[DimId],
    ) -> Result<VarId, StorageError> {
        let mut dataset = self.dataset.write();
        let group_entry = dataset.group(group)?;
        dataset.check_define_mode()?;
        check_name(name)?;
        if dataset.child_or_variable_named(group_entry, name)? {
            return Err(StorageError::from_status(NC_ENAMEINUSE));
        }
        if !(1..=MAX_ATOMIC_TYPE_ID).contains(&type_id.0) {
            return Err(StorageError::from_status(NC_EBADTYPE));
        }
        for dim in dims {
            dataset.visible_dimension(group, *dim)?;
        }
        let group_entry = dataset.group_mut(group)?;
        let id = VarId(new_id(group_entry.variables.len())?);
        group_entry.variables.push(VariableEntry {
            name: name.to_string(),
            type_id,
            dimensions: dims.to_vec(),
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn memory_groups() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let root = store.root_group()?;
        let usa = store.define_group(root, "USA")?;
        let wyoming = store.define_group(usa, "Wyoming")?;
        assert_eq!(store.child_groups(root)?, vec![usa]);
        assert_eq!(store.group_name(root)?, "/");
        assert_eq!(store.group_full_name(root)?, "/");
        assert_eq!(store.group_full_name(wyoming)?, "/USA/Wyoming");
        assert_eq!(store.parent_group(wyoming)?, Some(usa));
        assert_eq!(store.parent_group(root)?, None);
        assert_eq!(
            store.define_group(root, "USA").unwrap_err().code(),
            Some(NC_ENAMEINUSE)
        );
        assert_eq!(
            store.define_group(root, "a/b").unwrap_err().code(),
            Some(NC_EBADNAME)
        );
        assert_eq!(
            store.child_groups(GroupId(99)).unwrap_err().code(),
            Some(NC_EBADGRPID)
        );
        Ok(())
    }

    #[test]
    fn memory_dimensions() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let root = store.root_group()?;
        let usa = store.define_group(root, "USA")?;
        let alaska = store.define_group(usa, "Alaska")?;
        let time = store.define_dimension(usa, "time", 2)?;
        let stations = store.define_dimension(alaska, "stations", 3)?;
        let record = store.define_dimension(alaska, "record", UNLIMITED)?;
        assert_eq!(store.dimension_ids(alaska, false)?, vec![stations, record]);
        assert_eq!(
            store.dimension_ids(alaska, true)?,
            vec![stations, record, time]
        );
        assert_eq!(store.dimension_length(alaska, time)?, 2);
        assert_eq!(store.dimension_name(alaska, time)?, "time");
        assert_eq!(
            store.dimension_length(usa, stations).unwrap_err().code(),
            Some(NC_EBADDIM)
        );
        assert_eq!(store.unlimited_dimension_ids(alaska)?, vec![record]);
        assert_eq!(store.append_records(record, 3)?, 3);
        assert_eq!(store.dimension_length(alaska, record)?, 3);
        assert_eq!(
            store.append_records(time, 1).unwrap_err().code(),
            Some(NC_EINVAL)
        );
        assert_eq!(
            store.define_dimension(usa, "time", 4).unwrap_err().code(),
            Some(NC_ENAMEINUSE)
        );
        assert_eq!(
            store.define_dimension(usa, "huge", u64::MAX).unwrap_err().code(),
            Some(NC_EDIMSIZE)
        );
        store.rename_dimension(usa, time, "t")?;
        assert_eq!(store.dimension_name(usa, time)?, "t");
        Ok(())
    }

    #[test]
    fn memory_variables() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let root = store.root_group()?;
        let usa = store.define_group(root, "USA")?;
        let colorado = store.define_group(usa, "Colorado")?;
        let time = store.define_dimension(usa, "time", 2)?;
        let stations = store.define_dimension(colorado, "stations", 5)?;
        let var = store.define_variable(colorado, "temperature", TypeId(5), &[time, stations])?;
        assert_eq!(store.variable_ids(colorado)?, vec![var]);
        assert_eq!(store.variable_name(colorado, var)?, "temperature");
        assert_eq!(store.variable_type(colorado, var)?, TypeId(5));
        assert_eq!(
            store.variable_dimension_ids(colorado, var)?,
            vec![time, stations]
        );
        assert_eq!(
            store
                .define_variable(usa, "bad_dim", TypeId(5), &[stations])
                .unwrap_err()
                .code(),
            Some(NC_EBADDIM)
        );
        assert_eq!(
            store
                .define_variable(usa, "bad_type", TypeId(32), &[])
                .unwrap_err()
                .code(),
            Some(NC_EBADTYPE)
        );
        assert_eq!(
            store
                .define_variable(root, "USA", TypeId(5), &[])
                .unwrap_err()
                .code(),
            Some(NC_ENAMEINUSE)
        );
        assert_eq!(
            store.variable_name(usa, VarId(0)).unwrap_err().code(),
            Some(NC_ENOTVAR)
        );
        Ok(())
    }

    #[test]
    fn memory_define_mode() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let root = store.root_group()?;
        assert!(store.is_define_mode());
        store.leave_define_mode(root)?;
        assert_eq!(
            store.define_dimension(root, "x", 1).unwrap_err().code(),
            Some(NC_ENOTINDEFINE)
        );
        store.enter_define_mode(root)?;
        store.enter_define_mode(root)?;
        store.define_dimension(root, "x", 1)?;
        Ok(())
    }

    #[test]
    fn memory_close() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let root = store.root_group()?;
        store.close();
        assert_eq!(store.root_group().unwrap_err().code(), Some(NC_EBADID));
        assert_eq!(store.group_name(root).unwrap_err().code(), Some(NC_EBADID));
        Ok(())
    }
}
