//! netCDF-4 groups.
//!
//! A group is a node in the group hierarchy of a dataset.
//! It can hold dimensions, variables and child groups.
//! The root group is named `/`.
//!
//! Every lookup takes a policy selecting which groups are searched:
//!  - [`Location`] for dimensions and variables: the current group, its ancestors, its descendants, or a combination,
//!  - [`GroupLocation`] for groups, which also separates immediate children from deeper descendants.
//!
//! A lookup collects every match into a [`NameMultimap`], so an entity shadowed by one of the same name in a nearer group is still retrievable.
//! Singular lookups such as [`Group::dimension`] return the first match, which is the one found in the nearest searched group, or a null handle if nothing matches.
//!
//! Lookups are not cached. Each call walks the hierarchy through the storage again, so a lookup always reflects the current state of the dataset.

mod group_traversal;
mod location;
mod variable_definition;

use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use indexmap::IndexSet;

use self::group_traversal::{check_depth, traversal_depth_limit};

use crate::{
    data_type::Type,
    dimension::Dimension,
    hierarchy_error::{EntityKind, HierarchyError, NullHandleError},
    multimap::NameMultimap,
    storage::{GroupId, ReadableStorageTraits, ReadableWritableStorageTraits, UNLIMITED},
    variable::Variable,
};

pub use self::{
    location::{GroupLocation, Location},
    variable_definition::{DimRef, DimsRef, TypeRef},
};

/// A group handle.
///
/// A handle is either null or identifies a group in the storage it was obtained from.
/// Handles are cheap to clone and compare equal if they identify the same group.
pub struct Group<TStorage: ?Sized> {
    handle: Option<(Arc<TStorage>, GroupId)>,
}

impl<TStorage: ?Sized> Group<TStorage> {
    /// Create a handle to group `id` of `storage`.
    #[must_use]
    pub fn new(storage: Arc<TStorage>, id: GroupId) -> Self {
        Self {
            handle: Some((storage, id)),
        }
    }

    /// Create a null group handle.
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

    /// Returns the storage id of the group.
    ///
    /// # Errors
    /// Returns [`HierarchyError::NullHandle`] if the handle is null.
    pub fn id(&self) -> Result<GroupId, HierarchyError> {
        Ok(self.live("id")?.1)
    }

    /// Returns the storage of the group.
    ///
    /// # Errors
    /// Returns [`HierarchyError::NullHandle`] if the handle is null.
    pub fn storage(&self) -> Result<Arc<TStorage>, HierarchyError> {
        Ok(Arc::clone(self.live("storage")?.0))
    }

    pub(crate) fn live(
        &self,
        operation: &'static str,
    ) -> Result<(&Arc<TStorage>, GroupId), NullHandleError> {
        self.handle
            .as_ref()
            .map(|(storage, id)| (storage, *id))
            .ok_or_else(|| NullHandleError::new(EntityKind::Group, operation))
    }
}

impl<TStorage: ?Sized> Clone for Group<TStorage> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<TStorage: ?Sized> core::fmt::Debug for Group<TStorage> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.handle {
            Some((_, id)) => write!(f, "Group({id})"),
            None => write!(f, "Group(null)"),
        }
    }
}

impl<TStorage: ?Sized> PartialEq for Group<TStorage> {
    fn eq(&self, other: &Self) -> bool {
        self.handle.as_ref().map(|(_, id)| id) == other.handle.as_ref().map(|(_, id)| id)
    }
}

impl<TStorage: ?Sized> Eq for Group<TStorage> {}

impl<TStorage: ?Sized> Hash for Group<TStorage> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.as_ref().map(|(_, id)| id).hash(state);
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> Group<TStorage> {
    /// Open the root group of `storage`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError::StorageError`] if the root group cannot be retrieved.
    pub fn open_root(storage: Arc<TStorage>) -> Result<Self, HierarchyError> {
        let id = storage.root_group()?;
        Ok(Self::new(storage, id))
    }

    /// Returns the local name of the group.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn name(&self) -> Result<String, HierarchyError> {
        let (storage, id) = self.live("name")?;
        Ok(storage.group_name(id)?)
    }

    /// Returns the full name of the group, e.g. `/USA/Wyoming`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn full_name(&self) -> Result<String, HierarchyError> {
        let (storage, id) = self.live("full_name")?;
        Ok(storage.group_full_name(id)?)
    }

    /// Returns true if this is the root group.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn is_root(&self) -> Result<bool, HierarchyError> {
        self.live("is_root")?;
        Ok(self.name()? == "/")
    }

    /// Returns the parent group, or a null handle if this is the root group.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null or there is a storage error.
    pub fn parent_group(&self) -> Result<Self, HierarchyError> {
        let (storage, id) = self.live("parent_group")?;
        Ok(match storage.parent_group(id)? {
            Some(parent) => Self::new(Arc::clone(storage), parent),
            None => Self::null(),
        })
    }

    /// Returns the number of groups selected by `location`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn group_count(&self, location: GroupLocation) -> Result<usize, HierarchyError> {
        self.live("group_count")?;
        let mut count = 0;
        if location.includes_current() {
            count += 1;
        }
        if location.includes_children() {
            count += self.children("group_count")?.len();
        }
        if location.includes_parents() {
            count += self.ancestors("group_count")?.len();
        }
        if location.includes_children_of_children() {
            count += self.descendants("group_count", false, true)?.len();
        }
        Ok(count)
    }

    /// Returns the groups selected by `location`, by name.
    ///
    /// Groups are inserted in the order: the current group, immediate children, ancestors nearest first, deeper descendants.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn groups_multimap(
        &self,
        location: GroupLocation,
    ) -> Result<NameMultimap<Self>, HierarchyError> {
        const OPERATION: &str = "groups_multimap";
        self.live(OPERATION)?;
        let mut selected = Vec::new();
        if location.includes_current() {
            selected.push(self.clone());
        }
        if location.includes_children() {
            selected.extend(self.children(OPERATION)?);
        }
        if location.includes_parents() {
            selected.extend(self.ancestors(OPERATION)?);
        }
        if location.includes_children_of_children() {
            selected.extend(self.descendants(OPERATION, false, true)?);
        }

        let mut groups = NameMultimap::new();
        for group in selected {
            groups.add(group.name()?, group);
        }
        Ok(groups)
    }

    /// Returns the group named `name` selected by `location`.
    ///
    /// If several groups match, the first found is returned.
    /// Returns a null handle if no group matches.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn group(&self, name: &str, location: GroupLocation) -> Result<Self, HierarchyError> {
        self.live("group")?;
        Ok(self
            .groups_multimap(location)?
            .first(name)
            .cloned()
            .unwrap_or_else(Self::null))
    }

    /// Returns all groups named `name` selected by `location`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn groups(
        &self,
        name: &str,
        location: GroupLocation,
    ) -> Result<IndexSet<Self>, HierarchyError> {
        self.live("groups")?;
        Ok(self
            .groups_multimap(location)?
            .equal_range(name)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns the number of dimensions defined in the groups selected by `location`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn dimension_count(&self, location: Location) -> Result<usize, HierarchyError> {
        const OPERATION: &str = "dimension_count";
        let mut count = 0;
        for group in self.scope(OPERATION, location)? {
            let (storage, id) = group.live(OPERATION)?;
            count += storage.dimension_count(id)?;
        }
        Ok(count)
    }

    /// Returns the dimensions defined in the groups selected by `location`, by name.
    ///
    /// Dimensions of the current group come first, then those of ancestors nearest first, then those of descendants.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn dimensions_multimap(
        &self,
        location: Location,
    ) -> Result<NameMultimap<Dimension<TStorage>>, HierarchyError> {
        const OPERATION: &str = "dimensions_multimap";
        let mut dimensions = NameMultimap::new();
        for group in self.scope(OPERATION, location)? {
            let (storage, id) = group.live(OPERATION)?;
            for dim in storage.dimension_ids(id, false)? {
                let name = storage.dimension_name(id, dim)?;
                dimensions.add(name, Dimension::new(Arc::clone(storage), id, dim));
            }
        }
        Ok(dimensions)
    }

    /// Returns the dimension named `name` defined in the groups selected by `location`.
    ///
    /// If several dimensions match, the one in the nearest searched group is returned.
    /// Returns a null handle if no dimension matches.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn dimension(
        &self,
        name: &str,
        location: Location,
    ) -> Result<Dimension<TStorage>, HierarchyError> {
        self.live("dimension")?;
        Ok(self
            .dimensions_multimap(location)?
            .first(name)
            .cloned()
            .unwrap_or_else(Dimension::null))
    }

    /// Returns all dimensions named `name` defined in the groups selected by `location`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn dimensions(
        &self,
        name: &str,
        location: Location,
    ) -> Result<IndexSet<Dimension<TStorage>>, HierarchyError> {
        self.live("dimensions")?;
        Ok(self
            .dimensions_multimap(location)?
            .equal_range(name)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns the number of variables defined in the groups selected by `location`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn variable_count(&self, location: Location) -> Result<usize, HierarchyError> {
        const OPERATION: &str = "variable_count";
        let mut count = 0;
        for group in self.scope(OPERATION, location)? {
            let (storage, id) = group.live(OPERATION)?;
            count += storage.variable_count(id)?;
        }
        Ok(count)
    }

    /// Returns the variables defined in the groups selected by `location`, by name.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn variables_multimap(
        &self,
        location: Location,
    ) -> Result<NameMultimap<Variable<TStorage>>, HierarchyError> {
        const OPERATION: &str = "variables_multimap";
        let mut variables = NameMultimap::new();
        for group in self.scope(OPERATION, location)? {
            let (storage, id) = group.live(OPERATION)?;
            for var in storage.variable_ids(id)? {
                let name = storage.variable_name(id, var)?;
                variables.add(name, Variable::new(Arc::clone(storage), id, var));
            }
        }
        Ok(variables)
    }

    /// Returns the variable named `name` defined in the groups selected by `location`.
    ///
    /// If several variables match, the one in the nearest searched group is returned.
    /// Returns a null handle if no variable matches.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn variable(
        &self,
        name: &str,
        location: Location,
    ) -> Result<Variable<TStorage>, HierarchyError> {
        self.live("variable")?;
        Ok(self
            .variables_multimap(location)?
            .first(name)
            .cloned()
            .unwrap_or_else(Variable::null))
    }

    /// Returns all variables named `name` defined in the groups selected by `location`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn variables(
        &self,
        name: &str,
        location: Location,
    ) -> Result<IndexSet<Variable<TStorage>>, HierarchyError> {
        self.live("variables")?;
        Ok(self
            .variables_multimap(location)?
            .equal_range(name)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns the data type named `name`, or a null type if no atomic type has that name.
    ///
    /// User-defined types are not supported.
    ///
    /// # Errors
    /// Returns [`HierarchyError::NullHandle`] if the handle is null.
    pub fn type_named(&self, name: &str) -> Result<Type, HierarchyError> {
        self.live("type_named")?;
        Ok(Type::from_name(name).unwrap_or_default())
    }

    /// Return a tree representation of the hierarchy below this group as a string.
    ///
    /// Dimensions are annotated with their length and variables with their dimensions and data type.
    /// For example:
    /// ```text
    /// /
    ///   USA
    ///     time = 2
    ///     Colorado
    ///       stations = 5
    ///       average_temperature [time, stations] float
    /// ```
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the traversal depth limit is exceeded, or there is a storage error.
    pub fn hierarchy_tree(&self) -> Result<String, HierarchyError> {
        fn update_tree<TStorage: ?Sized + ReadableStorageTraits>(
            string: &mut String,
            group: &Group<TStorage>,
            depth: usize,
            limit: Option<usize>,
        ) -> Result<(), HierarchyError> {
            let (storage, id) = group.live("hierarchy_tree")?;
            let indent = " ".repeat(depth * 2);
            string.push_str(&indent);
            string.push_str(&group.name()?);
            string.push('\n');

            let unlimited = storage.unlimited_dimension_ids(id)?;
            for dim in storage.dimension_ids(id, false)? {
                let name = storage.dimension_name(id, dim)?;
                let length = storage.dimension_length(id, dim)?;
                if unlimited.contains(&dim) {
                    string.push_str(&format!("{indent}  {name} = UNLIMITED ({length})\n"));
                } else {
                    string.push_str(&format!("{indent}  {name} = {length}\n"));
                }
            }
            for var in storage.variable_ids(id)? {
                let variable = Variable::new(Arc::clone(storage), id, var);
                let dimension_names = variable
                    .dimensions()?
                    .iter()
                    .map(Dimension::name)
                    .collect::<Result<Vec<_>, _>>()?;
                string.push_str(&format!(
                    "{indent}  {} [{}] {}\n",
                    variable.name()?,
                    dimension_names.join(", "),
                    variable.variable_type()?
                ));
            }
            let children = storage.child_groups(id)?;
            if !children.is_empty() {
                check_depth(depth + 1, limit)?;
            }
            for child in children {
                update_tree(string, &Group::new(Arc::clone(storage), child), depth + 1, limit)?;
            }
            Ok(())
        }

        let mut string = String::default();
        update_tree(&mut string, self, 0, traversal_depth_limit())?;
        Ok(string)
    }
}

impl<TStorage: ?Sized + ReadableWritableStorageTraits> Group<TStorage> {
    /// Add a child group named `name`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, or the storage rejects the definition (e.g. the name is in use).
    pub fn add_group(&self, name: &str) -> Result<Self, HierarchyError> {
        let (storage, id) = self.live("add_group")?;
        storage.enter_define_mode(id)?;
        let child = storage.define_group(id, name)?;
        Ok(Self::new(Arc::clone(storage), child))
    }

    /// Add a dimension named `name` with length `size`.
    ///
    /// A `size` of [`UNLIMITED`] defines an unlimited dimension.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, or the storage rejects the definition (e.g. the name is in use or the size is invalid).
    pub fn add_dimension(
        &self,
        name: &str,
        size: u64,
    ) -> Result<Dimension<TStorage>, HierarchyError> {
        let (storage, id) = self.live("add_dimension")?;
        storage.enter_define_mode(id)?;
        let dim = storage.define_dimension(id, name, size)?;
        Ok(Dimension::new(Arc::clone(storage), id, dim))
    }

    /// Add an unlimited dimension named `name`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, or the storage rejects the definition.
    pub fn add_unlimited_dimension(
        &self,
        name: &str,
    ) -> Result<Dimension<TStorage>, HierarchyError> {
        let (storage, id) = self.live("add_unlimited_dimension")?;
        storage.enter_define_mode(id)?;
        let dim = storage.define_dimension(id, name, UNLIMITED)?;
        Ok(Dimension::new(Arc::clone(storage), id, dim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{status::NC_ENAMEINUSE, store::MemoryStore};
    use std::error::Error;

    #[test]
    fn group_names() -> Result<(), Box<dyn Error>> {
        let root = Group::open_root(Arc::new(MemoryStore::new()))?;
        assert!(root.is_root()?);
        assert_eq!(root.name()?, "/");
        let usa = root.add_group("USA")?;
        let colorado = usa.add_group("Colorado")?;
        assert!(!colorado.is_root()?);
        assert_eq!(colorado.name()?, "Colorado");
        assert_eq!(colorado.full_name()?, "/USA/Colorado");
        assert_eq!(colorado.parent_group()?, usa);
        assert!(root.parent_group()?.is_null());
        Ok(())
    }

    #[test]
    fn group_add_duplicate() -> Result<(), Box<dyn Error>> {
        let root = Group::open_root(Arc::new(MemoryStore::new()))?;
        root.add_group("USA")?;
        let err = root.add_group("USA").unwrap_err();
        let HierarchyError::StorageError(err) = err else {
            panic!("expected a storage error")
        };
        assert_eq!(err.code(), Some(NC_ENAMEINUSE));
        Ok(())
    }

    #[test]
    fn group_null() {
        let group = Group::<MemoryStore>::null();
        assert!(group.is_null());
        assert_eq!(
            group.name().unwrap_err().to_string(),
            "attempt to invoke name on a null group"
        );
        assert_eq!(
            group.add_group("a").unwrap_err().to_string(),
            "attempt to invoke add_group on a null group"
        );
        assert!(group.groups_multimap(GroupLocation::All).is_err());
        assert!(group.dimension("time", Location::All).is_err());
        assert!(group.id().is_err());
    }

    #[test]
    fn group_set_null() -> Result<(), Box<dyn Error>> {
        let mut root = Group::open_root(Arc::new(MemoryStore::new()))?;
        assert!(!root.is_null());
        root.set_null();
        assert!(root.is_null());
        assert_eq!(root, Group::null());
        Ok(())
    }

    #[test]
    fn group_type_named() -> Result<(), Box<dyn Error>> {
        let root = Group::open_root(Arc::new(MemoryStore::new()))?;
        assert_eq!(root.type_named("double")?, Type::DOUBLE);
        assert!(root.type_named("quaternion")?.is_null());
        assert!(Group::<MemoryStore>::null().type_named("double").is_err());
        Ok(())
    }

    #[test]
    fn group_hierarchy_tree() -> Result<(), Box<dyn Error>> {
        let root = Group::open_root(Arc::new(MemoryStore::new()))?;
        let usa = root.add_group("USA")?;
        usa.add_dimension("time", 2)?;
        let colorado = usa.add_group("Colorado")?;
        colorado.add_dimension("stations", 5)?;
        colorado.add_unlimited_dimension("record")?;
        colorado.add_variable(
            "average_temperature",
            Type::FLOAT,
            ["time", "stations"],
        )?;
        colorado.add_scalar_variable("elevation", "double")?;
        assert_eq!(
            root.hierarchy_tree()?,
            "/
  USA
    time = 2
    Colorado
      stations = 5
      record = UNLIMITED (0)
      average_temperature [time, stations] float
      elevation [] double
"
        );
        Ok(())
    }
}
