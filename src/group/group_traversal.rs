use std::sync::Arc;

use crate::{
    config::global_config,
    hierarchy_error::HierarchyError,
    storage::{GroupId, ReadableStorageTraits},
};

use super::{Group, Location};

pub(super) fn traversal_depth_limit() -> Option<usize> {
    global_config().traversal_depth_limit()
}

pub(super) fn check_depth(depth: usize, limit: Option<usize>) -> Result<(), HierarchyError> {
    match limit {
        Some(limit) if depth > limit => Err(HierarchyError::DepthLimitExceeded(limit)),
        _ => Ok(()),
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> Group<TStorage> {
    /// Returns the ancestors of the group, nearest first, ending with the root.
    pub(super) fn ancestors(&self, operation: &'static str) -> Result<Vec<Self>, HierarchyError> {
        let (storage, mut id) = self.live(operation)?;
        let limit = traversal_depth_limit();
        let mut ancestors = Vec::new();
        while let Some(parent) = storage.parent_group(id)? {
            check_depth(ancestors.len() + 1, limit)?;
            ancestors.push(Self::new(Arc::clone(storage), parent));
            id = parent;
        }
        Ok(ancestors)
    }

    /// Returns the immediate children of the group.
    pub(super) fn children(&self, operation: &'static str) -> Result<Vec<Self>, HierarchyError> {
        let (storage, id) = self.live(operation)?;
        let children = storage.child_groups(id)?;
        if !children.is_empty() {
            check_depth(1, traversal_depth_limit())?;
        }
        Ok(children
            .into_iter()
            .map(|child| Self::new(Arc::clone(storage), child))
            .collect())
    }

    /// Returns the descendants of the group.
    ///
    /// Immediate children are included if `immediate` is true, deeper descendants if `deeper` is true.
    /// Immediate children come first, then the descendants of each child in turn.
    pub(super) fn descendants(
        &self,
        operation: &'static str,
        immediate: bool,
        deeper: bool,
    ) -> Result<Vec<Self>, HierarchyError> {
        let (storage, id) = self.live(operation)?;
        let limit = traversal_depth_limit();
        let mut descendants = Vec::new();
        collect_descendants(storage, id, 1, limit, immediate, deeper, &mut descendants)?;
        Ok(descendants)
    }

    /// Returns the groups searched by a dimension or variable lookup under `location`.
    ///
    /// The current group comes first, then its ancestors nearest first, then its descendants.
    pub(super) fn scope(
        &self,
        operation: &'static str,
        location: Location,
    ) -> Result<Vec<Self>, HierarchyError> {
        let mut scope = Vec::new();
        if location.includes_current() {
            self.live(operation)?;
            scope.push(self.clone());
        }
        if location.includes_parents() {
            scope.extend(self.ancestors(operation)?);
        }
        if location.includes_children() {
            scope.extend(self.descendants(operation, true, true)?);
        }
        Ok(scope)
    }
}

fn collect_descendants<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &Arc<TStorage>,
    group: GroupId,
    depth: usize,
    limit: Option<usize>,
    immediate: bool,
    deeper: bool,
    descendants: &mut Vec<Group<TStorage>>,
) -> Result<(), HierarchyError> {
    let children = storage.child_groups(group)?;
    if children.is_empty() {
        return Ok(());
    }
    check_depth(depth, limit)?;
    if immediate {
        descendants.extend(
            children
                .iter()
                .map(|child| Group::new(Arc::clone(storage), *child)),
        );
    }
    if deeper {
        for child in children {
            collect_descendants(storage, child, depth + 1, limit, true, true, descendants)?;
        }
    }
    Ok(())
}
