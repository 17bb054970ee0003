//! Global configuration options.

use std::sync::OnceLock;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Global configuration options for the `netcdf4_hierarchy` crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Traversal Depth Limit
/// > default: [`None`]
///
/// The maximum number of group levels a lookup may walk above or below the group it starts from.
/// A lookup that would walk further fails with [`HierarchyError::DepthLimitExceeded`](crate::hierarchy_error::HierarchyError::DepthLimitExceeded).
///
/// The group hierarchy is a strict tree maintained by the storage, so no limit is needed for a well-behaved store.
/// Without a limit, a store reporting a cyclic hierarchy makes lookups recurse without bound.
#[derive(Debug)]
pub struct Config {
    traversal_depth_limit: Option<usize>,
}

#[allow(clippy::derivable_impls)]
impl Default for Config {
    fn default() -> Self {
        Config {
            traversal_depth_limit: None,
        }
    }
}

impl Config {
    /// Get the [traversal depth limit](#traversal-depth-limit) configuration.
    #[must_use]
    pub fn traversal_depth_limit(&self) -> Option<usize> {
        self.traversal_depth_limit
    }

    /// Set the [traversal depth limit](#traversal-depth-limit) configuration.
    pub fn set_traversal_depth_limit(&mut self, traversal_depth_limit: Option<usize>) {
        self.traversal_depth_limit = traversal_depth_limit;
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global configuration.
///
/// This function deadlocks if the global config is already mutably held by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default())).read()
}

/// Returns a mutable reference to the global configuration.
///
/// This function deadlocks if the global config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default())).write()
}
