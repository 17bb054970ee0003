use derive_more::Display;

/// Selects the groups whose dimensions or variables a lookup searches.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Location {
    /// The current group.
    Current,
    /// The ancestors of the current group, up to and including the root.
    Parents,
    /// The descendants of the current group, at any depth.
    Children,
    /// The current group and its ancestors.
    ParentsAndCurrent,
    /// The current group and its descendants.
    ChildrenAndCurrent,
    /// The current group, its ancestors and its descendants.
    All,
}

impl Location {
    /// Returns true if the current group is searched.
    #[must_use]
    pub const fn includes_current(self) -> bool {
        matches!(
            self,
            Self::Current | Self::ParentsAndCurrent | Self::ChildrenAndCurrent | Self::All
        )
    }

    /// Returns true if the ancestors of the current group are searched.
    #[must_use]
    pub const fn includes_parents(self) -> bool {
        matches!(self, Self::Parents | Self::ParentsAndCurrent | Self::All)
    }

    /// Returns true if the descendants of the current group are searched.
    #[must_use]
    pub const fn includes_children(self) -> bool {
        matches!(self, Self::Children | Self::ChildrenAndCurrent | Self::All)
    }
}

/// Selects the groups returned by a group lookup.
///
/// Unlike [`Location`], immediate children and deeper descendants can be selected separately.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum GroupLocation {
    /// The immediate children of the current group.
    Children,
    /// The ancestors of the current group, up to and including the root.
    Parents,
    /// The descendants of the immediate children of the current group, at any depth.
    ChildrenOfChildren,
    /// The descendants of the current group, at any depth.
    AllChildren,
    /// The current group and its ancestors.
    ParentsAndCurrent,
    /// The current group, its ancestors and its descendants.
    All,
}

impl GroupLocation {
    /// Returns true if the current group is selected.
    #[must_use]
    pub const fn includes_current(self) -> bool {
        matches!(self, Self::ParentsAndCurrent | Self::All)
    }

    /// Returns true if the ancestors of the current group are selected.
    #[must_use]
    pub const fn includes_parents(self) -> bool {
        matches!(self, Self::Parents | Self::ParentsAndCurrent | Self::All)
    }

    /// Returns true if the immediate children of the current group are selected.
    #[must_use]
    pub const fn includes_children(self) -> bool {
        matches!(self, Self::Children | Self::AllChildren | Self::All)
    }

    /// Returns true if the descendants of the immediate children of the current group are selected.
    #[must_use]
    pub const fn includes_children_of_children(self) -> bool {
        matches!(
            self,
            Self::ChildrenOfChildren | Self::AllChildren | Self::All
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_policies() {
        assert!(Location::All.includes_current());
        assert!(Location::All.includes_parents());
        assert!(Location::All.includes_children());
        assert!(!Location::Parents.includes_current());
        assert!(!Location::ChildrenAndCurrent.includes_parents());
        assert!(!Location::ParentsAndCurrent.includes_children());
        assert_eq!(Location::ParentsAndCurrent.to_string(), "ParentsAndCurrent");
    }

    #[test]
    fn group_location_policies() {
        assert!(!GroupLocation::Children.includes_current());
        assert!(GroupLocation::Children.includes_children());
        assert!(!GroupLocation::Children.includes_children_of_children());
        assert!(!GroupLocation::ChildrenOfChildren.includes_children());
        assert!(GroupLocation::AllChildren.includes_children());
        assert!(GroupLocation::AllChildren.includes_children_of_children());
        assert!(!GroupLocation::AllChildren.includes_parents());
        assert!(GroupLocation::All.includes_current());
        assert_eq!(
            GroupLocation::ChildrenOfChildren.to_string(),
            "ChildrenOfChildren"
        );
    }
}
