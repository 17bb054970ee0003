use std::sync::Arc;

use crate::{
    data_type::Type,
    dimension::Dimension,
    hierarchy_error::{HierarchyError, ValidationError},
    storage::{DimId, ReadableWritableStorageTraits, TypeId},
    variable::Variable,
};

use super::{Group, Location};

/// The data type of a new variable, given by handle or by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    /// A type handle.
    Handle(Type),
    /// A type name, e.g. `"float"`.
    Name(String),
}

impl From<Type> for TypeRef {
    fn from(data_type: Type) -> Self {
        Self::Handle(data_type)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// A dimension of a new variable, given by handle or by name.
///
/// A name is resolved in the group and its ancestors, nearest first.
/// A handle must be a dimension defined in the group itself: a dimension of an ancestor is rejected with [`ValidationError::DimensionNotInGroup`] even though it would be found by name.
pub enum DimRef<TStorage: ?Sized> {
    /// A dimension handle.
    Handle(Dimension<TStorage>),
    /// A dimension name.
    Name(String),
}

impl<TStorage: ?Sized> From<Dimension<TStorage>> for DimRef<TStorage> {
    fn from(dimension: Dimension<TStorage>) -> Self {
        Self::Handle(dimension)
    }
}

impl<TStorage: ?Sized> From<&Dimension<TStorage>> for DimRef<TStorage> {
    fn from(dimension: &Dimension<TStorage>) -> Self {
        Self::Handle(dimension.clone())
    }
}

impl<TStorage: ?Sized> From<&str> for DimRef<TStorage> {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl<TStorage: ?Sized> From<String> for DimRef<TStorage> {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// The dimensions (shape) of a new variable: a single dimension or an ordered list.
pub enum DimsRef<TStorage: ?Sized> {
    /// A single dimension.
    Single(DimRef<TStorage>),
    /// An ordered list of dimensions. An empty list defines a scalar variable.
    List(Vec<DimRef<TStorage>>),
}

impl<TStorage: ?Sized> DimsRef<TStorage> {
    fn into_vec(self) -> Vec<DimRef<TStorage>> {
        match self {
            Self::Single(dim) => vec![dim],
            Self::List(dims) => dims,
        }
    }
}

impl<TStorage: ?Sized> From<DimRef<TStorage>> for DimsRef<TStorage> {
    fn from(dim: DimRef<TStorage>) -> Self {
        Self::Single(dim)
    }
}

impl<TStorage: ?Sized> From<Vec<DimRef<TStorage>>> for DimsRef<TStorage> {
    fn from(dims: Vec<DimRef<TStorage>>) -> Self {
        Self::List(dims)
    }
}

impl<TStorage: ?Sized> From<Dimension<TStorage>> for DimsRef<TStorage> {
    fn from(dimension: Dimension<TStorage>) -> Self {
        Self::Single(dimension.into())
    }
}

impl<TStorage: ?Sized> From<&Dimension<TStorage>> for DimsRef<TStorage> {
    fn from(dimension: &Dimension<TStorage>) -> Self {
        Self::Single(dimension.into())
    }
}

impl<TStorage: ?Sized> From<Vec<Dimension<TStorage>>> for DimsRef<TStorage> {
    fn from(dimensions: Vec<Dimension<TStorage>>) -> Self {
        Self::List(dimensions.into_iter().map(DimRef::from).collect())
    }
}

impl<TStorage: ?Sized> From<&[Dimension<TStorage>]> for DimsRef<TStorage> {
    fn from(dimensions: &[Dimension<TStorage>]) -> Self {
        Self::List(dimensions.iter().map(DimRef::from).collect())
    }
}

impl<TStorage: ?Sized, const N: usize> From<[Dimension<TStorage>; N]> for DimsRef<TStorage> {
    fn from(dimensions: [Dimension<TStorage>; N]) -> Self {
        Self::List(dimensions.into_iter().map(DimRef::from).collect())
    }
}

impl<TStorage: ?Sized> From<&str> for DimsRef<TStorage> {
    fn from(name: &str) -> Self {
        Self::Single(name.into())
    }
}

impl<TStorage: ?Sized> From<String> for DimsRef<TStorage> {
    fn from(name: String) -> Self {
        Self::Single(name.into())
    }
}

impl<TStorage: ?Sized> From<Vec<&str>> for DimsRef<TStorage> {
    fn from(names: Vec<&str>) -> Self {
        Self::List(names.into_iter().map(DimRef::from).collect())
    }
}

impl<TStorage: ?Sized> From<&[&str]> for DimsRef<TStorage> {
    fn from(names: &[&str]) -> Self {
        Self::List(names.iter().map(|name| DimRef::from(*name)).collect())
    }
}

impl<TStorage: ?Sized, const N: usize> From<[&str; N]> for DimsRef<TStorage> {
    fn from(names: [&str; N]) -> Self {
        Self::List(names.into_iter().map(DimRef::from).collect())
    }
}

impl<TStorage: ?Sized> From<Vec<String>> for DimsRef<TStorage> {
    fn from(names: Vec<String>) -> Self {
        Self::List(names.into_iter().map(DimRef::from).collect())
    }
}

impl<TStorage: ?Sized + ReadableWritableStorageTraits> Group<TStorage> {
    /// Add a variable named `name` with data type `data_type` and shape `dims`.
    ///
    /// The data type is resolved first, then each dimension in order.
    /// See [`TypeRef`] and [`DimRef`] for how handles and names are resolved.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the data type or a dimension is not resolved ([`ValidationError`]), or the storage rejects the definition.
    pub fn add_variable(
        &self,
        name: &str,
        data_type: impl Into<TypeRef>,
        dims: impl Into<DimsRef<TStorage>>,
    ) -> Result<Variable<TStorage>, HierarchyError> {
        let (storage, id) = self.live("add_variable")?;
        storage.enter_define_mode(id)?;
        let type_id = self.resolve_type(data_type.into())?;
        let dim_ids = dims
            .into()
            .into_vec()
            .into_iter()
            .map(|dim| self.resolve_dimension(dim))
            .collect::<Result<Vec<_>, _>>()?;
        let var = storage.define_variable(id, name, type_id, &dim_ids)?;
        Ok(Variable::new(Arc::clone(storage), id, var))
    }

    /// Add a scalar variable named `name` with data type `data_type`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the handle is null, the data type is not resolved, or the storage rejects the definition.
    pub fn add_scalar_variable(
        &self,
        name: &str,
        data_type: impl Into<TypeRef>,
    ) -> Result<Variable<TStorage>, HierarchyError> {
        self.add_variable(name, data_type, DimsRef::List(Vec::new()))
    }

    fn resolve_type(&self, data_type: TypeRef) -> Result<TypeId, HierarchyError> {
        match data_type {
            TypeRef::Handle(data_type) => data_type
                .id()
                .ok_or_else(|| ValidationError::NullType.into()),
            TypeRef::Name(name) => match self.type_named(&name)?.id() {
                Some(type_id) => Ok(type_id),
                None => Err(ValidationError::UnresolvedType(name).into()),
            },
        }
    }

    fn resolve_dimension(&self, dim: DimRef<TStorage>) -> Result<DimId, HierarchyError> {
        match dim {
            DimRef::Name(name) => {
                let dimension = self.dimension(&name, Location::ParentsAndCurrent)?;
                if dimension.is_null() {
                    return Err(ValidationError::UnresolvedDimension(name).into());
                }
                dimension.id()
            }
            DimRef::Handle(dimension) => {
                if dimension.is_null() {
                    return Err(ValidationError::NullDimension.into());
                }
                if !dimension.is_valid_in(self)? {
                    return Err(ValidationError::DimensionNotInGroup(dimension.name()?).into());
                }
                dimension.id()
            }
        }
    }
}
