//! Data types.
//!
//! The atomic netCDF-4 data types are available as constants, e.g. [`Type::FLOAT`].
//! User-defined (compound, enum, variable length and opaque) types are represented by their id only.

use crate::storage::TypeId;

/// The atomic data types, by id.
const ATOMIC_TYPES: [(i32, &str); 12] = [
    (1, "byte"),
    (2, "char"),
    (3, "short"),
    (4, "int"),
    (5, "float"),
    (6, "double"),
    (7, "ubyte"),
    (8, "ushort"),
    (9, "uint"),
    (10, "int64"),
    (11, "uint64"),
    (12, "string"),
];

/// A data type handle.
///
/// A type handle carries no reference to storage, so it is [`Copy`] and can be used with any group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    id: Option<TypeId>,
}

impl Type {
    /// `byte`: 8-bit signed integer.
    pub const BYTE: Self = Self::new(TypeId(1));
    /// `char`: 8-bit character.
    pub const CHAR: Self = Self::new(TypeId(2));
    /// `short`: 16-bit signed integer.
    pub const SHORT: Self = Self::new(TypeId(3));
    /// `int`: 32-bit signed integer.
    pub const INT: Self = Self::new(TypeId(4));
    /// `float`: 32-bit floating point.
    pub const FLOAT: Self = Self::new(TypeId(5));
    /// `double`: 64-bit floating point.
    pub const DOUBLE: Self = Self::new(TypeId(6));
    /// `ubyte`: 8-bit unsigned integer.
    pub const UBYTE: Self = Self::new(TypeId(7));
    /// `ushort`: 16-bit unsigned integer.
    pub const USHORT: Self = Self::new(TypeId(8));
    /// `uint`: 32-bit unsigned integer.
    pub const UINT: Self = Self::new(TypeId(9));
    /// `int64`: 64-bit signed integer.
    pub const INT64: Self = Self::new(TypeId(10));
    /// `uint64`: 64-bit unsigned integer.
    pub const UINT64: Self = Self::new(TypeId(11));
    /// `string`: variable length string.
    pub const STRING: Self = Self::new(TypeId(12));

    /// Create a type handle from a storage type id.
    #[must_use]
    pub const fn new(id: TypeId) -> Self {
        Self { id: Some(id) }
    }

    /// Create a null type handle.
    #[must_use]
    pub const fn null() -> Self {
        Self { id: None }
    }

    /// Returns true if the handle is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.id.is_none()
    }

    /// Make the handle null.
    pub fn set_null(&mut self) {
        self.id = None;
    }

    /// Returns the storage type id, or [`None`] if the handle is null.
    #[must_use]
    pub const fn id(&self) -> Option<TypeId> {
        self.id
    }

    /// Returns the atomic type named `name`, e.g. `"float"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ATOMIC_TYPES
            .iter()
            .find(|(_, atomic_name)| *atomic_name == name)
            .map(|(id, _)| Self::new(TypeId(*id)))
    }

    /// Create a type handle from a storage type id.
    #[must_use]
    pub const fn from_id(id: TypeId) -> Self {
        Self::new(id)
    }

    /// Returns the name of an atomic type.
    ///
    /// Returns [`None`] for a null handle or a user-defined type.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        let id = self.id?;
        ATOMIC_TYPES
            .iter()
            .find(|(atomic_id, _)| *atomic_id == id.0)
            .map(|(_, name)| *name)
    }

    /// Returns true if this is a user-defined (compound, enum, variable length or opaque) type.
    ///
    /// A null handle is not complex.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        self.id.is_some() && self.name().is_none()
    }
}

impl Default for Type {
    fn default() -> Self {
        Self::null()
    }
}

impl From<TypeId> for Type {
    fn from(id: TypeId) -> Self {
        Self::new(id)
    }
}

impl core::fmt::Display for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match (self.id, self.name()) {
            (None, _) => write!(f, "null"),
            (Some(_), Some(name)) => write!(f, "{name}"),
            (Some(id), None) => write!(f, "type {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_atomic() {
        assert_eq!(Type::from_name("float"), Some(Type::FLOAT));
        assert_eq!(Type::from_name("uint64"), Some(Type::UINT64));
        assert_eq!(Type::from_name("float32"), None);
        assert_eq!(Type::STRING.name(), Some("string"));
        assert_eq!(Type::DOUBLE.id(), Some(TypeId(6)));
        assert!(!Type::INT.is_complex());
        assert_eq!(Type::INT64.to_string(), "int64");
    }

    #[test]
    fn data_type_complex_and_null() {
        let compound = Type::from_id(TypeId(32));
        assert!(compound.is_complex());
        assert_eq!(compound.name(), None);
        assert_eq!(compound.to_string(), "type 32");

        let mut data_type = Type::BYTE;
        assert!(!data_type.is_null());
        data_type.set_null();
        assert!(data_type.is_null());
        assert!(!data_type.is_complex());
        assert_eq!(data_type, Type::null());
        assert_eq!(data_type.to_string(), "null");
    }
}
