//! Table metadata for ORM models.
//!
//! A [`Model`] describes its fields in declaration order; the
//! [`MetaRegistry`] turns that description into a [`TableMeta`] once per type
//! and shares it across compilations.
//!
//! # Example
//!
//! ```rust
//! use eorm_core::meta::{FieldDescriptor, MetaRegistry, Model};
//!
//! struct UserProfile {
//!     id: i64,
//!     nick_name: String,
//! }
//!
//! impl Model for UserProfile {
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![
//!             FieldDescriptor::new::<i64>("id", "primary_key,auto_increment"),
//!             FieldDescriptor::new::<String>("nick_name", ""),
//!         ]
//!     }
//! }
//!
//! let registry = MetaRegistry::new();
//! let meta = registry.get::<UserProfile>().unwrap();
//! assert_eq!(meta.table_name(), "user_profile");
//! assert_eq!(meta.column("nick_name").unwrap().column_name(), "nick_name");
//! ```

mod registry;
mod tag;

use std::any::TypeId;
use std::collections::HashMap;

pub use registry::{MetaRegistry, ReRegistration, TableMetaOption};
pub use tag::to_snake_case;

/// A type that maps to a database table.
///
/// Usually implemented with `#[derive(Model)]` from `eorm-derive`.
pub trait Model: 'static {
    /// The type name used for the default table name and in errors.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("Model")
    }

    /// An explicit table name; `None` means the snake-cased type name.
    fn table_name() -> Option<&'static str> {
        None
    }

    /// The model's fields in declaration order.
    fn fields() -> Vec<FieldDescriptor>;
}

/// The Rust type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    name: &'static str,
    id: TypeId,
}

impl FieldType {
    /// Describes `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Returns the Rust type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type identity.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns true if this is `T`.
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

/// One declared field of a model and its annotation.
///
/// The tag is a comma-separated set of tokens: `primary_key`,
/// `auto_increment`, `-` (exclude the field) and `column=<name>`.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    name: &'static str,
    ty: FieldType,
    tag: &'static str,
}

impl FieldDescriptor {
    /// Creates a descriptor for a field of type `T`.
    #[must_use]
    pub fn new<T: ?Sized + 'static>(name: &'static str, tag: &'static str) -> Self {
        Self {
            name,
            ty: FieldType::of::<T>(),
            tag,
        }
    }

    /// Returns the logical field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field type.
    #[must_use]
    pub const fn ty(&self) -> FieldType {
        self.ty
    }

    /// Returns the raw annotation.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }
}

/// Column-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    field_name: String,
    column_name: String,
    field_type: FieldType,
    is_primary_key: bool,
    is_auto_increment: bool,
}

impl ColumnMeta {
    /// Returns the logical field name.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Returns the physical column name.
    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Returns the field's Rust type.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Whether the column is (part of) the primary key.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    /// Whether the database assigns the value on insert.
    #[must_use]
    pub const fn is_auto_increment(&self) -> bool {
        self.is_auto_increment
    }
}

/// Table-level metadata of one model type.
///
/// The field map is built from the column list and indexes into it, so both
/// always describe the same columns.
#[derive(Debug, Clone)]
pub struct TableMeta {
    table_name: String,
    model: &'static str,
    type_id: TypeId,
    columns: Vec<ColumnMeta>,
    field_map: HashMap<String, usize>,
}

impl TableMeta {
    fn new(table_name: String, model: &'static str, type_id: TypeId, columns: Vec<ColumnMeta>) -> Self {
        let field_map = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.field_name.clone(), i))
            .collect();
        Self {
            table_name,
            model,
            type_id,
            columns,
            field_map,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the model type name.
    #[must_use]
    pub const fn model(&self) -> &'static str {
        self.model
    }

    /// Returns the identity of the model type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Looks a column up by logical field name.
    #[must_use]
    pub fn column(&self, field: &str) -> Option<&ColumnMeta> {
        self.field_map.get(field).map(|&i| &self.columns[i])
    }

    /// Returns the logical field names known to the field map.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.field_map.keys().map(String::as_str)
    }

    /// Returns the number of entries in the field map.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.field_map.len()
    }

    /// Returns the primary key columns.
    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }
}
