//! Process-wide metadata cache.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::tag::{parse_tag, to_snake_case};
use super::{ColumnMeta, Model, TableMeta};
use crate::error::{EormError, Result};

/// Options applied when registering a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableMetaOption {
    /// Excludes the named logical fields, whatever their annotation says.
    IgnoreFields(Vec<String>),
    /// Overrides the table name.
    TableName(String),
}

impl TableMetaOption {
    /// Creates an [`TableMetaOption::IgnoreFields`] option.
    pub fn ignore_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::IgnoreFields(fields.into_iter().map(Into::into).collect())
    }

    /// Creates a [`TableMetaOption::TableName`] option.
    pub fn table_name(name: impl Into<String>) -> Self {
        Self::TableName(name.into())
    }
}

/// What [`MetaRegistry::register`] does when the type is already cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReRegistration {
    /// Replace the cached entry; the last registration wins.
    #[default]
    Overwrite,
    /// Keep the cached entry and return it; options of later calls are ignored.
    KeepExisting,
}

/// Thread-safe cache of [`TableMeta`] keyed by model type.
///
/// Metadata is derived outside the lock and published as an `Arc`, so
/// readers only ever see complete entries. Entries are immutable once
/// published; overwriting replaces the `Arc`, it never mutates a shared one.
#[derive(Debug, Default)]
pub struct MetaRegistry {
    tables: RwLock<HashMap<TypeId, Arc<TableMeta>>>,
    policy: ReRegistration,
}

impl MetaRegistry {
    /// Creates an empty registry that overwrites on re-registration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given re-registration policy.
    #[must_use]
    pub fn with_policy(policy: ReRegistration) -> Self {
        Self {
            tables: RwLock::default(),
            policy,
        }
    }

    /// Returns the re-registration policy.
    #[must_use]
    pub const fn policy(&self) -> ReRegistration {
        self.policy
    }

    /// Returns the metadata of `M`, registering it with default options on
    /// first access.
    ///
    /// An entry installed concurrently by another caller is never replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if `M` cannot be mapped to a table.
    pub fn get<M: Model>(&self) -> Result<Arc<TableMeta>> {
        let type_id = TypeId::of::<M>();
        if let Some(meta) = self.tables.read().get(&type_id) {
            trace!(model = M::type_name(), "table metadata cache hit");
            return Ok(Arc::clone(meta));
        }
        let meta = Arc::new(derive_meta::<M>(&[])?);
        let mut tables = self.tables.write();
        let meta = tables.entry(type_id).or_insert(meta);
        debug!(model = M::type_name(), table = %meta.table_name(), "cached table metadata");
        Ok(Arc::clone(meta))
    }

    /// Derives the metadata of `M` with `options` and caches it.
    ///
    /// # Errors
    ///
    /// Returns an error if `M` is not a usable model: it declares no fields,
    /// every field is excluded, a field name repeats, or an annotation has an
    /// unknown token. Nothing is cached on error.
    pub fn register<M: Model>(&self, options: &[TableMetaOption]) -> Result<Arc<TableMeta>> {
        let type_id = TypeId::of::<M>();
        if self.policy == ReRegistration::KeepExisting {
            if let Some(meta) = self.tables.read().get(&type_id) {
                debug!(model = M::type_name(), "keeping existing table metadata");
                return Ok(Arc::clone(meta));
            }
        }

        let meta = Arc::new(derive_meta::<M>(options)?);
        let mut tables = self.tables.write();
        let meta = match self.policy {
            ReRegistration::Overwrite => {
                if tables.insert(type_id, Arc::clone(&meta)).is_some() {
                    debug!(model = M::type_name(), "overwrote table metadata");
                }
                meta
            }
            ReRegistration::KeepExisting => Arc::clone(tables.entry(type_id).or_insert(meta)),
        };
        debug!(
            model = M::type_name(),
            table = %meta.table_name(),
            columns = meta.columns().len(),
            "registered table metadata"
        );
        Ok(meta)
    }

    /// Returns the number of cached models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    /// Returns true if no model is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}

fn invalid_model(model: &str, reason: impl Into<String>) -> EormError {
    EormError::InvalidModel {
        model: model.to_string(),
        reason: reason.into(),
    }
}

fn derive_meta<M: Model>(options: &[TableMetaOption]) -> Result<TableMeta> {
    let model = M::type_name();
    let fields = M::fields();
    if fields.is_empty() {
        return Err(invalid_model(model, "model declares no fields"));
    }

    let mut table_name = M::table_name().map(String::from);
    let mut ignored: HashSet<&str> = HashSet::new();
    for option in options {
        match option {
            TableMetaOption::IgnoreFields(names) => {
                ignored.extend(names.iter().map(String::as_str));
            }
            TableMetaOption::TableName(name) => table_name = Some(name.clone()),
        }
    }

    let mut seen = HashSet::with_capacity(fields.len());
    let mut columns = Vec::with_capacity(fields.len());
    for field in &fields {
        if !seen.insert(field.name()) {
            return Err(invalid_model(
                model,
                format!("field {} is declared twice", field.name()),
            ));
        }
        let tag = parse_tag(field.name(), field.tag())?;
        if tag.ignored || ignored.contains(field.name()) {
            continue;
        }
        columns.push(ColumnMeta {
            field_name: field.name().to_string(),
            column_name: tag.column.unwrap_or_else(|| to_snake_case(field.name())),
            field_type: field.ty(),
            is_primary_key: tag.primary_key,
            is_auto_increment: tag.auto_increment,
        });
    }
    if columns.is_empty() {
        return Err(invalid_model(model, "every field is excluded"));
    }

    Ok(TableMeta::new(
        table_name.unwrap_or_else(|| to_snake_case(model)),
        model,
        TypeId::of::<M>(),
        columns,
    ))
}
