//! Models shared by unit tests.

use std::sync::Arc;

use crate::meta::{FieldDescriptor, MetaRegistry, Model, TableMeta};

pub(crate) struct TestModel;

impl Model for TestModel {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new::<i64>("id", "auto_increment,primary_key"),
            FieldDescriptor::new::<String>("first_name", ""),
            FieldDescriptor::new::<i8>("age", ""),
            FieldDescriptor::new::<Option<String>>("last_name", ""),
        ]
    }
}

pub(crate) struct TestIgnoreModel;

impl Model for TestIgnoreModel {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new::<i64>("id", "auto_increment,primary_key,-"),
            FieldDescriptor::new::<String>("first_name", ""),
            FieldDescriptor::new::<i8>("age", "-"),
            FieldDescriptor::new::<String>("last_name", ""),
        ]
    }
}

pub(crate) fn test_model_meta() -> Arc<TableMeta> {
    MetaRegistry::new()
        .get::<TestModel>()
        .expect("test model metadata")
}
