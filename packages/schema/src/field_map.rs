//! # Schema Field Map
//!
//! Flat lookup from every reachable dotted path of a content type to the
//! schema node it resolves to. Built once per content type by a depth-first
//! walk:
//!
//! - `group` recurses under its own path
//! - `global_field` recurses under its own path when it has a schema
//! - `blocks` registers `path.<block_uid>` as a synthesized `block` node and
//!   recurses into each block under that path
//! - `experience_container` recurses into each variation under `path.<variation_uid>`
//! - `link` is also reachable as `path.title` and `path.url`
//! - `file` is also reachable as `path.url`

use crate::{FieldKind, FieldSchema};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SchemaFieldMap {
    fields: HashMap<String, Arc<FieldSchema>>,
}

impl SchemaFieldMap {
    pub fn build(schema: &[FieldSchema]) -> Self {
        let mut fields = HashMap::new();
        collect(schema, "", &mut fields);
        Self { fields }
    }

    pub fn get(&self, path: &str) -> Option<Arc<FieldSchema>> {
        self.fields.get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

fn join(prefix: &str, uid: &str) -> String {
    if prefix.is_empty() {
        uid.to_string()
    } else {
        format!("{prefix}.{uid}")
    }
}

fn collect(schema: &[FieldSchema], prefix: &str, fields: &mut HashMap<String, Arc<FieldSchema>>) {
    for field in schema {
        let path = join(prefix, &field.uid);
        let node = Arc::new(field.clone());
        fields.insert(path.clone(), node.clone());

        match &field.kind {
            FieldKind::Group { schema } => collect(schema, &path, fields),
            FieldKind::GlobalField { schema } if !schema.is_empty() => {
                collect(schema, &path, fields)
            }
            FieldKind::Blocks { blocks } => {
                for block in blocks {
                    let block_path = join(&path, &block.uid);
                    fields.insert(block_path.clone(), Arc::new(block.as_field_schema()));
                    collect(&block.schema, &block_path, fields);
                }
            }
            FieldKind::ExperienceContainer { variations } => {
                for variation in variations {
                    collect(&variation.schema, &join(&path, &variation.uid), fields);
                }
            }
            FieldKind::Link => {
                fields.insert(join(&path, "title"), node.clone());
                fields.insert(join(&path, "url"), node);
            }
            FieldKind::File => {
                fields.insert(join(&path, "url"), node);
            }
            _ => {}
        }
    }
}
