//! Insertion-ordered registry of parsed schema fragments.
//!
//! Built once at startup from the configured sources and passed by
//! reference to the assembler. Fragment identity is the source path or URL
//! it was loaded from.

use indexmap::IndexMap;

use crate::error::{PrepareError, Result};
use crate::merge::{merge_schemas, SchemaNode};

#[derive(Default)]
pub struct FragmentRegistry {
    fragments: IndexMap<String, SchemaNode>,
}

impl FragmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fragment under its identity. Registering the same
    /// identity twice is an error rather than a silent override.
    pub fn insert(&mut self, id: impl Into<String>, node: SchemaNode) -> Result<()> {
        let id = id.into();
        if self.fragments.contains_key(&id) {
            return Err(PrepareError::DuplicateFragment(id));
        }
        self.fragments.insert(id, node);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SchemaNode> {
        self.fragments.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    /// Fragments with their identities, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.fragments.iter().map(|(id, node)| (id.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fold all fragments through the schema merger in registration order.
    /// Later fragments override earlier ones wherever the merge policy says
    /// the right side wins.
    pub fn merge_all(&self) -> Result<SchemaNode> {
        let mut merged = SchemaNode::new();
        for node in self.fragments.values() {
            merged = merge_schemas(&merged, node)?;
        }
        Ok(merged)
    }
}
