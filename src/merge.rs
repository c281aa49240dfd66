//! Deterministic recursive merge of two schema trees.
//!
//! Combines two JSON-Schema-style descriptions key by key:
//! - `enum` and `required` are treated as ordered sets and unioned
//! - `parameters` entries are matched by their `name` field and merged
//! - nested mappings merge recursively, sequences concatenate
//! - scalars and mixed-shape collisions resolve in favor of the right side
//!
//! The merge never mutates its inputs and its output ordering depends only
//! on the input ordering: keys first seen on the left keep their position,
//! keys unique to the right append after in their original order.

use serde_json::{Map, Value};

use crate::error::MergeError;

/// An ordered mapping describing validation rules. Insertion order is
/// preserved and carried through a merge.
pub type SchemaNode = Map<String, Value>;

/// Merge `right` into `left`, producing a new tree.
///
/// Fails with [`MergeError::TypeMismatch`] when a reserved key does not
/// hold a sequence on either input. No partial result is produced on
/// failure.
pub fn merge_schemas(left: &SchemaNode, right: &SchemaNode) -> Result<SchemaNode, MergeError> {
    let mut merged = SchemaNode::new();

    for (key, left_value) in left {
        let value = match right.get(key) {
            Some(right_value) => merge_value(key, left_value, right_value)?,
            None => take_one_sided(key, left_value)?,
        };
        merged.insert(key.clone(), value);
    }

    for (key, right_value) in right {
        if !left.contains_key(key) {
            merged.insert(key.clone(), take_one_sided(key, right_value)?);
        }
    }

    Ok(merged)
}

fn merge_value(key: &str, left: &Value, right: &Value) -> Result<Value, MergeError> {
    match key {
        "enum" | "required" => union_scalars(key, left, right),
        "parameters" => merge_parameters(left, right),
        _ => match (left, right) {
            (Value::Object(left_node), Value::Object(right_node)) => {
                Ok(Value::Object(merge_schemas(left_node, right_node)?))
            }
            (Value::Array(left_items), Value::Array(right_items)) => {
                let mut items = left_items.clone();
                items.extend(right_items.iter().cloned());
                Ok(Value::Array(items))
            }
            _ => Ok(right.clone()),
        },
    }
}

/// A key present on one side only is taken unchanged, but reserved keys
/// still have their shape checked so malformed input fails regardless of
/// which side carries it.
fn take_one_sided(key: &str, value: &Value) -> Result<Value, MergeError> {
    match key {
        "enum" | "required" => {
            expect_array(key, value)?;
        }
        "parameters" => {
            expect_parameters(value)?;
        }
        _ => {}
    }
    Ok(value.clone())
}

/// Ordered set union: left's elements in left order, then elements only
/// seen on the right in their relative order, de-duplicated.
fn union_scalars(key: &str, left: &Value, right: &Value) -> Result<Value, MergeError> {
    let left_items = expect_array(key, left)?;
    let right_items = expect_array(key, right)?;

    let mut items: Vec<Value> = Vec::with_capacity(left_items.len() + right_items.len());
    for item in left_items.iter().chain(right_items) {
        if !items.contains(item) {
            items.push(item.clone());
        }
    }

    Ok(Value::Array(items))
}

/// Merge two parameter lists by entry `name`. Matched pairs merge
/// recursively and keep the left entry's position; unmatched right entries
/// append after in their original order. When a side repeats a `name`, the
/// first unconsumed occurrence wins for matching.
fn merge_parameters(left: &Value, right: &Value) -> Result<Value, MergeError> {
    let left_entries = expect_parameters(left)?;
    let right_entries = expect_parameters(right)?;

    let mut taken = vec![false; right_entries.len()];
    let mut items = Vec::with_capacity(left_entries.len() + right_entries.len());

    for &entry in &left_entries {
        let matched = match entry.get("name") {
            Some(name) => find_by_name(&right_entries, &taken, name),
            None => None,
        };
        match matched {
            Some(index) => {
                taken[index] = true;
                items.push(Value::Object(merge_schemas(entry, right_entries[index])?));
            }
            None => items.push(Value::Object(entry.clone())),
        }
    }

    for (index, &entry) in right_entries.iter().enumerate() {
        if !taken[index] {
            items.push(Value::Object(entry.clone()));
        }
    }

    Ok(Value::Array(items))
}

fn find_by_name(entries: &[&SchemaNode], taken: &[bool], name: &Value) -> Option<usize> {
    entries
        .iter()
        .enumerate()
        .find(|(index, entry)| !taken[*index] && entry.get("name") == Some(name))
        .map(|(index, _)| index)
}

/// Check a `parameters` value all the way down to its entries: the value
/// must be an array and every entry a mapping, whichever side carries it.
fn expect_parameters(value: &Value) -> Result<Vec<&SchemaNode>, MergeError> {
    expect_array("parameters", value)?
        .iter()
        .map(expect_parameter)
        .collect()
}

fn expect_array<'a>(key: &str, value: &'a Value) -> Result<&'a Vec<Value>, MergeError> {
    value.as_array().ok_or_else(|| MergeError::TypeMismatch {
        key: key.to_string(),
        found: type_name(value),
    })
}

fn expect_parameter(value: &Value) -> Result<&SchemaNode, MergeError> {
    value.as_object().ok_or_else(|| MergeError::TypeMismatch {
        key: "parameters".to_string(),
        found: type_name(value),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
