// Copyright 2022 Asen Lazarov

use std::collections::HashMap;
use std::sync::Arc;

use crate::flatten::value::{coerce_primitive, DecodedStruct, ScalarValue, ValueNode};
use crate::flatten::RowParseError;
use crate::schema::{FieldKind, StructSchema};

/// A field's value in the flat row: one scalar, or the ordered scalars of
/// a flattened list field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(ScalarValue),
    Multi(Vec<ScalarValue>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            FieldValue::Scalar(v) => Some(v),
            FieldValue::Multi(_) => None,
        }
    }
}

/// Flat field name to value mapping, the flattener's output. Fields with
/// no value are simply missing, never present-but-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow(HashMap<Arc<str>, FieldValue>);

impl FlatRow {
    pub fn new() -> FlatRow {
        FlatRow(HashMap::new())
    }

    fn with_capacity(n: usize) -> FlatRow {
        FlatRow(HashMap::with_capacity(n))
    }

    pub fn insert(&mut self, name: Arc<str>, value: FieldValue) {
        self.0.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn get_scalar(&self, name: &str) -> Option<&ScalarValue> {
        self.get(name).and_then(|v| v.as_scalar())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field_names(&self) -> Vec<Arc<str>> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &FieldValue)> {
        self.0.iter()
    }
}

impl Default for FlatRow {
    fn default() -> Self {
        FlatRow::new()
    }
}

/// Single pass over the schema in declared order, dispatching on the
/// compile-time [FieldKind] tag of each entry. The only hard failure is a
/// field count mismatch between the schema and the decoded row, anything
/// else degrades to an omitted field.
pub fn flatten(schema: &StructSchema, row: &DecodedStruct) -> Result<FlatRow, RowParseError> {
    if row.len() != schema.len() {
        return Err(RowParseError::field_count_mismatch(schema.len(), row.len()));
    }
    let mut flat = FlatRow::with_capacity(schema.len());
    for (field, node) in schema.fields().iter().zip(row.fields()) {
        match field.kind() {
            FieldKind::Primitive(_) => {
                // Absent, or a node of some other category: no value
                if let ValueNode::Primitive(p) = node {
                    flat.insert(field.name().clone(), FieldValue::Scalar(coerce_primitive(p)));
                }
            }
            FieldKind::List(_) => {
                // List(None) is the decoder's negative-length sentinel
                if let ValueNode::List(Some(elements)) = node {
                    let values = elements.iter().map(coerce_primitive).collect();
                    flat.insert(field.name().clone(), FieldValue::Multi(values));
                }
            }
            FieldKind::Map(_, _) => {
                if let (ValueNode::Map(Some(entries)), Some(namer)) = (node, field.map_namer()) {
                    for (key, value) in entries {
                        let key_str = coerce_primitive(key).to_arc_str();
                        let name: Arc<str> = Arc::from(namer.entry_name(key_str.as_ref()).as_str());
                        flat.insert(name, FieldValue::Scalar(coerce_primitive(value)));
                    }
                }
            }
            FieldKind::Unsupported => {
                // deeper nesting is not flattened, the field is dropped
            }
        }
    }
    Ok(flat)
}
