use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};

/// A scalar as produced by the external column decoder, before coercion.
/// Decimal and date keep their source representation so the coercion
/// overrides below can see them.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPrimitive {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    Str(Arc<str>),
    Decimal { unscaled: i128, scale: u32 },
    Date(NaiveDate),
    Timestamp(DateTime<FixedOffset>),
}

/// One decoded top-level field, positionally bound to a schema entry.
/// `List(None)` and `Map(None)` carry the decoder's negative-length
/// sentinel, `Absent` the no-value sentinel for primitives. `Opaque`
/// stands in for values of unsupported shape and is never read.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Absent,
    Primitive(DecodedPrimitive),
    List(Option<Vec<DecodedPrimitive>>),
    Map(Option<Vec<(DecodedPrimitive, DecodedPrimitive)>>),
    Opaque,
}

/// A whole decoded record. Field order must match the schema's declared
/// order, the decoder binds by position, not by name.
#[derive(Debug, Clone)]
pub struct DecodedStruct(Vec<ValueNode>);

impl DecodedStruct {
    pub fn new(fields: Vec<ValueNode>) -> DecodedStruct {
        DecodedStruct(fields)
    }

    pub fn fields(&self) -> &[ValueNode] {
        self.0.as_slice()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Flat-side scalar stored in a [crate::flatten::FlatRow].
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    Str(Arc<str>),
    Time(DateTime<FixedOffset>),
}

impl ScalarValue {
    pub fn to_arc_str(&self) -> Arc<str> {
        match self {
            ScalarValue::Null => Arc::from("NULL"),
            ScalarValue::Bool(x) => Arc::from(x.to_string().as_str()),
            ScalarValue::Long(x) => Arc::from(x.to_string().as_str()),
            ScalarValue::Double(x) => Arc::from(x.to_string().as_str()),
            ScalarValue::Str(x) => x.clone(),
            ScalarValue::Time(x) => Arc::from(x.to_rfc3339().as_str()),
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            ScalarValue::Long(x) => Some(*x),
            ScalarValue::Double(x) => Some(*x as i64),
            _ => None,
        }
    }
}

/// Converts one decoded primitive to its flat scalar form. Two source
/// representations override the natural conversion: the numeric path
/// would round a decimal off to an integer, and a date-only value would
/// turn into an epoch number, losing its type.
pub fn coerce_primitive(p: &DecodedPrimitive) -> ScalarValue {
    match p {
        DecodedPrimitive::Null => ScalarValue::Null,
        DecodedPrimitive::Bool(b) => ScalarValue::Bool(*b),
        DecodedPrimitive::Long(l) => ScalarValue::Long(*l),
        DecodedPrimitive::Double(d) => ScalarValue::Double(*d),
        DecodedPrimitive::Str(s) => ScalarValue::Str(s.clone()),
        DecodedPrimitive::Decimal { unscaled, scale } => {
            ScalarValue::Double(*unscaled as f64 / 10f64.powi(*scale as i32))
        }
        DecodedPrimitive::Date(d) => {
            ScalarValue::Str(Arc::from(d.format("%Y-%m-%d").to_string().as_str()))
        }
        DecodedPrimitive::Timestamp(t) => ScalarValue::Time(*t),
    }
}
