use std::fmt;
use std::sync::Arc;

use crate::schema::template::MapEntryNamer;

/// Scalar source types supported by the type string grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal,
    String,
    Varchar,
    Char,
    Binary,
    Date,
    Timestamp,
}

impl PrimitiveKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::TinyInt => "tinyint",
            PrimitiveKind::SmallInt => "smallint",
            PrimitiveKind::Int => "int",
            PrimitiveKind::BigInt => "bigint",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::String => "string",
            PrimitiveKind::Varchar => "varchar",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Binary => "binary",
            PrimitiveKind::Date => "date",
            PrimitiveKind::Timestamp => "timestamp",
        }
    }

    /// Whether the grammar accepts a `(p[,s])` parameter list after the name.
    pub fn parameterized(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Decimal | PrimitiveKind::Varchar | PrimitiveKind::Char
        )
    }
}

pub fn str2kind(s: &str) -> Option<PrimitiveKind> {
    match s {
        "boolean" => Some(PrimitiveKind::Boolean),
        "tinyint" => Some(PrimitiveKind::TinyInt),
        "smallint" => Some(PrimitiveKind::SmallInt),
        "int" => Some(PrimitiveKind::Int),
        "bigint" => Some(PrimitiveKind::BigInt),
        "float" => Some(PrimitiveKind::Float),
        "double" => Some(PrimitiveKind::Double),
        "decimal" => Some(PrimitiveKind::Decimal),
        "string" => Some(PrimitiveKind::String),
        "varchar" => Some(PrimitiveKind::Varchar),
        "char" => Some(PrimitiveKind::Char),
        "binary" => Some(PrimitiveKind::Binary),
        "date" => Some(PrimitiveKind::Date),
        "timestamp" => Some(PrimitiveKind::Timestamp),
        _ => None,
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Field category decided once at schema compile time. The flattener
/// dispatches over this tag, never over the decoded value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Primitive(PrimitiveKind),
    /// One-level array of primitives.
    List(PrimitiveKind),
    /// One-level map with primitive keys and values.
    Map(PrimitiveKind, PrimitiveKind),
    /// Anything nested deeper. Dropped from the flat row under the
    /// default shape policy.
    Unsupported,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldKind::Primitive(k) => write!(f, "{}", k),
            FieldKind::List(k) => write!(f, "array<{}>", k),
            FieldKind::Map(k, v) => write!(f, "map<{},{}>", k, v),
            FieldKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: Arc<str>,
    kind: FieldKind,
    map_namer: Option<MapEntryNamer>,
}

impl FieldSchema {
    pub fn new(name: Arc<str>, kind: FieldKind, map_namer: Option<MapEntryNamer>) -> FieldSchema {
        FieldSchema {
            name,
            kind,
            map_namer,
        }
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn map_namer(&self) -> Option<&MapEntryNamer> {
        self.map_namer.as_ref()
    }
}

/// Ordered field list compiled from a type string. Field order equals the
/// declaration order and must match the positional order of the decoded
/// value tree. Immutable once built.
#[derive(Debug, Clone)]
pub struct StructSchema {
    fields: Vec<FieldSchema>,
}

impl StructSchema {
    pub fn new(fields: Vec<FieldSchema>) -> StructSchema {
        StructSchema { fields }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        self.fields.as_slice()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> Vec<Arc<str>> {
        self.fields.iter().map(|f| f.name().clone()).collect()
    }
}
