// Copyright 2022 Asen Lazarov

mod template;
mod types;
mod typestr;

use std::error::Error;
use std::fmt;

pub use template::*;
pub use types::*;
pub use typestr::*;

#[derive(Debug, Clone)]
pub struct SchemaError(String);

impl SchemaError {
    pub fn new(s: &str) -> SchemaError {
        SchemaError(s.to_string())
    }

    pub fn not_a_struct(type_string: &str) -> SchemaError {
        SchemaError(format!(
            "type string should be a struct type but is not: {}",
            type_string
        ))
    }

    pub fn bad_type_string(what: &str, type_string: &str) -> SchemaError {
        SchemaError(format!("{} in type string: {}", what, type_string))
    }

    pub fn unsupported_shape(field: &str, type_string: &str) -> SchemaError {
        SchemaError(format!(
            "unsupported nested shape for field {} in type string: {}",
            field, type_string
        ))
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Schema error: {}", self.0)
    }
}

impl Error for SchemaError {}
