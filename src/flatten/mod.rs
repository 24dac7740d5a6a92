// Copyright 2022 Asen Lazarov

mod flattener;
mod value;

use std::error::Error;
use std::fmt;

pub use flattener::*;
pub use value::*;

#[derive(Debug, Clone)]
pub struct RowParseError(String);

impl RowParseError {
    pub fn new(s: &str) -> RowParseError {
        RowParseError(s.to_string())
    }

    pub fn field_count_mismatch(expected: usize, actual: usize) -> RowParseError {
        RowParseError(format!(
            "decoded row has {} fields but the schema has {}",
            actual, expected
        ))
    }

    pub fn missing_timestamp(column: &str) -> RowParseError {
        RowParseError(format!("no usable timestamp in field {}", column))
    }
}

impl fmt::Display for RowParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Row parse error: {}", self.0)
    }
}

impl Error for RowParseError {}
