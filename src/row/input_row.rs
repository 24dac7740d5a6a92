use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::flatten::FlatRow;

/// The single externally visible output: one timestamp-tagged flat row
/// plus the dimension names picked for it. Serialization and indexing
/// are the ingestion pipeline's business.
#[derive(Debug, Clone)]
pub struct InputRow {
    timestamp: DateTime<FixedOffset>,
    dimensions: Vec<Arc<str>>,
    fields: FlatRow,
}

impl InputRow {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        dimensions: Vec<Arc<str>>,
        fields: FlatRow,
    ) -> InputRow {
        InputRow {
            timestamp,
            dimensions,
            fields,
        }
    }

    pub fn timestamp(&self) -> &DateTime<FixedOffset> {
        &self.timestamp
    }

    pub fn dimensions(&self) -> &[Arc<str>] {
        self.dimensions.as_slice()
    }

    pub fn fields(&self) -> &FlatRow {
        &self.fields
    }
}
