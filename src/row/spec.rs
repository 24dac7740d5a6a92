use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

use crate::flatten::{FlatRow, ScalarValue};
use crate::row::time::TimeTypeFormat;

#[derive(Debug, Clone)]
pub enum TimestampFormat {
    Auto,
    Iso,
    Millis,
    Posix,
    Pattern(TimeTypeFormat),
}

pub fn str2tsformat(s: &str) -> TimestampFormat {
    match s {
        "auto" | "" => TimestampFormat::Auto,
        "iso" => TimestampFormat::Iso,
        "millis" => TimestampFormat::Millis,
        "posix" => TimestampFormat::Posix,
        pattern => TimestampFormat::Pattern(TimeTypeFormat::new(pattern)),
    }
}

/// Picks the row timestamp out of a flat row: reads the configured field
/// by name and converts per the configured format.
#[derive(Debug, Clone)]
pub struct TimestampSpec {
    column: Arc<str>,
    format: TimestampFormat,
}

impl TimestampSpec {
    pub fn new(column: &str, format: TimestampFormat) -> TimestampSpec {
        TimestampSpec {
            column: Arc::from(column),
            format,
        }
    }

    pub fn column(&self) -> &Arc<str> {
        &self.column
    }

    pub fn extract(&self, row: &FlatRow) -> Option<DateTime<FixedOffset>> {
        match row.get_scalar(self.column.as_ref())? {
            ScalarValue::Time(t) => Some(*t),
            ScalarValue::Long(l) => self.from_epoch(*l),
            ScalarValue::Double(d) => self.from_epoch(*d as i64),
            ScalarValue::Str(s) => self.from_text(s.as_ref()),
            _ => None,
        }
    }

    fn from_epoch(&self, n: i64) -> Option<DateTime<FixedOffset>> {
        let utc = match self.format {
            TimestampFormat::Posix => Utc.timestamp_opt(n, 0).single()?,
            // auto, iso and millis all read a number as epoch millis
            _ => Utc.timestamp_millis_opt(n).single()?,
        };
        Some(utc.with_timezone(&Utc.fix()))
    }

    fn from_text(&self, s: &str) -> Option<DateTime<FixedOffset>> {
        match &self.format {
            TimestampFormat::Auto => DateTime::parse_from_rfc3339(s)
                .ok()
                .or_else(|| s.parse::<i64>().ok().and_then(|n| self.from_epoch(n))),
            TimestampFormat::Iso => DateTime::parse_from_rfc3339(s).ok(),
            TimestampFormat::Millis | TimestampFormat::Posix => {
                s.parse::<i64>().ok().and_then(|n| self.from_epoch(n))
            }
            TimestampFormat::Pattern(fmt) => fmt.parse(s),
        }
    }
}

/// Dimension selection policy: the explicitly configured list wins,
/// duplicates and all; otherwise every flat field name not excluded.
#[derive(Debug, Clone)]
pub struct DimensionsSpec {
    dimensions: Vec<Arc<str>>,
    exclusions: HashSet<Arc<str>>,
}

impl DimensionsSpec {
    pub fn new(dimensions: Vec<Arc<str>>, exclusions: Vec<Arc<str>>) -> DimensionsSpec {
        DimensionsSpec {
            dimensions,
            exclusions: exclusions.into_iter().collect(),
        }
    }

    pub fn dimension_names(&self) -> &[Arc<str>] {
        self.dimensions.as_slice()
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclusions.contains(name)
    }

    pub fn select(&self, row: &FlatRow) -> Vec<Arc<str>> {
        if !self.dimensions.is_empty() {
            self.dimensions.clone()
        } else {
            let mut names: Vec<Arc<str>> = row
                .field_names()
                .into_iter()
                .filter(|n| !self.exclusions.contains(n))
                .collect();
            // map iteration order is not stable across runs
            names.sort();
            names
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParseSpec {
    timestamp_spec: TimestampSpec,
    dimensions_spec: DimensionsSpec,
}

impl ParseSpec {
    pub fn new(timestamp_spec: TimestampSpec, dimensions_spec: DimensionsSpec) -> ParseSpec {
        ParseSpec {
            timestamp_spec,
            dimensions_spec,
        }
    }

    pub fn timestamp_spec(&self) -> &TimestampSpec {
        &self.timestamp_spec
    }

    pub fn dimensions_spec(&self) -> &DimensionsSpec {
        &self.dimensions_spec
    }
}
