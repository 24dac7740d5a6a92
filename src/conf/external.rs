use serde::{Deserialize, Serialize};
use std::fs;
use std::io::BufReader;

use crate::DynError;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ExternalConfig {
    pub type_string: Option<String>,
    pub map_field_name_format: Option<String>,

    pub timestamp_column: Option<String>,
    pub timestamp_format: Option<String>,

    pub dimensions: Option<Vec<String>>,
    pub dimension_exclusions: Option<Vec<String>>,

    pub strict_shapes: Option<bool>,

    pub output: Option<String>,
}

impl ExternalConfig {
    pub fn from_yaml_file(fname: &str) -> Result<ExternalConfig, DynError> {
        let rdr = BufReader::new(fs::File::open(fname)?);
        match serde_yaml::from_reader(rdr) {
            Ok(pc) => Ok(pc),
            Err(e) => Err(Box::new(e)),
        }
    }

    pub fn empty() -> Self {
        Self {
            type_string: None,
            map_field_name_format: None,
            timestamp_column: None,
            timestamp_format: None,
            dimensions: None,
            dimension_exclusions: None,
            strict_shapes: None,
            output: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::conf::external::ExternalConfig;

    #[test]
    fn test_empty_deser() {
        let yaml = "{}";
        let pc: ExternalConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(pc, ExternalConfig::empty());
    }

    #[test]
    fn test_deser() {
        let yaml = "timestamp_column: ts\ndimensions:\n  - host\n  - service\n";
        let pc: ExternalConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(pc.timestamp_column, Some("ts".to_string()));
        assert_eq!(
            pc.dimensions,
            Some(vec!["host".to_string(), "service".to_string()])
        );
    }
}
