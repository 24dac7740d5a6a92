use std::sync::Arc;

use crate::conf::external::ExternalConfig;
use crate::conf::{CliArgs, ConfigError};
use crate::row::{str2tsformat, DimensionsSpec, ParseSpec, StructRowParser, TimestampSpec};
use crate::DynError;

macro_rules! args_or_external_opt {
    ($a:expr,$b:expr, $prop:ident, $err: expr) => {
        if $a.$prop.is_some() {
            Ok($a.$prop.as_ref().unwrap())
        } else {
            if ($b.$prop.is_some()) {
                Ok($b.$prop.as_ref().unwrap())
            } else {
                let my_err: DynError = Box::new(ConfigError::new($err));
                Err(my_err)
            }
        }
    };
}

macro_rules! args_or_external_opt_default {
    ($a:expr,$b:expr, $prop:ident, $def: expr) => {
        if $a.$prop.is_some() {
            $a.$prop.as_ref().unwrap()
        } else {
            if ($b.$prop.is_some()) {
                $b.$prop.as_ref().unwrap()
            } else {
                $def
            }
        }
    };
}

macro_rules! args_or_external_vec_default {
    ($a:expr,$b:expr, $prop:ident, $def: expr) => {
        if $a.$prop.is_empty() {
            if $b.$prop.is_some() {
                let ret_ref = $b.$prop.as_ref().unwrap();
                if ret_ref.is_empty() {
                    $def
                } else {
                    ret_ref
                }
            } else {
                $def
            }
        } else {
            &$a.$prop
        }
    };
}

macro_rules! args_or_external_bool_default {
    ($a:expr,$b:expr, $prop:ident, $def: expr) => {
        if $a.$prop {
            $a.$prop
        } else {
            if ($b.$prop.is_some()) {
                $b.$prop.unwrap()
            } else {
                $def
            }
        }
    };
}

#[derive(Debug, Clone)]
pub struct FlattenConfig {
    type_string: Option<String>,
    map_field_name_format: Option<String>,

    timestamp_column: String,
    timestamp_format: String,

    dimensions: Vec<String>,
    dimension_exclusions: Vec<String>,

    strict_shapes: bool,
}

impl FlattenConfig {
    pub fn new(args: &CliArgs) -> Result<FlattenConfig, DynError> {
        let external_conf = args.get_external_conf()?;
        let timestamp_column = args_or_external_opt!(
            &args,
            &external_conf,
            timestamp_column,
            "A timestamp column is required"
        )?;
        let timestamp_format =
            args_or_external_opt_default!(&args, &external_conf, timestamp_format, "auto");
        let empty_vec = Vec::new();
        let dimensions =
            args_or_external_vec_default!(&args, &external_conf, dimensions, &empty_vec);
        let dimension_exclusions =
            args_or_external_vec_default!(&args, &external_conf, dimension_exclusions, &empty_vec);
        let type_string = if args.type_string.is_some() {
            args.type_string.clone()
        } else {
            external_conf.type_string.clone()
        };
        let map_field_name_format = if args.map_field_name_format.is_some() {
            args.map_field_name_format.clone()
        } else {
            external_conf.map_field_name_format.clone()
        };
        let strict_shapes =
            args_or_external_bool_default!(&args, &external_conf, strict_shapes, false);
        Ok(Self {
            type_string,
            map_field_name_format,
            timestamp_column: timestamp_column.to_string(),
            timestamp_format: timestamp_format.to_string(),
            dimensions: dimensions.clone(),
            dimension_exclusions: dimension_exclusions.clone(),
            strict_shapes,
        })
    }

    pub fn parse_spec(&self) -> ParseSpec {
        let timestamp_spec = TimestampSpec::new(
            self.timestamp_column.as_str(),
            str2tsformat(self.timestamp_format.as_str()),
        );
        let dimensions_spec = DimensionsSpec::new(
            self.dimensions
                .iter()
                .map(|d| Arc::from(d.as_str()))
                .collect(),
            self.dimension_exclusions
                .iter()
                .map(|d| Arc::from(d.as_str()))
                .collect(),
        );
        ParseSpec::new(timestamp_spec, dimensions_spec)
    }

    pub fn build_parser(&self) -> Result<StructRowParser, DynError> {
        let parser = StructRowParser::new(
            self.parse_spec(),
            self.type_string.clone(),
            self.map_field_name_format.clone(),
            self.strict_shapes,
        )?;
        Ok(parser)
    }

    pub fn type_string(&self) -> &Option<String> {
        &self.type_string
    }

    pub fn timestamp_column(&self) -> &str {
        self.timestamp_column.as_str()
    }

    pub fn strict_shapes(&self) -> bool {
        self.strict_shapes
    }
}
