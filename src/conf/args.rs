use std::fs;
use std::io::{self, BufWriter};

use clap::Parser;

use crate::conf::external::ExternalConfig;
use crate::{DynBoxWrite, DynError};

#[derive(Parser, Debug)]
#[clap(name = "structflat")]
#[clap(author = "Asen Lazarov <asen.lazarov@gmail.com>")]
#[clap(version = "0.1")]
#[clap(about = "Flatten decoded columnar records into time-series rows", long_about = None)]
pub struct CliArgs {
    /// Yaml config file to use for default values
    /// command line options still override conf values
    #[clap(short, long)]
    pub conf: Option<String>,

    /// Struct type string describing the decoded records,
    /// e.g. "struct<ts:string,tags:array<string>>".
    /// Derived from the timestamp column and dimensions when omitted
    #[clap(short = 't', long)]
    pub type_string: Option<String>,

    /// Name format for fields expanded from map entries,
    /// must contain both {parent} and {child}
    #[clap(short = 'm', long)]
    pub map_field_name_format: Option<String>,

    /// Timestamp column name
    #[clap(short = 'T', long)]
    pub timestamp_column: Option<String>,

    /// Timestamp format. One of:
    ///     auto (default), iso, millis, posix, or a strftime pattern
    #[clap(short = 'F', long)]
    pub timestamp_format: Option<String>,

    /// Dimension column names, can be multiple
    #[clap(short = 'd', long)]
    pub dimensions: Vec<String>,

    /// Column names excluded from the derived dimension list
    #[clap(short = 'x', long)]
    pub dimension_exclusions: Vec<String>,

    /// Reject unsupported nested shapes at schema compile time
    /// instead of silently dropping those fields
    #[clap(long)]
    pub strict_shapes: bool,

    /// Print the type string derived from the timestamp column
    /// and dimensions, then exit
    #[clap(long)]
    pub derive_type_string: bool,

    ///Output destination
    #[clap(short, long)]
    pub output: Option<String>,
}

impl CliArgs {
    pub fn get_external_conf(&self) -> Result<ExternalConfig, DynError> {
        if self.conf.is_some() {
            let pc = ExternalConfig::from_yaml_file(self.conf.as_ref().unwrap().as_str())?;
            Ok(pc)
        } else {
            Ok(ExternalConfig::empty())
        }
    }

    pub fn get_outp(&self) -> Result<DynBoxWrite, DynError> {
        let writer: DynBoxWrite = match &self.output {
            None => Box::new(BufWriter::new(io::stdout())),
            Some(filename) => {
                if filename == "-" {
                    Box::new(BufWriter::new(io::stdout()))
                } else {
                    Box::new(BufWriter::new(fs::File::create(filename)?))
                }
            }
        };
        Ok(writer)
    }
}
