// Copyright 2022 Asen Lazarov

use std::error::Error;
use std::io::Write;

use clap::Parser;

use conf::*;

use crate::schema::derive_type_string;

mod conf;
mod flatten;
mod row;
mod schema;

pub type DynError = Box<dyn Error + Send + Sync>;
pub type DynBoxWrite = Box<dyn Write + Send>;

fn main_derive_type_string(
    conf: &FlattenConfig,
    outp: &mut DynBoxWrite,
) -> Result<(), DynError> {
    let spec = conf.parse_spec();
    let ts = derive_type_string(
        spec.timestamp_spec().column(),
        spec.dimensions_spec().dimension_names(),
    );
    outp.write(ts.as_bytes())?;
    outp.write("\n".as_bytes())?;
    outp.flush()?;
    Ok(())
}

fn main_print_schema(conf: &FlattenConfig, outp: &mut DynBoxWrite) -> Result<(), DynError> {
    let parser = conf.build_parser()?;
    outp.write(parser.type_string().as_bytes())?;
    outp.write("\n".as_bytes())?;
    for f in parser.schema().fields() {
        outp.write(format!("{}: {}\n", f.name(), f.kind()).as_bytes())?;
    }
    outp.flush()?;
    Ok(())
}

fn main() -> Result<(), DynError> {
    env_logger::init();
    let args: CliArgs = CliArgs::parse();
    let conf = FlattenConfig::new(&args)?;
    let mut outp: DynBoxWrite = args.get_outp()?;
    if args.derive_type_string {
        return main_derive_type_string(&conf, &mut outp);
    }
    main_print_schema(&conf, &mut outp)
}

#[test]
fn verify_app() {
    use clap::CommandFactory;
    CliArgs::command().debug_assert()
}
