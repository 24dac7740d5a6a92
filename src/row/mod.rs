// Copyright 2022 Asen Lazarov

mod input_row;
mod parser;
mod spec;
mod time;

pub use input_row::*;
pub use parser::*;
pub use spec::*;
pub use time::*;
