//! CLI domain: parse, route, and output only.
//! Detection itself lives in the library modules; the route wires them up.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::{Cli, Invocation};
pub use route::RunContext;
