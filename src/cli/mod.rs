/*!
Command resolution engine.

  command.rs   Arg / Command / Topic data model
  registry.rs  RegistryBuilder (startup merges) -> immutable Registry
  parse.rs     argv -> Context (topic:command split + positional binding)
  error.rs     ParseError
  help.rs      general help / per-command usage text

Startup code builds the registry once, then only `Registry::parse` and the
lookups are used for the rest of the process.
*/

pub mod command;
pub mod error;
pub mod help;
pub mod parse;
pub mod registry;

pub use command::{Arg, Command, Topic};
pub use error::ParseError;
pub use parse::Context;
pub use registry::{Registry, RegistryBuilder};
