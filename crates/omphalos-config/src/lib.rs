//! Configuration for Omphalos worlds.
//!
//! World, planet and debug settings persist to disk as a RON file. Values can
//! be overridden from the command line via clap, and a running host can poll
//! the file for changes. Unknown and missing fields are tolerated so older
//! and newer files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig};
pub use error::ConfigError;
