//! The smilepick binary's library surface.
//!
//! Split out of `main.rs` so integration tests can drive the assembled
//! application without a terminal.

pub mod app;
pub mod cli;
pub mod tracing_setup;

pub use app::{App, ComposerSet};
pub use cli::{CliInput, context_from_page, parse_cli_args};
pub use tracing_setup::{Verbosity, init_subscriber};
