//! Command-line interface for isitaccessible
//!
//! Three commands are available:
//!
//! - **package**: collect the accessibility issue report for one npm package and print it
//!   as text or JSON
//! - **search**: list npm packages matching a partial name, ranked by relevance and popularity
//! - **init**: write a default configuration file
//!
//! The `common` module handles the shared setup: logging, configuration, and constructing
//! the [`crate::facts::Collector`].

mod common;
mod config;
mod console;
mod host;
mod init;
mod package;
mod run;
mod search;

#[cfg(debug_assertions)]
pub use config::Config;
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use package::{PackageArgs, process_package};
pub use run::run;
pub use search::{SearchArgs, search_packages};
