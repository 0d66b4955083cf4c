#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for isitaccessible
//!
//! Looks up an npm package, resolves its GitHub repository, and summarizes the
//! GitHub issues that mention accessibility keywords.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and console/JSON output
//! - [`facts`]: Data collection from npms.io and GitHub, and issue aggregation

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod facts;

pub use crate::commands::{Host, run};
