//! zeitmaschine CLI library
//!
//! Configuration, paths, session handling and output formatting shared by
//! the `zm` binary and its tests.

pub mod auth;
pub mod config;
pub mod output;
pub mod paths;
pub mod terminal;
