// isocss/src/lib.rs
//! # isocss CLI Application
//!
//! This crate provides the command-line driver for `isocss-core`: it finds
//! stylesheets, resolves where their isolated versions go, and runs the core
//! pipeline on each file concurrently.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;

pub use commands::isolate::{RunSummary, run_isolate};
