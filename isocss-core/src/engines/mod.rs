// isocss-core/src/engines/mod.rs
//! Concrete implementations of the `NamespaceEngine` trait, plus the
//! structural pre-check they share.

pub mod delimiters;
pub mod lessc_engine;
pub mod lightning_engine;
