// isocss/src/utils/mod.rs
pub mod discovery;
pub mod paths;
pub mod project;
