// isocss/src/commands/mod.rs
pub mod isolate;
