// View DSL Parser Module

pub mod ast;
pub mod command;
pub mod lexer;
pub mod pipeline;

// Public API re-exports
pub use ast::{BrushSpec, ViewCommand, ViewSpec};
pub use pipeline::parse_view_spec;
