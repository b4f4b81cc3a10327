//! Core types & traits: the tool contract, the error taxonomy, and the
//! mapping of tool outcomes onto MCP results.

pub mod content;
pub mod error;
pub mod tool;
