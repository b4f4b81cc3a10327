pub mod registry;
pub mod resource_tool;
