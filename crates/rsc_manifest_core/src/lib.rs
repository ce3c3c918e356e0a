pub mod chunk_graph;
pub mod compilation;
pub mod diagnostic;
pub mod hash;
pub mod module_factory;
pub mod module_graph;
pub mod plugin;
pub mod types;
