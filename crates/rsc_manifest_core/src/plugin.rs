pub use bundler_plugin::*;
pub use compilation_plugin::*;

mod bundler_plugin;
mod compilation_plugin;
