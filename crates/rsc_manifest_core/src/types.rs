pub use self::asset::*;
pub use self::chunk::*;
pub use self::client_reference::*;
pub use self::dependency::*;
pub use self::manifest::*;
pub use self::module::*;
pub use self::output_options::*;
pub use self::runtime_globals::*;
pub use self::runtime_id::*;

mod asset;
mod chunk;
mod client_reference;
mod dependency;
mod manifest;
mod module;
mod output_options;
mod runtime_globals;
mod runtime_id;
