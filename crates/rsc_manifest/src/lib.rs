pub use compiler::*;
pub use error::*;
pub use rsc_client_plugin::*;

pub mod compiler;
pub mod snapshot;

mod error;
mod rsc_client_plugin;

#[cfg(test)]
mod test_utils;
