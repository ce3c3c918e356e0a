mod diagnostic;
mod diagnostics;
mod error_kind;

pub use self::diagnostic::*;
pub use self::diagnostics::*;
pub use self::error_kind::*;
