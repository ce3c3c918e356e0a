use bitflags::bitflags;

bitflags! {
  /// Runtime helpers a chunk tree needs to be present in the bundle runtime
  #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
  pub struct RuntimeGlobals: u32 {
    /// The module require function
    const REQUIRE = 1 << 0;
    /// Loads additional chunks on demand
    const ENSURE_CHUNK = 1 << 1;
    /// Default export interop for non-harmony modules
    const COMPAT_GET_DEFAULT_EXPORT = 1 << 2;
    /// The configured public path
    const PUBLIC_PATH = 1 << 3;
  }
}
