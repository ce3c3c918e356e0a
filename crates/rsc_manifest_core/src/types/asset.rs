/// A file emitted into the build output
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Asset {
  pub name: String,
  pub source: Vec<u8>,
}

impl Asset {
  pub fn new(name: impl Into<String>, source: impl Into<Vec<u8>>) -> Self {
    Asset {
      name: name.into(),
      source: source.into(),
    }
  }

  pub fn source_str(&self) -> Option<&str> {
    std::str::from_utf8(&self.source).ok()
  }
}
