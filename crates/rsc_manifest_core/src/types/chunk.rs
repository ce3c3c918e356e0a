use indexmap::IndexSet;

use super::RuntimeGlobals;
use super::RuntimeId;

/// A unit of bundled output
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chunk {
  /// Assigned by the bundler's id strategy, chunks without one cannot be loaded by id
  pub id: Option<RuntimeId>,
  pub name: Option<String>,
  /// Output files of the chunk in emission order
  pub files: IndexSet<String>,
  pub runtime_requirements: RuntimeGlobals,
}

impl Chunk {
  pub fn new(id: impl Into<RuntimeId>) -> Self {
    Chunk {
      id: Some(id.into()),
      ..Chunk::default()
    }
  }

  pub fn with_files<I, S>(mut self, files: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.files = files.into_iter().map(Into::into).collect();
    self
  }
}

/// A group of chunks loaded together
///
/// Entrypoints are initial groups: their chunks are part of the page's initial load.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkGroup {
  pub name: Option<String>,
  pub initial: bool,
}

impl ChunkGroup {
  pub fn entrypoint(name: impl Into<String>) -> Self {
    ChunkGroup {
      name: Some(name.into()),
      initial: true,
    }
  }

  pub fn async_group(name: Option<String>) -> Self {
    ChunkGroup {
      name,
      initial: false,
    }
  }
}
