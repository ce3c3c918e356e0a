/// Handle of a dependency owned by the module graph
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DependencyId(pub usize);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DependencyKind {
  /// Root dependency of a configured entry
  Entry,
  /// Root dependency added to an entry after the entries were built
  Include,
  /// Import of one module by another
  Import,
}

/// A request for a module, either from an entry or from another module
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Dependency {
  pub kind: DependencyKind,
  pub request: String,
  /// Name used when reporting on the dependency
  pub name: Option<String>,
}

impl Dependency {
  pub fn entry(request: impl Into<String>, name: Option<String>) -> Self {
    Dependency {
      kind: DependencyKind::Entry,
      request: request.into(),
      name,
    }
  }

  pub fn include(request: impl Into<String>, name: Option<String>) -> Self {
    Dependency {
      kind: DependencyKind::Include,
      request: request.into(),
      name,
    }
  }

  pub fn import(request: impl Into<String>) -> Self {
    Dependency {
      kind: DependencyKind::Import,
      request: request.into(),
      name: None,
    }
  }
}
