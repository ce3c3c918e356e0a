use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::types::Module;

pub type ModuleFactoryRef = Arc<dyn ModuleFactory>;

/// Resolves and creates modules for requests
///
/// This is the bundler's resolver and loader pipeline as seen by the compilation.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ModuleFactory: Send + Sync {
  /// Creates the module a request made from `context` resolves to
  async fn create(&self, context: &Path, request: &str) -> anyhow::Result<Module>;
}

/// A module created for a request together with every module it imports
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModuleTree {
  /// Identifier of the module the request resolved to
  pub root: String,
  /// Modules in discovery order
  pub modules: Vec<Module>,
  /// `(origin identifier, request, target identifier)` in discovery order
  pub connections: Vec<(String, String, String)>,
}

/// Factorizes `request` and, breadth first, every request of the modules it pulls in
///
/// Requests of a module are resolved from the directory of its resource.
#[tracing::instrument(level = "debug", skip(factory))]
pub async fn build_module_tree(
  factory: &dyn ModuleFactory,
  context: &Path,
  request: &str,
) -> anyhow::Result<ModuleTree> {
  let root = factory.create(context, request).await?;

  let mut tree = ModuleTree {
    root: root.identifier.clone(),
    ..ModuleTree::default()
  };
  let mut seen = HashSet::from([root.identifier.clone()]);
  let mut queue = VecDeque::from([root]);

  while let Some(module) = queue.pop_front() {
    let module_context = module
      .name_for_condition()
      .and_then(|path| Path::new(path).parent())
      .map(Path::to_path_buf)
      .unwrap_or_else(|| context.to_path_buf());

    for request in &module.requests {
      let target = factory.create(&module_context, request).await?;

      tree.connections.push((
        module.identifier.clone(),
        request.clone(),
        target.identifier.clone(),
      ));

      if seen.insert(target.identifier.clone()) {
        queue.push_back(target);
      }
    }

    tree.modules.push(module);
  }

  Ok(tree)
}

/// Script extensions tried when a request does not name an existing module
const RESOLVE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "ts", "tsx"];

/// Creates modules from a fixed catalogue keyed by resource path
#[derive(Clone, Debug, Default)]
pub struct InMemoryModuleFactory {
  modules: HashMap<PathBuf, Module>,
}

impl InMemoryModuleFactory {
  pub fn new(modules: impl IntoIterator<Item = Module>) -> Self {
    let modules = modules
      .into_iter()
      .map(|module| {
        let path = module
          .name_for_condition()
          .unwrap_or(&module.identifier)
          .to_string();
        (normalize_path(Path::new(&path)), module)
      })
      .collect();

    InMemoryModuleFactory { modules }
  }

  fn resolve(&self, context: &Path, request: &str) -> Option<&Module> {
    let path = normalize_path(&context.join(request));

    if let Some(module) = self.modules.get(&path) {
      return Some(module);
    }

    RESOLVE_EXTENSIONS.iter().find_map(|extension| {
      let mut candidate = path.clone().into_os_string();
      candidate.push(".");
      candidate.push(extension);
      self.modules.get(&PathBuf::from(candidate))
    })
  }
}

#[async_trait]
impl ModuleFactory for InMemoryModuleFactory {
  async fn create(&self, context: &Path, request: &str) -> anyhow::Result<Module> {
    self.resolve(context, request).cloned().ok_or_else(|| {
      anyhow!(
        "Module not found: Can't resolve '{}' in '{}'",
        request,
        context.display()
      )
    })
  }
}

/// Lexically resolves `.` and `..` components
fn normalize_path(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();

  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        normalized.pop();
      }
      component => normalized.push(component),
    }
  }

  normalized
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn factory() -> InMemoryModuleFactory {
    InMemoryModuleFactory::new([
      Module::new("/app/src/index.js").with_requests(["./Button", "./utils/format.js"]),
      Module::new("/app/src/Button.js").with_requests(["./utils/format"]),
      Module::new("/app/src/utils/format.js").with_requests(["../Button.js"]),
    ])
  }

  #[tokio::test]
  async fn resolves_relative_requests_with_extensions() {
    let module = factory()
      .create(Path::new("/app/src/utils"), "../Button")
      .await
      .unwrap();

    assert_eq!(module.identifier, "/app/src/Button.js");
  }

  #[tokio::test]
  async fn fails_for_unknown_requests() {
    let error = factory()
      .create(Path::new("/app/src"), "./Missing")
      .await
      .unwrap_err();

    assert_eq!(
      error.to_string(),
      "Module not found: Can't resolve './Missing' in '/app/src'"
    );
  }

  #[tokio::test]
  async fn builds_trees_breadth_first_and_handles_cycles() {
    let tree = build_module_tree(&factory(), Path::new("/app"), "./src/index.js")
      .await
      .unwrap();

    assert_eq!(tree.root, "/app/src/index.js");
    assert_eq!(
      tree
        .modules
        .iter()
        .map(|module| module.identifier.as_str())
        .collect::<Vec<_>>(),
      vec![
        "/app/src/index.js",
        "/app/src/Button.js",
        "/app/src/utils/format.js"
      ]
    );
    assert_eq!(tree.connections.len(), 4);
    assert_eq!(
      tree.connections[3],
      (
        String::from("/app/src/utils/format.js"),
        String::from("../Button.js"),
        String::from("/app/src/Button.js")
      )
    );
  }

  #[tokio::test]
  async fn propagates_factory_errors() {
    let mut factory = MockModuleFactory::new();
    factory
      .expect_create()
      .returning(|_, request| Err(anyhow!("Failed to load {}", request)));

    let result = build_module_tree(&factory, Path::new("/app"), "./src/index.js").await;

    assert_eq!(
      result.map_err(|error| error.to_string()),
      Err(String::from("Failed to load ./src/index.js"))
    );
  }
}
