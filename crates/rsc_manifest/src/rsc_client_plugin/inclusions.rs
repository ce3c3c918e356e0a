use std::sync::Arc;

use indexmap::IndexSet;
use rsc_manifest_core::compilation::Compilation;
use rsc_manifest_core::compilation::EntryOptions;
use rsc_manifest_core::diagnostic::Diagnostic;
use rsc_manifest_core::diagnostic::ErrorKind;
use rsc_manifest_core::module_factory::build_module_tree;
use rsc_manifest_core::module_factory::ModuleTree;
use rsc_manifest_core::types::ClientReferencesMap;
use rsc_manifest_core::types::Dependency;
use rsc_manifest_core::types::DependencyId;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::PLUGIN_NAME;

/// Upper bound of module trees built at the same time
const MAX_CONCURRENT_INCLUSIONS: usize = 16;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct InclusionId(usize);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InclusionKind {
  /// A module declaring client references, included as its own entry
  ClientReference,
  /// A stylesheet included with every entry
  Style,
}

/// A module forced into the compilation
#[derive(Clone, Debug, PartialEq)]
pub struct Inclusion {
  pub resource: String,
  pub kind: InclusionKind,
  pub dependency_id: DependencyId,
}

/// Inclusions made for the current build, in request order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inclusions {
  inclusions: Vec<Inclusion>,
}

impl Inclusions {
  pub fn push(&mut self, inclusion: Inclusion) -> InclusionId {
    self.inclusions.push(inclusion);
    InclusionId(self.inclusions.len() - 1)
  }

  pub fn get(&self, id: InclusionId) -> Option<&Inclusion> {
    self.inclusions.get(id.0)
  }

  pub fn iter(&self) -> impl Iterator<Item = (InclusionId, &Inclusion)> {
    self
      .inclusions
      .iter()
      .enumerate()
      .map(|(index, inclusion)| (InclusionId(index), inclusion))
  }

  pub fn len(&self) -> usize {
    self.inclusions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.inclusions.is_empty()
  }
}

struct InclusionRequest {
  resource: String,
  kind: InclusionKind,
}

/// Adds every client reference module and stylesheet to the compilation
///
/// Client reference modules become entries named by their resource that depend on `entry_name`.
/// Stylesheets are added to the global entry. Module trees are built concurrently and only
/// merged into the compilation once all of them were built, so a failure leaves the compilation
/// untouched.
#[tracing::instrument(level = "info", skip_all, fields(entry = entry_name))]
pub(crate) async fn include_client_references(
  compilation: &mut Compilation,
  client_references: &ClientReferencesMap,
  styles: &IndexSet<String>,
  entry_name: &str,
) -> anyhow::Result<Inclusions> {
  let requests = client_references
    .keys()
    .map(|resource| InclusionRequest {
      resource: resource.clone(),
      kind: InclusionKind::ClientReference,
    })
    .chain(styles.iter().map(|resource| InclusionRequest {
      resource: resource.clone(),
      kind: InclusionKind::Style,
    }))
    .collect::<Vec<_>>();

  if requests.is_empty() {
    return Ok(Inclusions::default());
  }

  let trees = build_module_trees(compilation, &requests).await?;

  let mut inclusions = Inclusions::default();
  for (request, tree) in requests.into_iter().zip(trees) {
    let (dependency, options) = match request.kind {
      InclusionKind::ClientReference => (
        Dependency::include(&request.resource, Some(request.resource.clone())),
        EntryOptions {
          name: Some(request.resource.clone()),
          depend_on: vec![entry_name.to_string()],
        },
      ),
      InclusionKind::Style => (
        Dependency::include(&request.resource, None),
        EntryOptions::default(),
      ),
    };

    let dependency_id = compilation.add_include(dependency, tree, options);
    tracing::debug!(resource = %request.resource, kind = ?request.kind, "Included module");

    inclusions.push(Inclusion {
      resource: request.resource,
      kind: request.kind,
      dependency_id,
    });
  }

  Ok(inclusions)
}

/// Builds the module tree of every request, returning them in request order
///
/// The first failure cancels the builds still running.
async fn build_module_trees(
  compilation: &Compilation,
  requests: &[InclusionRequest],
) -> anyhow::Result<Vec<ModuleTree>> {
  let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_INCLUSIONS));
  let mut tasks = JoinSet::new();

  for (index, request) in requests.iter().enumerate() {
    let factory = compilation.module_factory.clone();
    let context = compilation.context.clone();
    let resource = request.resource.clone();
    let semaphore = semaphore.clone();

    tasks.spawn(async move {
      let _permit = semaphore.acquire_owned().await?;
      let tree = build_module_tree(factory.as_ref(), &context, &resource).await;
      anyhow::Ok((index, tree))
    });
  }

  let mut trees = requests.iter().map(|_| None).collect::<Vec<_>>();

  while let Some(result) = tasks.join_next().await {
    let (index, tree) = match result {
      Ok(Ok(result)) => result,
      Ok(Err(error)) => {
        tasks.abort_all();
        return Err(error);
      }
      Err(error) => {
        tasks.abort_all();
        return Err(error.into());
      }
    };

    match tree {
      Ok(tree) => trees[index] = Some(tree),
      Err(error) => {
        tasks.abort_all();
        let resource = &requests[index].resource;
        tracing::debug!(%resource, "Inclusion failed, cancelling the remaining inclusions");

        return Err(error.context(
          Diagnostic::new(
            ErrorKind::InclusionFailure,
            format!("Failed to include {}", resource),
          )
          .with_origin(PLUGIN_NAME)
          .with_file_path(resource),
        ));
      }
    }
  }

  trees
    .into_iter()
    .zip(requests)
    .map(|(tree, request)| {
      tree.ok_or_else(|| anyhow::anyhow!("Inclusion of {} did not complete", request.resource))
    })
    .collect()
}
