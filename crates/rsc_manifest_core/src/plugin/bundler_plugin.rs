use async_trait::async_trait;

use crate::compilation::Compilation;

/// Places the modules of a compilation into chunks
///
/// Bundlers run once modules are final. They create the chunks and chunk groups, assign module
/// ids and emit the chunk files as assets. The chunk graph is read-only afterwards.
#[async_trait]
pub trait BundlerPlugin: Send + Sync {
  async fn bundle(&self, compilation: &mut Compilation) -> Result<(), anyhow::Error>;
}

#[cfg(test)]
mod tests {
  use super::*;

  struct TestBundlerPlugin {}

  #[async_trait]
  impl BundlerPlugin for TestBundlerPlugin {
    async fn bundle(&self, _compilation: &mut Compilation) -> Result<(), anyhow::Error> {
      todo!()
    }
  }

  #[test]
  fn can_be_dyn() {
    let _bundler: Box<dyn BundlerPlugin> = Box::new(TestBundlerPlugin {});
  }
}
