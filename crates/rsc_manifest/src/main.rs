use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rsc_manifest::snapshot::CompilationSnapshot;
use rsc_manifest::BuildError;
use rsc_manifest::Compiler;
use rsc_manifest::RscClientPlugin;
use rsc_manifest::RscClientPluginOptions;
use rsc_manifest_core::types::ClientReferencesMap;
use rsc_manifest_monitoring::MonitoringOptions;
use tracing::error;
use tracing::info;

/// Generates the React Server Components client and SSR manifests for a recorded build
#[derive(Parser)]
struct Args {
  /// The compilation snapshot to replay
  #[arg(short, long)]
  snapshot: PathBuf,

  /// Client references recorded by the loader, keyed by resource path
  #[arg(short, long)]
  references: PathBuf,

  #[arg(short, long, default_value = "dist")]
  out_dir: PathBuf,

  /// Plugin options as JSON, flags take precedence
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[arg(long)]
  client_manifest_filename: Option<String>,

  #[arg(long)]
  ssr_manifest_filename: Option<String>,

  /// Stylesheet to include with every entry, may be repeated
  #[arg(long = "style")]
  styles: Vec<String>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
  if let Err(error) = initialize_monitoring() {
    eprintln!("Failed to set up tracing: {:#}", error);
  }

  let args = Args::parse();
  let status = match run(args).await {
    Ok(()) => 0,
    Err(error) => {
      report_error(&BuildError::from(&error));
      1
    }
  };

  rsc_manifest_monitoring::close_monitoring();
  std::process::exit(status);
}

async fn run(args: Args) -> anyhow::Result<()> {
  let snapshot = CompilationSnapshot::from_file(&args.snapshot)?;
  let client_references = read_json::<ClientReferencesMap>(&args.references)?;
  let options = plugin_options(&args)?;

  let mut compiler = Compiler::new(
    snapshot.compiler_options(),
    snapshot.module_factory(),
    Arc::new(snapshot.bundler()),
  )
  .with_plugin(RscClientPlugin::new(Arc::new(client_references), options));

  let result = compiler.run().await?;

  for warning in &result.warnings {
    eprintln!("warning: {}", warning);
  }

  for asset in &result.assets {
    let path = args.out_dir.join(&asset.name);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, &asset.source)
      .with_context(|| format!("Failed to write {}", path.display()))?;
  }

  info!(
    assets = result.assets.len(),
    out_dir = %args.out_dir.display(),
    "Wrote build output"
  );

  Ok(())
}

fn plugin_options(args: &Args) -> anyhow::Result<RscClientPluginOptions> {
  let mut options = match &args.config {
    Some(config) => read_json::<RscClientPluginOptions>(config)?,
    None => RscClientPluginOptions::default(),
  };

  if let Some(filename) = &args.client_manifest_filename {
    options.client_manifest_filename = Some(filename.clone());
  }
  if let Some(filename) = &args.ssr_manifest_filename {
    options.ssr_manifest_filename = Some(filename.clone());
  }
  if !args.styles.is_empty() {
    options
      .styles
      .get_or_insert_with(Default::default)
      .extend(args.styles.iter().cloned());
  }

  Ok(options)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
  let contents = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read {}", path.display()))?;

  serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn report_error(error: &BuildError) {
  let diagnostics = error.diagnostics();
  if diagnostics.is_empty() {
    error!("Build failed: {}", error);
    eprintln!("error: {}", error);
    return;
  }

  for diagnostic in diagnostics {
    error!(kind = ?diagnostic.kind, "{}", diagnostic.message);
    eprintln!("error: {}", diagnostic);
    for hint in diagnostic.hints.iter().flatten() {
      eprintln!("  hint: {}", hint);
    }
  }
}

fn initialize_monitoring() -> anyhow::Result<()> {
  let options = MonitoringOptions::from_env()?;
  rsc_manifest_monitoring::initialize_monitoring(options)
}
