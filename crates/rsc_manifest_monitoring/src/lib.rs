//! This module configures tracing for the manifest generator.
//!
//! Tracing is disabled by default and should only be initialized once per process.
use std::sync::Mutex;

pub use from_env::FromEnvError;
pub use tracer::Tracer;
pub use tracer::TracerMode;

mod from_env;
mod tracer;

pub static MONITORING_GUARD: Mutex<Option<MonitoringGuard>> = Mutex::new(None);

#[derive(Default)]
pub struct MonitoringGuard {
  #[allow(unused)]
  tracer: Option<Tracer>,
}

#[derive(Debug, Default)]
pub struct MonitoringOptions {
  pub tracing_options: Vec<TracerMode>,
}

impl MonitoringOptions {
  pub fn from_env() -> Result<Self, FromEnvError> {
    Ok(Self {
      tracing_options: TracerMode::from_env()?,
    })
  }
}

pub fn initialize_monitoring(options: MonitoringOptions) -> anyhow::Result<()> {
  let mut global = MONITORING_GUARD
    .lock()
    .map_err(|_| anyhow::anyhow!("Monitoring guard is poisoned"))?;
  if global.is_some() {
    tracing::warn!("Monitoring is getting set-up twice, this will no-op");
    return Ok(());
  }

  if options.tracing_options.is_empty() {
    *global = Some(MonitoringGuard::default());
    return Ok(());
  }

  let tracer = Tracer::new(&options.tracing_options)?;
  *global = Some(MonitoringGuard {
    tracer: Some(tracer),
  });

  Ok(())
}

/// Flushes pending trace output
pub fn close_monitoring() {
  if let Ok(mut global) = MONITORING_GUARD.lock() {
    global.take();
  }
}
