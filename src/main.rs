use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use addonmgr_config::{AddonRef, LifecycleStep, WorkflowTemplate, workflow_name};
use addonmgr_lifecycle::{
  AddonLifecycle, LifecycleConfig, TracingRecorder, WorkflowLifecycle, prepare_job,
};
use addonmgr_store::MemoryStore;

/// addonmgr - Addon workflow lifecycle tooling
#[derive(Parser)]
#[command(name = "addonmgr")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Render the workflow an addon step would submit, without submitting it
  Render(JobArgs),

  /// Run the install lifecycle against an in-memory store
  Install {
    #[command(flatten)]
    job: JobArgs,

    /// Per-call store timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
  },
}

#[derive(Args)]
struct JobArgs {
  /// Path to the addon description (YAML)
  #[arg(long)]
  addon: PathBuf,

  /// Path to the workflow template (YAML)
  #[arg(long)]
  template: PathBuf,

  /// IAM role to annotate onto generated workloads
  #[arg(long)]
  role: Option<String>,

  /// Lifecycle step the workflow belongs to
  #[arg(long, default_value = "install", value_parser = parse_step)]
  step: LifecycleStep,

  /// Workflow name (default: derived from addon, step and checksum)
  #[arg(long)]
  name: Option<String>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  match cli.command {
    Some(Commands::Render(args)) => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(render(args))?;
    }
    Some(Commands::Install { job, timeout_secs }) => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(install(job, Duration::from_secs(timeout_secs)))?;
    }
    None => {
      println!("addonmgr - use --help to see available commands");
    }
  }

  Ok(())
}

fn parse_step(value: &str) -> Result<LifecycleStep, String> {
  LifecycleStep::from_name(value).ok_or_else(|| {
    let known: Vec<&str> = LifecycleStep::ALL.iter().map(|s| s.as_str()).collect();
    format!("expected one of: {}", known.join(", "))
  })
}

struct Loaded {
  addon: AddonRef,
  template: WorkflowTemplate,
  name: String,
}

async fn load(args: JobArgs) -> Result<Loaded> {
  let addon_content = tokio::fs::read_to_string(&args.addon)
    .await
    .with_context(|| format!("failed to read addon file: {}", args.addon.display()))?;

  let addon: AddonRef = serde_yaml::from_str(&addon_content)
    .with_context(|| format!("failed to parse addon file: {}", args.addon.display()))?;

  let body = tokio::fs::read_to_string(&args.template)
    .await
    .with_context(|| format!("failed to read template file: {}", args.template.display()))?;

  let mut template = WorkflowTemplate::new(body);
  if let Some(role) = args.role {
    template = template.with_role(role);
  }

  let name = match args.name {
    Some(name) => name,
    None => workflow_name(&addon, args.step),
  };

  Ok(Loaded {
    addon,
    template,
    name,
  })
}

async fn render(args: JobArgs) -> Result<()> {
  let Loaded {
    addon,
    template,
    name,
  } = load(args).await?;

  let job = prepare_job(&addon, &template, &name).context("failed to render workflow")?;

  print!("{}", serde_yaml::to_string(&job.into_value())?);

  Ok(())
}

async fn install(args: JobArgs, request_timeout: Duration) -> Result<()> {
  let Loaded {
    addon,
    template,
    name,
  } = load(args).await?;

  let store = Arc::new(MemoryStore::new());
  let lifecycle = WorkflowLifecycle::with_recorder(
    store.clone(),
    addon,
    LifecycleConfig { request_timeout },
    TracingRecorder,
  );

  let cancel = CancellationToken::new();
  let ctrl_c = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      ctrl_c.cancel();
    }
  });

  let phase = lifecycle
    .install(&template, &name, &cancel)
    .await
    .context("install failed")?;

  eprintln!("Addon {} workflow {} phase: {}", lifecycle.addon().key(), name, phase);
  eprintln!("Executions in store: {}", store.len().await);

  Ok(())
}
