use bundle_dts::{bundle_to_path, BundleError, BundleOptions};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod disk;
mod project;

use disk::DiskCompiler;
use project::{filter_files, load_project};

#[derive(Parser)]
#[command(
  name = "bundle-dts",
  about = "Bundles per-file TypeScript declaration output into one artifact"
)]
struct Cli {
  /// Package name prefix for synthesized module identifiers.
  #[arg(long)]
  name: String,

  /// Output artifact path.
  #[arg(short, long)]
  out: PathBuf,

  /// Entry module; appends a final block aliasing the package to it.
  #[arg(long)]
  main: Option<String>,

  /// Indentation unit for re-nested module bodies.
  #[arg(long, default_value = "  ", value_name = "STRING")]
  indent: String,

  /// Strip redundant `export` keywords inside module blocks.
  #[arg(long)]
  strip_exports: bool,

  /// Project configuration file, resolved against the current directory.
  #[arg(short, long, default_value = "tsconfig.json")]
  project: PathBuf,

  /// Glob of files to include (repeatable; default: all project files).
  #[arg(long = "include", value_name = "GLOB")]
  includes: Vec<String>,

  /// Glob of files to exclude (repeatable).
  #[arg(long, value_name = "GLOB")]
  exclude: Vec<String>,

  /// Emit the failure as JSON on stderr.
  #[arg(long)]
  json: bool,

  /// Emit tracing spans (JSON) for debugging.
  #[arg(long)]
  trace: bool,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
  error: &'static str,
  message: String,
  diagnostics: &'a [diagnostics::Diagnostic],
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.trace);
  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      report_failure(&cli, &err);
      ExitCode::FAILURE
    }
  }
}

fn run(cli: &Cli) -> Result<(), BundleError> {
  let config = load_project(&cli.project).map_err(BundleError::Configuration)?;
  let files = filter_files(config.files.clone(), &cli.includes, &cli.exclude)
    .map_err(BundleError::Configuration)?;
  let out_dir = config.declaration_out_dir().ok_or_else(|| {
    BundleError::Configuration(format!(
      "project file {} does not configure an output directory",
      cli.project.display()
    ))
  })?;
  let project_dir = cli
    .project
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .unwrap_or_else(|| Path::new("."));

  let mut compiler = DiskCompiler::new(
    project_dir,
    Path::new(out_dir),
    config.compiler_options.root_dir.as_deref(),
    files,
  );
  let options = BundleOptions {
    name: cli.name.clone(),
    out: Some(cli.out.clone()),
    main: cli.main.clone(),
    indent: cli.indent.clone(),
    strip_exports: cli.strip_exports,
    exclude: cli.exclude.clone(),
    includes: cli.includes.clone(),
  };
  bundle_to_path(&options, &mut compiler)
}

fn report_failure(cli: &Cli, err: &BundleError) {
  if cli.json {
    let failure = JsonFailure {
      error: error_kind(err),
      message: err.to_string(),
      diagnostics: err.diagnostics(),
    };
    match serde_json::to_string_pretty(&failure) {
      Ok(serialized) => eprintln!("{serialized}"),
      Err(_) => eprintln!("{err}"),
    }
  } else {
    eprintln!("{err}");
  }
}

fn error_kind(err: &BundleError) -> &'static str {
  match err {
    BundleError::Configuration(_) => "configuration",
    BundleError::Compilation { .. } => "compilation",
    BundleError::Emission { .. } => "emission",
    BundleError::Resolution { .. } => "resolution",
    BundleError::Stream(_) => "stream",
  }
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::DEBUG)
    .json()
    .with_ansi(false)
    .try_init();
}
