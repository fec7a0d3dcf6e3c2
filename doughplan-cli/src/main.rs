mod overrides;
mod reports;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use doughplan_core::{
    ConfigSnapshot, ConfigSource, EmbeddedConfig, FieldValue, FileConfig, ResolutionRequest,
    resolve_session,
};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use reports::JsonReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored human-readable summary
    Console,
    /// Pretty-printed resolution document
    Json,
    /// Markdown tables
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "doughplan", version)]
#[command(about = "Resolve a dough formulation into a validated session and ingredient masses")]
struct Args {
    /// Formulation catalog JSON (defaults to the embedded catalog)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Method id; unknown ids fall back to the first cataloged method
    #[arg(long)]
    method: Option<String>,

    /// Preset id; unknown ids are ignored
    #[arg(long)]
    preset: Option<String>,

    /// Field override as key=value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = overrides::parse_assignment)]
    assignments: Vec<(String, FieldValue)>,

    /// JSON object of field overrides, applied before any --set
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// List available methods and presets and exit
    #[arg(long)]
    list: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let snapshot = load_snapshot(&args)?;
    if args.output.is_some() {
        colored::control::set_override(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;

    if args.list {
        reports::write_catalog_listing(output_target.writer(), &snapshot)?;
        output_target.flush_inner()?;
        return Ok(());
    }

    let request = build_request(&args)?;
    let resolution = resolve_session(&snapshot, &request);
    let method = snapshot.method_or_default(request.method_id.as_deref());
    log::info!(
        "resolved method {} with {} warning(s)",
        method.id,
        resolution.warnings.len()
    );

    let method_name = if method.name.is_empty() {
        method.id.as_str()
    } else {
        method.name.as_str()
    };
    match args.report {
        ReportFormat::Json => {
            let report = JsonReport {
                method_id: &method.id,
                preset_id: request.preset_id.as_deref(),
                resolution: &resolution,
            };
            reports::generate_json_report(&mut output_target, &report)?;
        }
        ReportFormat::Markdown => {
            reports::generate_markdown_report(&mut output_target, method_name, &resolution)?;
        }
        ReportFormat::Console => {
            reports::generate_console_report(&mut output_target, method_name, &resolution)?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_snapshot(args: &Args) -> Result<ConfigSnapshot> {
    match &args.config {
        Some(path) => FileConfig::new(path)
            .load_snapshot()
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => EmbeddedConfig
            .load_snapshot()
            .context("embedded catalog is invalid"),
    }
}

fn build_request(args: &Args) -> Result<ResolutionRequest> {
    let mut request = ResolutionRequest::new(args.method.as_deref(), args.preset.as_deref());
    request.user_session_overrides =
        overrides::collect_overrides(args.overrides.as_deref(), &args.assignments)?;
    Ok(request)
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
