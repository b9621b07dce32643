//! depmap CLI — map the import dependencies of a Python entry point.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use depmap_core::config::{MapConfig, OutputFormat, RiskLevel};
use depmap_core::graph::canonical_id;
use depmap_core::output::{build_result, write_output};
use depmap_core::pipeline::{self, MappingOutcome};
use depmap_core::report::{render_markdown, write_markdown, ReportContext};

#[derive(Parser)]
#[command(
    name = "depmap",
    about = "depmap - Map the import dependencies of a Python project"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => OutputFormat::Markdown,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Follow imports from an entry file and document every file reached
    Map {
        /// Entry Python file
        entry: PathBuf,

        /// Project root (default: nearest ancestor with .git or pyproject.toml)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Maximum import depth to follow
        #[arg(long, default_value = "999")]
        max_depth: usize,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: Format,

        /// Print every file as it is mapped
        #[arg(long)]
        verbose: bool,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Map {
            entry,
            root,
            max_depth,
            output,
            format,
            verbose,
            quiet,
        } => {
            init_tracing(verbose, quiet);

            if !entry.exists() {
                eprintln!("File does not exist: {}", entry.display());
                std::process::exit(1);
            }

            let format = OutputFormat::from(format);
            let output_path = output.unwrap_or_else(|| format.default_output_path().to_string());

            let config = MapConfig {
                format,
                ..MapConfig::for_entry(&entry, root.as_deref(), max_depth)
            };

            if quiet {
                run_quiet(&config, &output_path);
            } else {
                run_with_progress(&config, &output_path, verbose);
            }
        }
    }
}

/// Default filter for the core's tracing events. `quiet` wins over `verbose`.
fn log_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "depmap_core=error"
    } else if verbose {
        "depmap_core=debug"
    } else {
        "depmap_core=warn"
    }
}

/// Log to stderr. `RUST_LOG` overrides the flag-derived filter.
fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(verbose, quiet)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn write_report(config: &MapConfig, outcome: &MappingOutcome, output_path: &str) -> std::io::Result<()> {
    match config.format {
        OutputFormat::Json => {
            let result = build_result(config, &outcome.graph, outcome.duration_ms);
            write_output(&result, output_path)
        }
        OutputFormat::Markdown => {
            let ctx = ReportContext {
                entry: canonical_id(config.root_path(), config.entry_path()),
                root_dir: config.root_dir.clone(),
                max_depth: config.max_depth,
            };
            write_markdown(&render_markdown(&outcome.graph, &ctx), output_path)
        }
    }
}

fn run_quiet(config: &MapConfig, output_path: &str) {
    match pipeline::map_dependencies(config, None) {
        Ok(outcome) => {
            if let Err(e) = write_report(config, &outcome, output_path) {
                eprintln!("Error writing output: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Mapping failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run_with_progress(config: &MapConfig, output_path: &str, verbose: bool) {
    let pb = if verbose {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    if let Ok(spinner) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(spinner.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message("Initialising...");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    let progress: pipeline::ProgressCallback = {
        let pb = pb.clone();
        Box::new(move |id, _depth| {
            pb.set_message(format!("Mapping {id}"));
        })
    };

    let start = Instant::now();
    let outcome = match pipeline::map_dependencies(config, Some(progress)) {
        Ok(o) => o,
        Err(e) => {
            pb.finish_and_clear();
            eprintln!("Mapping failed: {e}");
            std::process::exit(1);
        }
    };
    pb.finish_and_clear();

    let graph = &outcome.graph;
    let risk = graph.risk_distribution();

    println!(
        "\n{}  depmap: {}",
        style("✓").green().bold(),
        style(
            Path::new(&config.entry_file)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        )
        .bold()
    );
    println!("  {:<14} {}", "Root:", config.root_dir);
    println!("  {:<14} {}", "Files:", graph.node_count());
    println!("  {:<14} {}", "Imports:", graph.edge_count());
    println!("  {:<14} {}", "Errors:", graph.errors().len());
    println!("  {:<14} {}", "Cycles:", graph.import_cycles().len());
    println!(
        "  {:<14} {} {}  {} {}  {} {}",
        "Risk:",
        RiskLevel::High.emoji(),
        risk.get(&RiskLevel::High).copied().unwrap_or(0),
        RiskLevel::Medium.emoji(),
        risk.get(&RiskLevel::Medium).copied().unwrap_or(0),
        RiskLevel::Low.emoji(),
        risk.get(&RiskLevel::Low).copied().unwrap_or(0),
    );
    println!(
        "  {:<14} {:.1}ms",
        "Duration:",
        start.elapsed().as_secs_f64() * 1000.0
    );

    if let Err(e) = write_report(config, &outcome, output_path) {
        eprintln!("Error writing output: {e}");
        std::process::exit(1);
    }

    println!(
        "\n  {} {}",
        style("Output written to:").green(),
        output_path
    );
}
