//! sbom-license-audit: license-conflict auditing for dependency changes

use anyhow::{bail, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbom_license_audit::{
    cli::{self, CheckCommand, DiffCommand, RunCommand},
    config::{self, AppConfig, Validatable},
    pipeline::exit_codes,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbom-license-audit")]
#[command(version)]
#[command(about = "License-conflict auditing for dependency changes", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Component changes detected (--fail-on-change)
    2  License conflicts found
    3  Error occurred

EXAMPLES:
    # Show what changed between two inventories
    sbom-license-audit diff bom-prev.xml bom.xml

    # Matrix-only license check, no model server
    sbom-license-audit check bom.xml --previous bom-prev.xml --license Apache-2.0 --offline

    # Full run after pom.xml changed
    sbom-license-audit run --manifest pom.xml")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `diff` subcommand
#[derive(Args)]
struct DiffArgs {
    /// Previous inventory (a missing file counts as empty)
    previous: PathBuf,

    /// Current inventory
    current: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Exit with code 1 if any component changed
    #[arg(long)]
    fail_on_change: bool,
}

/// Model server and analysis overrides shared by `check` and `run`
#[derive(Args)]
struct AnalysisArgs {
    /// Own license, overriding the licensing survey
    #[arg(long)]
    license: Option<String>,

    /// Compatibility matrix CSV
    #[arg(long)]
    matrix: Option<PathBuf>,

    /// Directory with prompt template overrides
    #[arg(long)]
    prompts_dir: Option<PathBuf>,

    /// Model server host
    #[arg(long, env = "SBOM_LICENSE_AUDIT_HOST")]
    host: Option<String>,

    /// Model server port
    #[arg(long, env = "SBOM_LICENSE_AUDIT_PORT")]
    port: Option<u16>,

    /// Model for the reasoning and categorization sessions
    #[arg(long)]
    analysis_model: Option<String>,

    /// Model for the change report
    #[arg(long)]
    chat_model: Option<String>,

    /// Never contact the model server
    #[arg(long)]
    offline: bool,

    /// Project root (defaults to the current directory)
    #[arg(long)]
    project_root: Option<PathBuf>,
}

impl AnalysisArgs {
    /// CLI overrides as a config layered over the file config
    fn overrides(&self) -> AppConfig {
        let mut overrides = AppConfig::default();
        if let Some(host) = &self.host {
            overrides.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            overrides.server.port = port;
        }
        if let Some(model) = &self.analysis_model {
            overrides.model.analysis_model.clone_from(model);
        }
        if let Some(model) = &self.chat_model {
            overrides.model.chat_model.clone_from(model);
        }
        overrides.model.offline = self.offline;
        overrides.analysis.matrix_path.clone_from(&self.matrix);
        overrides.analysis.prompts_dir.clone_from(&self.prompts_dir);
        overrides.analysis.target_license.clone_from(&self.license);
        overrides
    }
}

/// Arguments for the `check` subcommand
#[derive(Args)]
struct CheckArgs {
    /// Current inventory
    current: PathBuf,

    /// Previous inventory; without one every component counts as added
    #[arg(long)]
    previous: Option<PathBuf>,

    #[command(flatten)]
    analysis: AnalysisArgs,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Exit with code 2 if any license conflict remains
    #[arg(long)]
    fail_on_conflict: bool,
}

/// Arguments for the `run` subcommand
#[derive(Args)]
struct RunArgs {
    /// Build manifest whose change triggered the run, relative to the project root
    #[arg(long)]
    manifest: PathBuf,

    /// Pre-built inventory to use instead of running the CycloneDX Maven plugin
    #[arg(long)]
    bom: Option<PathBuf>,

    #[command(flatten)]
    analysis: AnalysisArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two inventories
    Diff(DiffArgs),

    /// Check licenses added between two inventories
    Check(CheckArgs),

    /// Regenerate the inventory and audit the change
    Run(RunArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .sbom-license-audit.yaml in the current directory
    Init,
    /// Generate JSON Schema for the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match dispatch(cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Effective config: file values with CLI overrides on top, validated.
fn effective_config(explicit: Option<&std::path::Path>, overrides: &AppConfig) -> Result<AppConfig> {
    let (config, loaded_from) = AppConfig::from_file_with_overrides(explicit, overrides);
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }
    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("Invalid configuration: {}", error);
        }
        bail!("{} configuration error(s)", errors.len());
    }
    Ok(config)
}

fn dispatch(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Diff(args) => cli::run_diff(DiffCommand {
            previous: args.previous,
            current: args.current,
            json: args.json,
            output_file: args.output_file,
            fail_on_change: args.fail_on_change,
        }),

        Commands::Check(args) => {
            let config = effective_config(cli.config.as_deref(), &args.analysis.overrides())?;
            cli::run_check(CheckCommand {
                current: args.current,
                previous: args.previous,
                project_root: cli::resolve_project_root(args.analysis.project_root.as_deref())?,
                config,
                json: args.json,
                output_file: args.output_file,
                fail_on_conflict: args.fail_on_conflict,
            })
        }

        Commands::Run(args) => {
            let config = effective_config(cli.config.as_deref(), &args.analysis.overrides())?;
            cli::run_audit(RunCommand {
                manifest: args.manifest,
                bom: args.bom,
                project_root: cli::resolve_project_root(args.analysis.project_root.as_deref())?,
                config,
            })
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sbom-license-audit", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => run_config_action(action, cli.config.as_deref()),
    }
}

fn run_config_action(action: ConfigAction, explicit: Option<&std::path::Path>) -> Result<i32> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = config::load_or_default(explicit);
            match &loaded_from {
                Some(path) => eprintln!("# Loaded from: {}", path.display()),
                None => eprintln!("# No config file found; showing defaults"),
            }
            let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths = [
                std::env::current_dir().ok(),
                dirs::config_dir().map(|p| p.join("sbom-license-audit")),
                dirs::home_dir(),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.iter().flatten() {
                eprintln!("  {}", path.display());
            }
            eprintln!();
            match config::discover_config_file(explicit) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".sbom-license-audit.yaml");
            if target.exists() {
                bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            std::fs::write(&target, config::generate_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
        ConfigAction::Schema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
        }
    }
    Ok(exit_codes::SUCCESS)
}
