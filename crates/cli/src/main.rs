// scriptdoc - documentation coverage audit for script engines
// Compares engine-defined identifiers against a documentation summary.

mod diagram;
mod exit_codes;
mod logging;
mod report;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use scriptdoc_recon::{AuditConfig, FsLoader, ReconError, Verdict};

use exit_codes::{
    recon_exit_code, verdict_exit_code, EXIT_CONFIG, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "scriptdoc")]
#[command(about = "Audit which script engine functions and constants are documented")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Audit config (TOML). Defaults to the built-in C4Script layout.
    #[arg(long, short = 'c', global = true, env = "SCRIPTDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Directory that relative input paths resolve against
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Override the documentation summary path from the config
    #[arg(long, global = true)]
    docs: Option<String>,

    /// Fail the run on undocumented entities of every category, not only functions
    #[arg(long, global = true)]
    strict_constants: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Only print warnings and errors to stderr
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Print per-rule match counts and other debug events
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the audit (default when no subcommand is given)
    #[command(after_help = "\
Exit codes:
  0  clean
  1  undocumented entities in a category that fails the run
  2  integrity fault: an entity was counted twice (takes precedence over 1)
  3  an input is missing or malformed
  4  invalid configuration

Examples:
  scriptdoc
  scriptdoc check --root ../LegacyClonk
  scriptdoc check --config audit.toml --json
  scriptdoc check --strict-constants --no-color")]
    Check {
        /// Print the whole report as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Print the effective extraction rules of the loaded config
    #[command(after_help = "\
Examples:
  scriptdoc rules
  scriptdoc rules --config audit.toml
  scriptdoc rules --toml > audit.toml")]
    Rules {
        /// Print the effective config as TOML instead of a summary
        #[arg(long)]
        toml: bool,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nrecon:   scriptdoc-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nrecon:   scriptdoc-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help / --version land here too and must exit 0.
            let _ = err.print();
            return ExitCode::from(if err.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS });
        }
    };

    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
    logging::init_logging(cli.quiet, cli.verbose, color && std::io::stderr().is_terminal());

    let result = match &cli.command {
        None => cmd_check(&cli, false, color),
        Some(Commands::Check { json }) => cmd_check(&cli, *json, color),
        Some(Commands::Rules { toml }) => cmd_rules(&cli, *toml),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::Read { .. } => Some("check --root or the paths in the config".to_string()),
            ReconError::MissingDocList(_) => {
                Some("set doc_list on the category to the list name used by the summary".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

// ============================================================================
// config
// ============================================================================

fn load_config(cli: &Cli) -> Result<AuditConfig, CliError> {
    let mut config = match cli.config {
        Some(ref path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::config(format!("cannot read config {}: {e}", path.display()))
            })?;
            debug!(path = %path.display(), "loaded config file");
            AuditConfig::from_toml(&text)?
        }
        None => AuditConfig::c4script()?,
    };

    if let Some(ref docs) = cli.docs {
        config.docs = docs.clone();
    }
    if cli.strict_constants {
        config = config.strict();
    }
    Ok(config)
}

// ============================================================================
// check
// ============================================================================

fn cmd_check(cli: &Cli, json: bool, color: bool) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let loader = FsLoader::new(cli.root.clone());

    let report = scriptdoc_recon::run(&config, &loader)?;

    if json {
        let text = report::render_json(&report)
            .map_err(|e| CliError::new(EXIT_OUTPUT, format!("JSON serialization error: {e}")))?;
        println!("{text}");
    } else {
        print!("{}", report::render_text(&report, color && std::io::stdout().is_terminal()));
    }

    let verdict = report.verdict();
    info!(verdict = %verdict, "audit finished");
    match verdict {
        Verdict::Clean => Ok(()),
        Verdict::Undocumented => {
            let failing: Vec<&str> = report
                .categories
                .iter()
                .filter(|c| c.is_failing())
                .map(|c| c.name.as_str())
                .collect();
            Err(CliError::new(
                verdict_exit_code(verdict),
                format!("undocumented {} found", failing.join(", ")),
            ))
        }
        Verdict::IntegrityFault => Err(CliError::new(
            verdict_exit_code(verdict),
            "integrity check failed",
        )
        .with_hint("see the duplicate listings above")),
    }
}

// ============================================================================
// rules
// ============================================================================

fn cmd_rules(cli: &Cli, toml: bool) -> Result<(), CliError> {
    let config = load_config(cli)?;
    if toml {
        print!("{}", config.to_toml()?);
    } else {
        print!("{}", report::render_rules(&config));
    }
    Ok(())
}
