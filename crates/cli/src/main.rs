mod commands;
mod logging;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use unitspec_core::Urn;
use unitspec_eval::EngineConfig;

/// Identity used when `--owner` is not given.
const DEFAULT_OWNER: &str = "urn:local:0";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Unit spec toolchain.
#[derive(Parser)]
#[command(name = "unitspec", version, about = "Unit spec toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output (JSON errors are still printed)
    #[arg(long, global = true)]
    quiet: bool,

    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a spec file and print its tree as JSON
    Parse {
        /// Path to the spec file
        file: PathBuf,
        /// Identity recorded as caller of every reference
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: Urn,
    },

    /// Parse a spec file and print its canonical text
    Render {
        /// Path to the spec file
        file: PathBuf,
        /// Identity recorded as caller of every reference
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: Urn,
    },

    /// Print the argument overrides declared in a spec file
    Overrides {
        /// Path to the spec file
        file: PathBuf,
        /// Identity recorded as caller of every reference
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: Urn,
    },

    /// Instantiate a spec file against a JSON users directory
    Instantiate {
        /// Path to the spec file
        file: PathBuf,
        /// Users directory: {"<owner urn>": {"<unit>": "<spec>"}}
        #[arg(long)]
        directory: PathBuf,
        /// Identity the spec is instantiated as
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: Urn,
        /// Rule name placed in the work coordinates
        #[arg(long, default_value = "manual")]
        rule: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Parse { file, owner } => {
            commands::parse::cmd_parse(&file, &owner, cli.output, cli.quiet);
        }
        Commands::Render { file, owner } => {
            commands::render::cmd_render(&file, &owner, cli.output, cli.quiet);
        }
        Commands::Overrides { file, owner } => {
            commands::overrides::cmd_overrides(&file, &owner, cli.output, cli.quiet);
        }
        Commands::Instantiate {
            file,
            directory,
            owner,
            rule,
        } => {
            let config = load_config(cli.config.as_deref(), cli.output, cli.quiet);
            commands::instantiate::cmd_instantiate(
                commands::instantiate::InstantiateOptions {
                    file: &file,
                    directory: &directory,
                    owner: &owner,
                    rule: &rule,
                    config,
                },
                cli.output,
                cli.quiet,
            );
        }
    }
}

fn load_config(path: Option<&Path>, output: OutputFormat, quiet: bool) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };
    match EngineConfig::load(path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), ?config, "loaded engine config");
            config
        }
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

/// Read a file or exit with a reported error.
pub(crate) fn read_file(path: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Print a structured error: the JSON value in json mode, the message otherwise.
///
/// `--quiet` silences text-mode messages only; json mode always reports.
pub(crate) fn report_json_error(
    value: &serde_json::Value,
    msg: &str,
    output: OutputFormat,
    quiet: bool,
) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::json!({ "error": value });
            let pretty = serde_json::to_string_pretty(&err_json)
                .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\"")));
            eprintln!("{}", pretty);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", msg);
            }
        }
    }
}

/// Print a plain error message, with the same `--quiet` rule as
/// [`report_json_error`].
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Text => {
            if !quiet {
                eprintln!("{}", msg);
            }
        }
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
