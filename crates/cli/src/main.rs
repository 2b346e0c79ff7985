// polaudit - book-of-business vs. commission report audit

mod exit_codes;
mod profile;
mod run;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use polaudit_config::Settings;
use polaudit_io::IoError;

use exit_codes::{io_exit_code, EXIT_DECODE, EXIT_SUCCESS, EXIT_USAGE};
use profile::ProfileCommands;
use run::RunArgs;

const DECODE_HINT: &str =
    "check the file formats; ensure headers like 'Policy Number', 'Status', 'Net Payment', and 'Payment Type' exist";

#[derive(Parser)]
#[command(name = "polaudit")]
#[command(about = "Reconcile a book of business against carrier commission reports")]
#[command(version)]
struct Cli {
    /// Settings file (default: ~/.config/polaudit/settings.json)
    #[arg(long, global = true, env = "POLAUDIT_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a book of business against a commission report
    #[command(after_help = "\
Examples:
  polaudit run bob.xlsx commissions.xlsx
  polaudit run bob.csv commissions.xlsx --json > result.json
  polaudit run bob.xlsx commissions.xlsx --export --locale es
  polaudit run bob.xlsx commissions.xlsx --search acme")]
    Run(RunArgs),

    /// Inspect and validate field profiles
    #[command(subcommand)]
    Profile(ProfileCommands),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match cli.config {
        Some(ref path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let result = match cli.command {
        Commands::Run(args) => run::cmd_run(args, &settings),
        Commands::Profile(cmd) => profile::cmd_profile(cmd, &settings),
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
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let code = io_exit_code(&err);
        let error = Self { code, message: err.to_string(), hint: None };
        if code == EXIT_DECODE {
            error.with_hint(DECODE_HINT)
        } else {
            error
        }
    }
}
