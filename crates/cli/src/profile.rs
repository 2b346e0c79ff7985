//! `polaudit profile`: inspect and validate field profiles.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use log::info;
use polaudit_config::Settings;
use polaudit_recon::FieldProfile;

use crate::exit_codes::{EXIT_ERROR, EXIT_INVALID_PROFILE, EXIT_READ};
use crate::CliError;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Check that a field profile parses and passes validation
    #[command(after_help = "\
Examples:
  polaudit profile validate carriers/acme.toml")]
    Validate {
        /// Path to the field profile (.toml)
        profile: PathBuf,
    },

    /// Print the effective field profile as TOML
    #[command(after_help = "\
Examples:
  polaudit profile show
  polaudit profile show --profile carriers/acme.toml > my-profile.toml")]
    Show {
        /// Field profile to show instead of the configured one
        #[arg(long)]
        profile: Option<PathBuf>,
    },
}

pub fn cmd_profile(cmd: ProfileCommands, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        ProfileCommands::Validate { profile } => cmd_profile_validate(&profile),
        ProfileCommands::Show { profile } => cmd_profile_show(profile.as_deref(), settings),
    }
}

/// Resolve the profile for a run: explicit path, else the one named in
/// settings, else the built-in tables.
pub fn load_effective(explicit: Option<&Path>, settings: &Settings) -> Result<FieldProfile, CliError> {
    match explicit.or(settings.field_profile.as_deref()) {
        Some(path) => load_profile(path),
        None => Ok(FieldProfile::default()),
    }
}

pub fn load_profile(path: &Path) -> Result<FieldProfile, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_READ,
        message: format!("cannot read field profile {}: {e}", path.display()),
        hint: None,
    })?;
    let profile = FieldProfile::from_toml(&text).map_err(|e| CliError {
        code: EXIT_INVALID_PROFILE,
        message: format!("{}: {e}", path.display()),
        hint: Some("run `polaudit profile show` for the built-in profile as a starting point".to_string()),
    })?;
    info!("using field profile {}", path.display());
    Ok(profile)
}

fn cmd_profile_validate(path: &Path) -> Result<(), CliError> {
    let profile = load_profile(path)?;
    eprintln!(
        "valid: {} commission alias(es), {} override alias(es), {} skip status(es)",
        profile.payment_types.commission.len(),
        profile.payment_types.override_.len(),
        profile.skip_statuses.len(),
    );
    Ok(())
}

fn cmd_profile_show(explicit: Option<&Path>, settings: &Settings) -> Result<(), CliError> {
    let profile = load_effective(explicit, settings)?;
    let text = profile.to_toml().map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e.to_string(),
        hint: None,
    })?;
    print!("{text}");
    Ok(())
}
