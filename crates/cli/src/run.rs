//! `polaudit run`: reconcile a book of business against a commission report.

use std::path::PathBuf;

use clap::Args;
use polaudit_config::{Locale, Settings};
use polaudit_io::export::{default_filename, write_xlsx};
use polaudit_recon::fields::{bob_summary_fields, insured_name_from_bob};
use polaudit_recon::search::{filter_reconciled, filter_unmatched, Subtotals};
use polaudit_recon::{AnalysisResult, FieldProfile};

use crate::exit_codes::EXIT_ERROR;
use crate::profile::load_effective;
use crate::util::{format_currency, plural};
use crate::CliError;

#[derive(Args)]
pub struct RunArgs {
    /// Book of business (xlsx, xls, ods or csv); only the first sheet is read
    pub bob: PathBuf,

    /// Commission report (xlsx, xls, ods or csv); all sheets are read
    pub commissions: PathBuf,

    /// Output JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the xlsx audit workbook (default name: <prefix>_<date>.xlsx)
    #[arg(long, num_args = 0..=1, value_name = "PATH")]
    pub export: Option<Option<PathBuf>>,

    /// Language of the exported workbook: en or es
    #[arg(long)]
    pub locale: Option<Locale>,

    /// Field profile with header synonyms and payment-type aliases
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Show how many records match TERM and their subtotals
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,
}

pub fn cmd_run(args: RunArgs, settings: &Settings) -> Result<(), CliError> {
    if args.locale.is_some() && args.export.is_none() {
        return Err(CliError::usage("--locale only applies to the xlsx export")
            .with_hint("add --export to write the audit workbook"));
    }

    let profile = load_effective(args.profile.as_deref(), settings)?;

    let result = polaudit_io::process_files(&args.bob, &args.commissions, &profile).map_err(CliError::from)?;

    if let Some(ref path) = args.output {
        polaudit_io::json::write_result(&result, path).map_err(CliError::from)?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        let json_str = serde_json::to_string_pretty(&result).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json_str}");
    }

    print_summary(&result);

    if let Some(ref term) = args.search {
        print_search(&result, &profile, term);
    }

    if let Some(export) = args.export {
        let path = export.unwrap_or_else(|| {
            PathBuf::from(default_filename(settings.effective_prefix(), chrono::Local::now().date_naive()))
        });
        let locale = args.locale.unwrap_or(settings.locale);
        write_xlsx(&result, &profile, locale, &path).map_err(CliError::from)?;
        eprintln!("wrote {}", path.display());
    }

    Ok(())
}

// Human summary to stderr
fn print_summary(result: &AnalysisResult) {
    let stats = &result.stats;
    eprintln!(
        "active policies: {}  reconciled net: {} (commissions {}, overrides {})",
        result.active_policies_count,
        format_currency(result.grand_total_net),
        format_currency(result.grand_total_commission),
        format_currency(result.grand_total_override),
    );
    eprintln!(
        "unmatched net:   {} ({})",
        format_currency(result.unmatched_total_net),
        plural(result.unmatched_records.len(), "policy number", "policy numbers"),
    );
    eprintln!("total in files:  {}", format_currency(result.total_in_files()));

    let dropped = stats.skipped_no_policy + stats.skipped_by_status + stats.unrecognized_payment_type;
    if dropped > 0 {
        eprintln!(
            "rows: {} read, {} without policy number, {} skipped by status, {} unrecognized payment type",
            stats.commission_rows, stats.skipped_no_policy, stats.skipped_by_status, stats.unrecognized_payment_type,
        );
    }
}

// Subtotals per tab, then one line per matching record
fn print_search(result: &AnalysisResult, profile: &FieldProfile, term: &str) {
    let reconciled = filter_reconciled(&result.records, term);
    let unmatched = filter_unmatched(&result.unmatched_records, term);
    let r = Subtotals::of(&reconciled);
    let u = Subtotals::of(&unmatched);

    eprintln!("search \"{term}\":");
    eprintln!(
        "  reconciled: {} of {}  commissions {}  overrides {}  net {}",
        r.records,
        result.records.len(),
        format_currency(r.commissions),
        format_currency(r.overrides),
        format_currency(r.net),
    );
    eprintln!(
        "  unmatched:  {} of {}  commissions {}  overrides {}  net {}",
        u.records,
        result.unmatched_records.len(),
        format_currency(u.commissions),
        format_currency(u.overrides),
        format_currency(u.net),
    );

    for rec in &reconciled {
        let summary: Vec<String> = bob_summary_fields(&rec.original_bob, profile)
            .into_iter()
            .map(|(column, value)| format!("{column}: {value}"))
            .collect();
        eprintln!(
            "    {}  {}  {}  net {}",
            rec.policy_number,
            insured_name_from_bob(&rec.original_bob, profile),
            summary.join(", "),
            format_currency(rec.net_total),
        );
    }
    for rec in &unmatched {
        eprintln!(
            "    {}  {}  {}  net {}  (unmatched)",
            rec.policy_number,
            rec.insured_name,
            rec.company,
            format_currency(rec.net_total),
        );
    }
}
