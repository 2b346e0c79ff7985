// Integration tests driving the polaudit binary against the CSV fixtures.
//
// Every command runs with POLAUDIT_CONFIG pointed at a temp settings file so
// the user's real config directory is never touched.
//
// Run with: cargo test -p polaudit-cli --test cli_tests -- --nocapture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self::with_settings("{}")
    }

    fn with_settings(json: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), json).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn polaudit(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_polaudit"))
            .args(args)
            .current_dir(self.dir.path())
            .env("POLAUDIT_CONFIG", self.path("settings.json"))
            .env_remove("RUST_LOG")
            .output()
            .expect("run polaudit")
    }

    fn run_fixtures(&self, extra: &[&str]) -> Output {
        let bob = fixture("bob.csv");
        let comm = fixture("commissions.csv");
        let mut args = vec!["run", bob.to_str().unwrap(), comm.to_str().unwrap()];
        args.extend_from_slice(extra);
        self.polaudit(&args)
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn json_stdout(output: &Output) -> serde_json::Value {
    assert!(output.status.success(), "exit: {:?}\nstderr: {}", output.status, stderr(output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\n{stdout}"))
}

// ===========================================================================
// polaudit run
// ===========================================================================

#[test]
fn run_json_reports_reconciled_and_unmatched() {
    let env = Env::new();
    let val = json_stdout(&env.run_fixtures(&["--json"]));

    assert_eq!(val["active_policies_count"], 3);
    let records = val["records"].as_array().unwrap();
    let policies: Vec<&str> = records.iter().map(|r| r["policy_number"].as_str().unwrap()).collect();
    assert_eq!(policies, vec!["P2", "P3", "N/A"]);

    assert_eq!(records[0]["commission_payments"], serde_json::json!([50.0, 30.0]));
    assert_eq!(records[0]["override_total"], 20.0);
    assert_eq!(records[0]["net_total"], 100.0);
    assert_eq!(records[1]["net_total"], 0.0);

    let unmatched = val["unmatched_records"].as_array().unwrap();
    assert_eq!(unmatched.len(), 2);
    assert_eq!(unmatched[0]["policy_number"], "P1");
    assert_eq!(unmatched[0]["insured_name"], "Ana Ruiz");
    assert_eq!(unmatched[1]["policy_number"], "U9");
    assert_eq!(unmatched[1]["company"], "Blue Mutual");
    assert_eq!(unmatched[1]["net_total"], 20.0);

    assert_eq!(val["grand_total_net"], 100.0);
    assert_eq!(val["unmatched_total_net"], 120.0);
    assert_eq!(val["stats"]["skipped_by_status"], 1);
    assert_eq!(val["stats"]["unrecognized_payment_type"], 1);
}

#[test]
fn run_prints_usd_summary_to_stderr() {
    let env = Env::new();
    let output = env.run_fixtures(&[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty(), "no --json means nothing on stdout");

    let err = stderr(&output);
    assert!(err.contains("active policies: 3"), "{err}");
    assert!(err.contains("reconciled net: $100.00"), "{err}");
    assert!(err.contains("unmatched net:   $120.00 (2 policy numbers)"), "{err}");
    assert!(err.contains("total in files:  $220.00"), "{err}");
}

#[test]
fn run_is_deterministic() {
    let env = Env::new();
    let first = env.run_fixtures(&["--json"]);
    let second = env.run_fixtures(&["--json"]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn run_output_writes_json_file() {
    let env = Env::new();
    let out = env.path("result.json");
    let output = env.run_fixtures(&["--output", out.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let val: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(val["grand_total_commission"], 80.0);
}

#[test]
fn run_search_shows_subtotals() {
    let env = Env::new();
    let output = env.run_fixtures(&["--search", "acme"]);
    let err = stderr(&output);
    assert!(output.status.success(), "{err}");
    assert!(err.contains("search \"acme\":"), "{err}");
    assert!(err.contains("reconciled: 1 of 3"), "{err}");
    assert!(err.contains("unmatched:  1 of 2"), "{err}");
    // BoB summary columns skip name, policy and status
    assert!(err.contains("    P2  Ben Ortiz  Carrier: Acme Health, Plan: Silver  net $100.00"), "{err}");
    assert!(err.contains("    P1  Ana Ruiz  Acme Health  net $100.00  (unmatched)"), "{err}");
    assert!(!err.contains("Sunrise Life"), "{err}");
}

#[test]
fn run_reads_formatted_csv_amounts() {
    let env = Env::new();
    let bob = env.path("bob.csv");
    let comm = env.path("comm.csv");
    fs::write(&bob, "Policy Number,Status\nP1,Active\n").unwrap();
    fs::write(&comm, "Policy Number,Payment Type,Net Payment\nP1,Commission,\"1,234.50\"\nP1,Override,$200\n").unwrap();
    let val = json_stdout(&env.polaudit(&["run", bob.to_str().unwrap(), comm.to_str().unwrap(), "--json"]));
    assert_eq!(val["records"][0]["commission_total"], 1234.5);
    assert_eq!(val["records"][0]["override_total"], 200.0);
}

#[test]
fn run_export_default_name_uses_settings_prefix() {
    let env = Env::with_settings(r#"{ "export.filenamePrefix": "q3_audit", "export.locale": "es" }"#);
    let output = env.run_fixtures(&["--export"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let exported: Vec<String> = fs::read_dir(env.dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".xlsx"))
        .collect();
    assert_eq!(exported.len(), 1, "{exported:?}");
    assert!(exported[0].starts_with("q3_audit_"), "{exported:?}");
    assert_eq!(exported[0].len(), "q3_audit_YYYY-MM-DD.xlsx".len());
}

#[test]
fn run_export_explicit_path() {
    let env = Env::new();
    let path = env.path("audit.xlsx");
    let output = env.run_fixtures(&["--export", path.to_str().unwrap(), "--locale", "es"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(fs::read(&path).unwrap().starts_with(b"PK\x03\x04"));
}

#[test]
fn run_profile_flag_changes_aliases() {
    let env = Env::new();
    let profile = fixture("fields.toml");
    let val = json_stdout(&env.run_fixtures(&["--json", "--profile", profile.to_str().unwrap()]));
    // "Bonus" now counts as an override
    assert_eq!(val["records"][1]["override_total"], 75.0);
    assert_eq!(val["grand_total_net"], 175.0);
}

#[test]
fn run_profile_from_settings() {
    let profile = fixture("fields.toml");
    let settings = serde_json::json!({ "fields.profile": profile }).to_string();
    let env = Env::with_settings(&settings);
    let val = json_stdout(&env.run_fixtures(&["--json"]));
    assert_eq!(val["grand_total_override"], 95.0);
}

// ===========================================================================
// Failures
// ===========================================================================

#[test]
fn run_missing_file_exits_3() {
    let env = Env::new();
    let bob = fixture("bob.csv");
    let output = env.polaudit(&["run", bob.to_str().unwrap(), "does-not-exist.xlsx"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).starts_with("error: cannot read"));
}

#[test]
fn run_corrupt_workbook_exits_4_with_hint() {
    let env = Env::new();
    let bad = env.path("broken.xlsx");
    fs::write(&bad, b"PK\x03\x04this is not a workbook").unwrap();
    let bob = fixture("bob.csv");
    let output = env.polaudit(&["run", bob.to_str().unwrap(), bad.to_str().unwrap(), "--json"]);

    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty(), "no partial result on failure");
    let err = stderr(&output);
    assert!(err.contains("hint:"), "{err}");
    assert!(err.contains("'Policy Number', 'Status', 'Net Payment', and 'Payment Type'"), "{err}");
}

#[test]
fn run_image_upload_exits_4() {
    let env = Env::new();
    let png = env.path("scan.png");
    fs::write(&png, b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR").unwrap();
    let comm = fixture("commissions.csv");
    let output = env.polaudit(&["run", png.to_str().unwrap(), comm.to_str().unwrap(), "--json"]);

    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty(), "no partial result on failure");
    let err = stderr(&output);
    assert!(err.contains("PNG image is not a spreadsheet"), "{err}");
    assert!(err.contains("hint:"), "{err}");
}

#[test]
fn run_invalid_profile_exits_5() {
    let env = Env::new();
    let profile = fixture("bad_fields.toml");
    let output = env.run_fixtures(&["--profile", profile.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("payment_types.commission"));
}

#[test]
fn run_locale_without_export_is_usage_error() {
    let env = Env::new();
    let output = env.run_fixtures(&["--locale", "es"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn run_unknown_locale_is_usage_error() {
    let env = Env::new();
    let output = env.run_fixtures(&["--export", "--locale", "fr"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn headers_only_inputs_give_empty_result() {
    let env = Env::new();
    let bob = env.path("bob.csv");
    let comm = env.path("comm.csv");
    fs::write(&bob, "Policy Number,Status\n").unwrap();
    fs::write(&comm, "Policy Number,Payment Type,Net Payment\n").unwrap();
    let val = json_stdout(&env.polaudit(&["run", bob.to_str().unwrap(), comm.to_str().unwrap(), "--json"]));
    assert_eq!(val["active_policies_count"], 0);
    assert_eq!(val["records"], serde_json::json!([]));
}

// ===========================================================================
// polaudit profile
// ===========================================================================

#[test]
fn profile_validate_accepts_fixture() {
    let env = Env::new();
    let profile = fixture("fields.toml");
    let output = env.polaudit(&["profile", "validate", profile.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).starts_with("valid:"));
}

#[test]
fn profile_validate_rejects_bad_profile() {
    let env = Env::new();
    let profile = fixture("bad_fields.toml");
    let output = env.polaudit(&["profile", "validate", profile.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn profile_show_prints_builtin_tables_that_reparse() {
    let env = Env::new();
    let output = env.polaudit(&["profile", "show"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("comission"), "{text}");
    assert!(text.contains("Póliza"), "{text}");

    // What `show` prints is itself a valid profile
    let saved = env.path("shown.toml");
    fs::write(&saved, text.as_bytes()).unwrap();
    let output = env.polaudit(&["profile", "validate", saved.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}
