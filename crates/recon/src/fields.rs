//! Header resolution: maps variably-named sheet columns onto canonical fields.
//!
//! Column names are compared trimmed and lower-cased. Missing columns are not
//! errors; each accessor documents the default it degrades to.

use crate::config::FieldProfile;
use crate::model::{CellValue, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    PolicyNumber,
    Status,
    PaymentType,
    PaymentStatus,
    NetPayment,
    InsuredName,
    CompanyName,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 7] = [
        Self::PolicyNumber,
        Self::Status,
        Self::PaymentType,
        Self::PaymentStatus,
        Self::NetPayment,
        Self::InsuredName,
        Self::CompanyName,
    ];

    /// Profile key for this field (`[headers]` table in TOML).
    pub fn key(&self) -> &'static str {
        match self {
            Self::PolicyNumber => "policy_number",
            Self::Status => "status",
            Self::PaymentType => "payment_type",
            Self::PaymentStatus => "payment_status",
            Self::NetPayment => "net_payment",
            Self::InsuredName => "insured_name",
            Self::CompanyName => "company_name",
        }
    }
}

pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// First value found under any synonym. Synonyms are tried in order; within
/// one synonym, the first matching column (sheet order) wins.
pub fn resolve<'r, S: AsRef<str>>(row: &'r Row, synonyms: &[S]) -> Option<&'r CellValue> {
    for synonym in synonyms {
        let target = normalize_header(synonym.as_ref());
        if let Some((_, value)) = row.iter().find(|(column, _)| normalize_header(column) == target) {
            return Some(value);
        }
    }
    None
}

pub fn resolve_field<'r>(row: &'r Row, field: CanonicalField, profile: &FieldProfile) -> Option<&'r CellValue> {
    resolve(row, profile.headers.for_field(field))
}

/// Trimmed policy number, or `None` when absent or blank.
pub fn policy_number(row: &Row, profile: &FieldProfile) -> Option<String> {
    let value = resolve_field(row, CanonicalField::PolicyNumber, profile)?;
    let text = value.to_text();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Lower-cased BoB status. Not trimmed: `" Active"` is not active.
pub fn status(row: &Row, profile: &FieldProfile) -> Option<String> {
    resolve_field(row, CanonicalField::Status, profile).map(|v| v.to_text().to_lowercase())
}

/// Lower-cased, trimmed payment status.
pub fn payment_status(row: &Row, profile: &FieldProfile) -> Option<String> {
    resolve_field(row, CanonicalField::PaymentStatus, profile).map(|v| v.to_text().trim().to_lowercase())
}

/// Lower-cased, trimmed payment type; empty when the column is missing.
pub fn payment_type(row: &Row, profile: &FieldProfile) -> String {
    resolve_field(row, CanonicalField::PaymentType, profile)
        .map(|v| v.to_text().trim().to_lowercase())
        .unwrap_or_default()
}

/// Net payment amount. Absent or unparseable values count as 0.
pub fn net_payment(row: &Row, profile: &FieldProfile) -> f64 {
    coerce_amount(resolve_field(row, CanonicalField::NetPayment, profile))
}

pub fn insured_name(row: &Row, profile: &FieldProfile) -> String {
    text_or_fallback(resolve_field(row, CanonicalField::InsuredName, profile), profile)
}

pub fn company_name(row: &Row, profile: &FieldProfile) -> String {
    text_or_fallback(resolve_field(row, CanonicalField::CompanyName, profile), profile)
}

/// Insured name shown for a reconciled BoB row (display/export only).
pub fn insured_name_from_bob(row: &Row, profile: &FieldProfile) -> String {
    text_or_fallback(resolve(row, &profile.bob_display.insured_name_columns), profile)
}

/// The first few BoB columns that aren't already shown elsewhere
/// (policy number, status, insured name).
pub fn bob_summary_fields<'r>(row: &'r Row, profile: &FieldProfile) -> Vec<(&'r str, &'r CellValue)> {
    let display = &profile.bob_display;
    row.iter()
        .filter(|(column, _)| {
            let normalized = normalize_header(column);
            !display.excluded_fields.iter().any(|x| *x == normalized)
        })
        .take(display.max_summary_fields)
        .collect()
}

fn text_or_fallback(value: Option<&CellValue>, profile: &FieldProfile) -> String {
    match value.map(CellValue::to_text) {
        Some(text) if !text.is_empty() => text,
        _ => profile.fallback_text.clone(),
    }
}

// ---------------------------------------------------------------------------
// Amount coercion
// ---------------------------------------------------------------------------

/// Coerce a cell to an amount. Numbers pass through; text is parsed from its
/// leading numeric prefix ("100.5 USD" -> 100.5). Anything else is 0.
pub fn coerce_amount(value: Option<&CellValue>) -> f64 {
    let amount = match value {
        Some(CellValue::Number(n)) => *n,
        Some(CellValue::Text(s)) => parse_leading_float(s).unwrap_or(0.0),
        Some(CellValue::Bool(_)) | None => 0.0,
    };
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

/// Parse the longest leading decimal literal of `s` (after leading
/// whitespace): `[+-]? digits [. digits] [(e|E) [+-] digits]`.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts if at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> FieldProfile {
        FieldProfile::default()
    }

    #[test]
    fn header_match_ignores_case_and_padding() {
        let row = Row::from_pairs([(" POLICY NUMBER ", "P9")]);
        assert_eq!(policy_number(&row, &profile()).as_deref(), Some("P9"));
    }

    #[test]
    fn synonym_order_breaks_ties() {
        // "Net Payment" is listed before "Net"
        let row = Row::from_pairs([("Net", CellValue::from(1.0)), ("Net Payment", CellValue::from(2.0))]);
        assert_eq!(net_payment(&row, &profile()), 2.0);
    }

    #[test]
    fn spanish_headers_resolve() {
        let row = Row::from_pairs([
            ("Póliza", CellValue::from("  X-1 ")),
            ("Tipo de Pago", CellValue::from("Comisión")),
            ("Pago Neto", CellValue::from("75.25")),
            ("Estado de Pago", CellValue::from(" Pending ")),
        ]);
        let p = profile();
        assert_eq!(policy_number(&row, &p).as_deref(), Some("X-1"));
        assert_eq!(payment_type(&row, &p), "comisión");
        assert_eq!(net_payment(&row, &p), 75.25);
        assert_eq!(payment_status(&row, &p).as_deref(), Some("pending"));
    }

    #[test]
    fn numeric_policy_number_is_stringified() {
        let row = Row::from_pairs([("Policy#", CellValue::from(1002345.0))]);
        assert_eq!(policy_number(&row, &profile()).as_deref(), Some("1002345"));
    }

    #[test]
    fn blank_policy_number_is_none() {
        let row = Row::from_pairs([("Policy Number", "   ")]);
        assert_eq!(policy_number(&row, &profile()), None);
        assert_eq!(policy_number(&Row::new(), &profile()), None);
    }

    #[test]
    fn status_is_lowercased_but_not_trimmed() {
        let row = Row::from_pairs([("Estado", "ACTIVE ")]);
        assert_eq!(status(&row, &profile()).as_deref(), Some("active "));
    }

    #[test]
    fn missing_names_fall_back() {
        let row = Row::from_pairs([("Insured", "")]);
        assert_eq!(insured_name(&row, &profile()), "N/A");
        assert_eq!(company_name(&row, &profile()), "N/A");
    }

    #[test]
    fn amount_coercion_is_permissive() {
        assert_eq!(coerce_amount(None), 0.0);
        assert_eq!(coerce_amount(Some(&CellValue::from("abc"))), 0.0);
        assert_eq!(coerce_amount(Some(&CellValue::from("$100"))), 0.0);
        assert_eq!(coerce_amount(Some(&CellValue::from("1,234.50"))), 1.0);
        assert_eq!(coerce_amount(Some(&CellValue::from(" -12.5 USD"))), -12.5);
        assert_eq!(coerce_amount(Some(&CellValue::from(true))), 0.0);
        assert_eq!(coerce_amount(Some(&CellValue::from(f64::NAN))), 0.0);
    }

    #[test]
    fn leading_float_grammar() {
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("1e3x"), Some(1000.0));
        assert_eq!(parse_leading_float("2e"), Some(2.0));
        assert_eq!(parse_leading_float("+7"), Some(7.0));
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn bob_summary_skips_known_columns() {
        let row = Row::from_pairs([
            ("Policy Number", "P1"),
            ("Insured Name", "Ana"),
            ("Carrier", "Acme"),
            ("Status", "Active"),
            ("Plan", "Gold"),
            ("Agent", "Bo"),
        ]);
        let fields: Vec<&str> = bob_summary_fields(&row, &profile()).into_iter().map(|(c, _)| c).collect();
        assert_eq!(fields, vec!["Carrier", "Plan"]);
    }

    #[test]
    fn bob_insured_name_accepts_full_name() {
        let row = Row::from_pairs([("Full Name", "Rosa Díaz")]);
        assert_eq!(insured_name_from_bob(&row, &profile()), "Rosa Díaz");
    }
}
