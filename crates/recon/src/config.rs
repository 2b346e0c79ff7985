use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::fields::CanonicalField;

// ---------------------------------------------------------------------------
// Top-level profile
// ---------------------------------------------------------------------------

/// Lookup tables the engine reads from: header synonyms, payment-type
/// aliases, skip statuses. `FieldProfile::default()` is the built-in table
/// set; a TOML profile overrides any subset of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldProfile {
    /// Lower-cased `Payment Status` values whose rows are excluded entirely.
    pub skip_statuses: Vec<String>,
    /// Lower-cased `Status` value that marks a BoB row as active.
    pub active_status: String,
    /// Text used when insured name / company / policy number can't be resolved.
    pub fallback_text: String,
    pub headers: HeaderSynonyms,
    pub payment_types: PaymentTypeAliases,
    pub bob_display: BobDisplay,
}

impl Default for FieldProfile {
    fn default() -> Self {
        Self {
            skip_statuses: strings(&["pending", "cancelled", "failed"]),
            active_status: "active".into(),
            fallback_text: "N/A".into(),
            headers: HeaderSynonyms::default(),
            payment_types: PaymentTypeAliases::default(),
            bob_display: BobDisplay::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Header synonyms
// ---------------------------------------------------------------------------

/// Ordered synonym lists per canonical field. Earlier entries win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderSynonyms {
    pub policy_number: Vec<String>,
    pub status: Vec<String>,
    pub payment_type: Vec<String>,
    pub payment_status: Vec<String>,
    pub net_payment: Vec<String>,
    pub insured_name: Vec<String>,
    pub company_name: Vec<String>,
}

impl Default for HeaderSynonyms {
    fn default() -> Self {
        Self {
            policy_number: strings(&["Policy Number", "Policy#", "Póliza"]),
            status: strings(&["Status", "Estado"]),
            payment_type: strings(&["Payment Type", "Tipo de Pago"]),
            payment_status: strings(&["Payment Status", "Estado de Pago"]),
            net_payment: strings(&["Net Payment", "Pago Neto", "Net"]),
            insured_name: strings(&[
                "Insured Name",
                "Insured",
                "Asegurado",
                "Customer",
                "Nombre",
                "Client Name",
                "Client",
            ]),
            company_name: strings(&["Company", "Carrier", "Compañía", "Writing Company"]),
        }
    }
}

impl HeaderSynonyms {
    pub fn for_field(&self, field: CanonicalField) -> &[String] {
        match field {
            CanonicalField::PolicyNumber => &self.policy_number,
            CanonicalField::Status => &self.status,
            CanonicalField::PaymentType => &self.payment_type,
            CanonicalField::PaymentStatus => &self.payment_status,
            CanonicalField::NetPayment => &self.net_payment,
            CanonicalField::InsuredName => &self.insured_name,
            CanonicalField::CompanyName => &self.company_name,
        }
    }
}

// ---------------------------------------------------------------------------
// Payment types + BoB display
// ---------------------------------------------------------------------------

/// Lower-cased `Payment Type` values per category. Anything else is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaymentTypeAliases {
    pub commission: Vec<String>,
    #[serde(rename = "override")]
    pub override_: Vec<String>,
}

impl Default for PaymentTypeAliases {
    fn default() -> Self {
        Self {
            // "comission" is a misspelling seen in carrier exports
            commission: strings(&["commission", "comission", "comisión"]),
            override_: strings(&["override"]),
        }
    }
}

/// Controls how a BoB row is summarized for display and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BobDisplay {
    /// Columns tried (in order) for the insured name of a reconciled record.
    pub insured_name_columns: Vec<String>,
    /// Normalized column names never shown as summary fields.
    pub excluded_fields: Vec<String>,
    pub max_summary_fields: usize,
}

impl Default for BobDisplay {
    fn default() -> Self {
        let mut insured_name_columns = HeaderSynonyms::default().insured_name;
        insured_name_columns.push("Full Name".into());
        Self {
            insured_name_columns,
            excluded_fields: strings(&[
                "insured name",
                "insured",
                "asegurado",
                "customer",
                "nombre",
                "policy number",
                "status",
            ]),
            max_summary_fields: 2,
        }
    }
}

impl FieldProfile {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let profile: FieldProfile =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for field in CanonicalField::ALL {
            let synonyms = self.headers.for_field(field);
            if synonyms.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "headers.{}: at least one column name is required",
                    field.key()
                )));
            }
            if synonyms.iter().any(|s| s.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "headers.{}: column names must not be blank",
                    field.key()
                )));
            }
        }

        if self.payment_types.commission.is_empty() {
            return Err(ReconError::ConfigValidation(
                "payment_types.commission: at least one alias is required".into(),
            ));
        }
        if self.payment_types.override_.is_empty() {
            return Err(ReconError::ConfigValidation(
                "payment_types.override: at least one alias is required".into(),
            ));
        }

        // Comparisons are done on lower-cased values, so upper-case aliases
        // would never match anything.
        let aliases = self
            .payment_types
            .commission
            .iter()
            .chain(&self.payment_types.override_)
            .chain(&self.skip_statuses);
        for alias in aliases {
            if *alias != alias.trim().to_lowercase() {
                return Err(ReconError::ConfigValidation(format!(
                    "alias '{alias}' must be lower-case and trimmed"
                )));
            }
        }

        if let Some(dup) = self
            .payment_types
            .commission
            .iter()
            .find(|c| self.payment_types.override_.contains(c))
        {
            return Err(ReconError::ConfigValidation(format!(
                "payment type '{dup}' is listed as both commission and override"
            )));
        }

        if self.active_status.is_empty() || self.active_status != self.active_status.to_lowercase() {
            return Err(ReconError::ConfigValidation(
                "active_status must be a non-empty lower-case value".into(),
            ));
        }

        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
