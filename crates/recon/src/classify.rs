use crate::config::FieldProfile;
use crate::fields;
use crate::model::{PaymentCategory, Row};

/// What a single commission-report row contributes.
#[derive(Debug, Clone, PartialEq)]
pub enum RowClass {
    /// No usable policy number; the row is ignored entirely.
    NoPolicy,
    /// Payment status is one of the skip statuses.
    Skipped { policy_number: String, status: String },
    /// A payment row. `category` is `None` for unrecognized payment types;
    /// the row still opens a bucket for its policy but adds no amount.
    Payment {
        policy_number: String,
        category: Option<PaymentCategory>,
        payment_type: String,
        amount: f64,
    },
}

pub fn classify_row(row: &Row, profile: &FieldProfile) -> RowClass {
    let Some(policy_number) = fields::policy_number(row, profile) else {
        return RowClass::NoPolicy;
    };

    // A missing Payment Status column never skips the row
    if let Some(status) = fields::payment_status(row, profile) {
        if profile.skip_statuses.iter().any(|s| *s == status) {
            return RowClass::Skipped { policy_number, status };
        }
    }

    let payment_type = fields::payment_type(row, profile);
    let amount = fields::net_payment(row, profile);
    let category = payment_category(&payment_type, profile);

    RowClass::Payment {
        policy_number,
        category,
        payment_type,
        amount,
    }
}

/// Map a lower-cased, trimmed payment type onto a category.
pub fn payment_category(payment_type: &str, profile: &FieldProfile) -> Option<PaymentCategory> {
    let aliases = &profile.payment_types;
    if aliases.commission.iter().any(|a| a == payment_type) {
        Some(PaymentCategory::Commission)
    } else if aliases.override_.iter().any(|a| a == payment_type) {
        Some(PaymentCategory::Override)
    } else {
        None
    }
}
