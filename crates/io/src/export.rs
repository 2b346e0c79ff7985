// XLSX export of an AnalysisResult

use std::path::Path;

use chrono::NaiveDate;
use polaudit_config::Locale;
use polaudit_recon::fields::insured_name_from_bob;
use polaudit_recon::{AnalysisResult, FieldProfile};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::IoError;

const CURRENCY_FORMAT: &str = "$#,##0.00";

/// Sheet names and column headers for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub reconciled_sheet: &'static str,
    pub unmatched_sheet: &'static str,
    pub policy_number: &'static str,
    pub insured_name: &'static str,
    pub company: &'static str,
    pub commission_total: &'static str,
    pub override_total: &'static str,
    pub net_total: &'static str,
}

impl Labels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Labels {
                reconciled_sheet: "Reconciled",
                unmatched_sheet: "Unmatched",
                policy_number: "Policy Number",
                insured_name: "Insured Name",
                company: "Company",
                commission_total: "Commission Total",
                override_total: "Override Total",
                net_total: "Net Total",
            },
            Locale::Es => Labels {
                reconciled_sheet: "Conciliadas",
                unmatched_sheet: "No Conciliadas",
                policy_number: "Número de Póliza",
                insured_name: "Nombre del Asegurado",
                company: "Empresa",
                commission_total: "Total de Comisiones",
                override_total: "Total de Bonificaciones",
                net_total: "Total Neto",
            },
        }
    }

    fn reconciled_headers(&self) -> [&'static str; 5] {
        [self.policy_number, self.insured_name, self.commission_total, self.override_total, self.net_total]
    }

    fn unmatched_headers(&self) -> [&'static str; 6] {
        [
            self.policy_number,
            self.insured_name,
            self.company,
            self.commission_total,
            self.override_total,
            self.net_total,
        ]
    }
}

/// `{prefix}_{YYYY-MM-DD}.xlsx`
pub fn default_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.xlsx", prefix, date.format("%Y-%m-%d"))
}

/// Write the two-sheet audit workbook to `path`.
pub fn write_xlsx(result: &AnalysisResult, profile: &FieldProfile, locale: Locale, path: &Path) -> Result<(), IoError> {
    let mut workbook = build_workbook(result, profile, locale)?;
    workbook.save(path)?;
    Ok(())
}

/// Same workbook as [`write_xlsx`], as bytes.
pub fn xlsx_bytes(result: &AnalysisResult, profile: &FieldProfile, locale: Locale) -> Result<Vec<u8>, IoError> {
    let mut workbook = build_workbook(result, profile, locale)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(result: &AnalysisResult, profile: &FieldProfile, locale: Locale) -> Result<Workbook, IoError> {
    let labels = Labels::for_locale(locale);
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format(CURRENCY_FORMAT);

    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet().set_name(labels.reconciled_sheet)?;
    write_header(sheet, &labels.reconciled_headers(), &header)?;
    for (i, rec) in result.records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &rec.policy_number)?;
        sheet.write_string(row, 1, insured_name_from_bob(&rec.original_bob, profile))?;
        sheet.write_number_with_format(row, 2, rec.commission_total, &money)?;
        sheet.write_number_with_format(row, 3, rec.override_total, &money)?;
        sheet.write_number_with_format(row, 4, rec.net_total, &money)?;
    }

    let sheet = workbook.add_worksheet().set_name(labels.unmatched_sheet)?;
    write_header(sheet, &labels.unmatched_headers(), &header)?;
    for (i, rec) in result.unmatched_records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &rec.policy_number)?;
        sheet.write_string(row, 1, &rec.insured_name)?;
        sheet.write_string(row, 2, &rec.company)?;
        sheet.write_number_with_format(row, 3, rec.commission_total, &money)?;
        sheet.write_number_with_format(row, 4, rec.override_total, &money)?;
        sheet.write_number_with_format(row, 5, rec.net_total, &money)?;
    }

    Ok(workbook)
}

fn write_header(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), IoError> {
    for (col, title) in headers.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, format)?;
        sheet.set_column_width(col, (title.chars().count() + 4).max(14) as f64)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}
