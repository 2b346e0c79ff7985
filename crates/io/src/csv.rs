// CSV/TSV reading

use log::debug;
use polaudit_recon::model::{CellValue, Row};

use crate::error::IoError;
use crate::table::rows_from_grid;

/// Leading bytes of formats that are never tabular text.
const BINARY_SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF", "PDF document"),
    (b"\x89PNG", "PNG image"),
    (b"\xFF\xD8\xFF", "JPEG image"),
    (b"GIF87a", "GIF image"),
    (b"GIF89a", "GIF image"),
    (b"\x1F\x8B", "gzip archive"),
    (b"7z\xBC\xAF\x27\x1C", "7z archive"),
    (b"Rar!", "RAR archive"),
];

/// Parse delimited text into rows. Fields that read as plain amounts
/// (`1,234.50`, `$200`, `(12.00)`) become numbers; everything else is text.
pub fn read_rows(bytes: &[u8], input: &str) -> Result<Vec<Row>, IoError> {
    check_text(bytes, input)?;
    let content = decode_text(bytes);
    let delimiter = sniff_delimiter(&content);
    debug!("{input}: delimiter {:?}", delimiter as char);
    rows_from_str(&content, delimiter, input)
}

/// Reject content that cannot be a spreadsheet export: known binary
/// signatures, or NUL bytes in anything that is not BOM-marked UTF-16.
fn check_text(bytes: &[u8], input: &str) -> Result<(), IoError> {
    if let Some((_, kind)) = BINARY_SIGNATURES.iter().find(|(magic, _)| bytes.starts_with(magic)) {
        return Err(IoError::decode(input, format!("{kind} is not a spreadsheet")));
    }
    let utf16 = bytes.starts_with(b"\xFF\xFE") || bytes.starts_with(b"\xFE\xFF");
    if !utf16 && bytes.contains(&0) {
        return Err(IoError::decode(input, "binary content is not a spreadsheet"));
    }
    Ok(())
}

fn rows_from_str(content: &str, delimiter: u8, input: &str) -> Result<Vec<Row>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| IoError::decode(input, e))?;
        grid.push(record.iter().map(cell).collect());
    }

    Ok(rows_from_grid(grid))
}

fn cell(field: &str) -> Option<CellValue> {
    if field.is_empty() {
        return None;
    }
    Some(match parse_amount(field) {
        Some(n) => CellValue::Number(n),
        None => CellValue::from(field),
    })
}

/// Read a field as a plain amount: optional sign or accounting parentheses,
/// optional `$`, digits with optional comma grouping in threes, optional
/// fraction. Values with a redundant leading zero (`00123`) are identifiers
/// and stay text, as does anything with trailing words.
pub fn parse_amount(field: &str) -> Option<f64> {
    let s = field.trim();
    let (mut negative, s) = match s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        },
    };
    let mut s = s.strip_prefix('$').unwrap_or(s);
    if let Some(rest) = s.strip_prefix('-').filter(|_| !negative) {
        // "$-200"
        negative = true;
        s = rest;
    }

    let (whole, fraction) = match s.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (s, None),
    };
    if let Some(f) = fraction {
        if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    if whole.is_empty() {
        fraction?;
    } else if !valid_whole(whole) {
        return None;
    }

    let digits: String = whole.chars().filter(|c| *c != ',').collect();
    let text = match fraction {
        Some(f) if digits.is_empty() => format!("0.{f}"),
        Some(f) => format!("{digits}.{f}"),
        None => digits,
    };
    let n: f64 = text.parse().ok()?;
    Some(if negative { -n } else { n })
}

// "0", "12", "1,234", "12,345,678"; not "012", "1,23", ",123"
fn valid_whole(whole: &str) -> bool {
    let mut groups = whole.split(',');
    let first = groups.next().unwrap_or_default();
    if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if first.len() > 1 && first.starts_with('0') {
        return false;
    }
    if first == "0" && whole.contains(',') {
        return false;
    }
    let mut grouped = false;
    for group in groups {
        grouped = true;
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    !grouped || first.len() <= 3
}

const SNIFF_LINES: usize = 10;

/// Pick the field delimiter from the first non-blank lines.
///
/// A candidate must split the header line into at least two fields. Among
/// those, the one whose width the most sample lines agree with wins, weighted
/// by that width; ties keep the earlier candidate.
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).take(SNIFF_LINES).collect();
    let Some(header) = sample.first() else {
        return b',';
    };

    let mut best = (0, b',');
    for delim in [b'\t', b';', b',', b'|'] {
        let width = field_count(header, delim);
        if width < 2 {
            continue;
        }
        let agreeing = sample.iter().filter(|line| field_count(line, delim) == width).count();
        if agreeing * width > best.0 {
            best = (agreeing * width, delim);
        }
    }
    best.1
}

// Delimiters inside double quotes do not split
fn field_count(line: &str, delim: u8) -> usize {
    let mut quoted = false;
    let splits = line
        .bytes()
        .filter(|&b| {
            if b == b'"' {
                quoted = !quoted;
            }
            !quoted && b == delim
        })
        .count();
    splits + 1
}

/// Decode bytes by their BOM (UTF-8 or UTF-16), else as UTF-8, falling back
/// to Windows-1252 for Excel-exported CSVs.
pub fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}
