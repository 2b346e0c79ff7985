use thiserror::Error;

/// Failures while turning files into rows or writing results back out.
/// Missing columns are never an error here; they degrade inside the engine.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The input is neither a workbook nor parseable delimited text.
    #[error("cannot decode {input}: {reason}")]
    Decode { input: String, reason: String },

    #[error("{input} contains no sheets")]
    NoSheets { input: String },

    #[error("export failed: {0}")]
    Export(String),
}

impl IoError {
    pub fn decode(input: &str, reason: impl ToString) -> Self {
        IoError::Decode {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for failures caused by the content of an input file.
    pub fn is_decode(&self) -> bool {
        matches!(self, IoError::Decode { .. } | IoError::NoSheets { .. })
    }
}

impl From<rust_xlsxwriter::XlsxError> for IoError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        IoError::Export(e.to_string())
    }
}
