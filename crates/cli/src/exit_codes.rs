//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success                                             |
//! | 1    | General error (unspecified)                         |
//! | 2    | Usage error (bad args, bad flag value)              |
//! | 3    | An input or profile file cannot be read             |
//! | 4    | An input file is not a readable workbook or CSV     |
//! | 5    | Field profile cannot be parsed or fails validation  |
//! | 6    | Writing the JSON result or xlsx export failed       |
//!
//! Missing columns in an input never produce a non-zero exit: they degrade
//! to default values inside the engine.

use polaudit_io::IoError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid option values.
pub const EXIT_USAGE: u8 = 2;

/// Input file (or field profile file) could not be read from disk.
pub const EXIT_READ: u8 = 3;

/// Input file could not be decoded as a workbook or delimited text.
pub const EXIT_DECODE: u8 = 4;

/// Field profile is not valid TOML or fails validation.
pub const EXIT_INVALID_PROFILE: u8 = 5;

/// JSON result or xlsx export could not be written.
pub const EXIT_EXPORT: u8 = 6;

/// Map an I/O layer error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Read { .. } => EXIT_READ,
        IoError::Decode { .. } | IoError::NoSheets { .. } => EXIT_DECODE,
        IoError::Export(_) => EXIT_EXPORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_READ, EXIT_DECODE, EXIT_INVALID_PROFILE, EXIT_EXPORT];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn test_io_error_mapping() {
        let read = IoError::Read {
            path: "x".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(io_exit_code(&read), EXIT_READ);
        assert_eq!(io_exit_code(&IoError::decode("x", "bad")), EXIT_DECODE);
        assert_eq!(io_exit_code(&IoError::NoSheets { input: "x".into() }), EXIT_DECODE);
        assert_eq!(io_exit_code(&IoError::Export("disk full".into())), EXIT_EXPORT);
    }
}
