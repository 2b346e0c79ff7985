// File I/O: tabular reading, the one-shot pipeline, xlsx/JSON export

pub mod csv;
pub mod error;
pub mod export;
pub mod json;
pub mod pipeline;
pub mod reader;
mod table;
pub mod workbook;

pub use error::IoError;
pub use pipeline::{process_bytes, process_files};
pub use reader::{read_bytes, read_path, SheetScope};
