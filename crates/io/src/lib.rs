//! # kdmatch-io
//!
//! Read anchor and candidate point tables from tab-delimited text (plain or
//! gzip) and write match tables and status reports. Bridges files into the
//! [`kdmatch_knn::Point`] model, with the stratum key as point payload.

mod error;
mod reader;
mod validate;
mod writer;

pub use error::IoError;
pub use reader::{
    PointTable, ReaderConfig, STRATUM_SEPARATOR, TableLayout, read_header, read_points,
};
pub use validate::check_headers;
pub use writer::{
    Compression, MISSING_ID, STATUS_HEADER, WriterConfig, match_header, match_row,
    write_match_table, write_status,
};
