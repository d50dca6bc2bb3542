//! Reduce logic analyzer captures to the changes on a chosen set of channels.
//!
//! Input and output are sequences of packed 10-byte records (`u64` timestamp,
//! `u16` channel word, host byte order) as exported by the analyzer. Records
//! whose masked channel word equals the previously kept one are dropped. The
//! first record is always kept and the last record is kept if it was dropped,
//! so the output covers the same time span as the input.
mod error;
mod filter;
mod mask;
mod record;

pub use error::{FilterError, MaskParseError};
pub use filter::{ChangeFilter, FilterStats, filter_files, filter_records, filter_stream};
pub use mask::Mask;
pub use record::{RECORD_SIZE, Record, RecordReader, RecordWriter};

pub const BINFILTER_VERSION: &str = env!("CARGO_PKG_VERSION");
