//! Change detection over masked records.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::error::FilterError;
use crate::mask::Mask;
use crate::record::{Record, RecordReader, RecordWriter};

/// Single-pass state for dropping records whose masked channels did not change.
///
/// The first record is always kept. A record is kept when its masked channel
/// word differs from the last kept one. If the final record was dropped,
/// [`ChangeFilter::finish`] hands it back so the output spans the same time
/// range as the input.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    mask: Mask,
    /// Masked channels of the last kept record, `None` before the first record.
    previous: Option<u16>,
    /// Most recent record if it was dropped, cleared whenever a record is kept.
    last_dropped: Option<Record>,
}

impl ChangeFilter {
    pub fn new(mask: Mask) -> Self {
        Self {
            mask,
            previous: None,
            last_dropped: None,
        }
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Mask `record` and return it if it must be written.
    pub fn push(&mut self, record: Record) -> Option<Record> {
        let masked = Record {
            channels: self.mask.apply(record.channels),
            ..record
        };
        if self.previous == Some(masked.channels) {
            self.last_dropped = Some(masked);
            None
        } else {
            self.previous = Some(masked.channels);
            self.last_dropped = None;
            Some(masked)
        }
    }

    /// The final record, if it was dropped and must be emitted anyway.
    pub fn finish(self) -> Option<Record> {
        self.last_dropped
    }
}

/// Summary of one filter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterStats {
    pub records_read: u64,
    pub records_written: u64,
    /// Bytes after the last complete input record.
    pub trailing_bytes_ignored: usize,
    /// The last input record was a duplicate and was written to keep the duration.
    pub last_reemitted: bool,
}

impl FilterStats {
    pub fn records_dropped(&self) -> u64 {
        self.records_read - self.records_written
    }
}

/// Filter an in-memory sequence of records.
pub fn filter_records(records: &[Record], mask: Mask) -> Vec<Record> {
    let mut filter = ChangeFilter::new(mask);
    let mut kept = records
        .iter()
        .filter_map(|record| filter.push(*record))
        .collect::<Vec<_>>();
    kept.extend(filter.finish());
    kept
}

/// Filter encoded records from `reader` into `writer` and flush it.
pub fn filter_stream<R: Read, W: Write>(
    reader: R,
    mask: Mask,
    writer: W,
) -> Result<FilterStats, FilterError> {
    let mut reader = RecordReader::new(reader);
    let mut writer = RecordWriter::new(writer);
    let mut filter = ChangeFilter::new(mask);

    while let Some(record) = reader.read_record()? {
        if let Some(kept) = filter.push(record) {
            trace!("{:4}: {kept}", reader.records_read() - 1);
            writer.write_record(&kept)?;
        }
    }

    let last = filter.finish();
    if let Some(last) = &last {
        debug!("Re-emitting final record {last} to keep the capture length");
        writer.write_record(last)?;
    }

    if reader.trailing_bytes() > 0 {
        warn!(
            "Ignoring {} trailing bytes after record {}",
            reader.trailing_bytes(),
            reader.records_read()
        );
    }

    let stats = FilterStats {
        records_read: reader.records_read(),
        records_written: writer.records_written(),
        trailing_bytes_ignored: reader.trailing_bytes(),
        last_reemitted: last.is_some(),
    };
    writer.finish()?;
    Ok(stats)
}

/// Filter the records in `input` with `mask`, creating or truncating `output`.
pub fn filter_files(
    input: impl AsRef<Path>,
    mask: Mask,
    output: impl AsRef<Path>,
) -> Result<FilterStats, FilterError> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let start = Instant::now();

    let source = File::open(input).map_err(|source| FilterError::OpenInput {
        path: input.to_path_buf(),
        source,
    })?;
    let sink = File::create(output).map_err(|source| FilterError::CreateOutput {
        path: output.to_path_buf(),
        source,
    })?;

    let stats = filter_stream(BufReader::new(source), mask, BufWriter::new(sink))?;
    info!(
        "Filtered {} with mask {mask}: kept {} of {} records in {:?}, wrote {}",
        input.display(),
        stats.records_written,
        stats.records_read,
        start.elapsed(),
        output.display()
    );
    Ok(stats)
}
