//! Packed timestamp/channel records and their byte-level readers and writers.
//!
//! A record is 10 bytes: a `u64` timestamp followed by a `u16` channel word,
//! both in host byte order and without padding. Conversion goes through
//! explicit byte arrays so the in-memory layout of [`Record`] never matters.
use std::fmt;
use std::io::{self, Read, Write};

use crate::error::FilterError;

/// Size of one encoded record in bytes.
pub const RECORD_SIZE: usize = TIMESTAMP_SIZE + CHANNELS_SIZE;

const TIMESTAMP_SIZE: usize = size_of::<u64>();
const CHANNELS_SIZE: usize = size_of::<u16>();

/// One sample of the capture: the time at which the channel state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Record {
    /// Tick count of the capture device, opaque to this crate.
    pub timestamp: u64,
    /// One bit per logic channel.
    pub channels: u16,
}

impl Record {
    pub fn new(timestamp: u64, channels: u16) -> Self {
        Self {
            timestamp,
            channels,
        }
    }

    pub fn to_bytes(self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0; RECORD_SIZE];
        bytes[..TIMESTAMP_SIZE].copy_from_slice(&self.timestamp.to_ne_bytes());
        bytes[TIMESTAMP_SIZE..].copy_from_slice(&self.channels.to_ne_bytes());
        bytes
    }

    pub fn from_bytes(bytes: [u8; RECORD_SIZE]) -> Self {
        let mut timestamp = [0; TIMESTAMP_SIZE];
        let mut channels = [0; CHANNELS_SIZE];
        timestamp.copy_from_slice(&bytes[..TIMESTAMP_SIZE]);
        channels.copy_from_slice(&bytes[TIMESTAMP_SIZE..]);
        Self {
            timestamp: u64::from_ne_bytes(timestamp),
            channels: u16::from_ne_bytes(channels),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: 0x{:04x}", self.timestamp, self.channels)
    }
}

/// Reads records until end of stream.
///
/// A trailing chunk shorter than [`RECORD_SIZE`] ends the stream without an
/// error; its length is available from [`RecordReader::trailing_bytes`].
pub struct RecordReader<R> {
    inner: R,
    records_read: u64,
    trailing_bytes: usize,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            records_read: 0,
            trailing_bytes: 0,
            done: false,
        }
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Number of bytes after the last complete record that were discarded.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing_bytes
    }

    pub fn read_record(&mut self) -> Result<Option<Record>, FilterError> {
        if self.done {
            return Ok(None);
        }
        let mut buf = [0; RECORD_SIZE];
        let filled = read_up_to(&mut self.inner, &mut buf).map_err(FilterError::Read)?;
        if filled < RECORD_SIZE {
            self.done = true;
            self.trailing_bytes = filled;
            return Ok(None);
        }
        self.records_read += 1;
        Ok(Some(Record::from_bytes(buf)))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record, FilterError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

/// Fill `buf` as far as the reader allows, retrying on interrupts.
fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Writes whole records. A record that cannot be written completely is an
/// error, never a truncated record.
pub struct RecordWriter<W: Write> {
    inner: W,
    records_written: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
        }
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn write_record(&mut self, record: &Record) -> Result<(), FilterError> {
        self.inner
            .write_all(&record.to_bytes())
            .map_err(FilterError::Write)?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush buffered output and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, FilterError> {
        self.inner.flush().map_err(FilterError::Flush)?;
        Ok(self.inner)
    }
}
