use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};
use tracing::debug;

use crate::codec::{decode_entries, DecodeMode, Progress, RecordConfig};
use crate::error::{RecordError, Result};
use crate::record::Record;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete records from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete records.
/// Bytes read past a record's terminator are kept for the next call.
pub struct RecordReader<T> {
    inner: T,
    buf: BytesMut,
    config: RecordConfig,
    #[cfg(test)]
    decode_passes: usize,
}

impl<T: Read> RecordReader<T> {
    /// Create a new record reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, RecordConfig::default())
    }

    /// Create a new record reader with explicit configuration.
    pub fn with_config(inner: T, config: RecordConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            #[cfg(test)]
            decode_passes: 0,
        }
    }

    /// Read the next complete record (blocking).
    pub fn read_record(&mut self) -> Result<Record> {
        let mut record = Record::new();
        self.read_into(&mut record)?;
        Ok(record)
    }

    /// Read the next complete record into `record` (blocking).
    ///
    /// `record` is cleared first. On success it holds exactly the entries of
    /// this record. On failure its contents depend on the configured
    /// [`DecodeMode`]: empty for `Atomic`, the entries decoded before the
    /// failure for `Partial`.
    ///
    /// Returns `Err(RecordError::Truncated)` when EOF is reached before the terminator.
    pub fn read_into(&mut self, record: &mut Record) -> Result<()> {
        record.clear();

        let mut scratch = Record::new();
        match self.fill(&mut scratch) {
            Ok(len) => {
                self.buf.advance(len);
                debug!(entries = scratch.len(), bytes = len, "decoded record");
                *record = scratch;
                Ok(())
            }
            Err(err) => {
                if self.config.decode_mode == DecodeMode::Partial {
                    *record = scratch;
                }
                debug!(error = %err, kept = record.len(), "record decode failed");
                Err(err)
            }
        }
    }

    fn fill(&mut self, out: &mut Record) -> Result<usize> {
        let max = self.config.max_record_size;
        let mut resume = 0usize;
        let mut needed = 0usize;
        loop {
            if self.buf.len() >= needed {
                #[cfg(test)]
                {
                    self.decode_passes += 1;
                }
                match decode_entries(&self.buf, resume, out)? {
                    Progress::Complete(len) if len > max => {
                        return Err(RecordError::RecordTooLarge { size: len, max });
                    }
                    Progress::Complete(len) => return Ok(len),
                    Progress::Incomplete { offset, needed: at_least } => {
                        resume = offset;
                        needed = at_least;
                    }
                }

                if needed > max {
                    return Err(RecordError::RecordTooLarge { size: needed, max });
                }
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(RecordError::Io(err)),
            };

            if read == 0 {
                return Err(RecordError::Truncated);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum record size for subsequent decoding.
    pub fn set_max_record_size(&mut self, max_record_size: usize) {
        self.config.max_record_size = max_record_size;
    }

    /// Current record reader configuration.
    pub fn config(&self) -> &RecordConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::codec::encode_record;
    use crate::tag::TERMINATOR;

    fn wire(record: &Record) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_record(record, &mut buf).unwrap();
        buf.to_vec()
    }

    fn sample() -> Record {
        let mut record = Record::new();
        record.insert("energy", "redstone");
        record.insert("energyLevel", 120);
        record.insert("sides", vec![true, false, false, true, true, false]);
        record
    }

    #[test]
    fn read_single_record() {
        let mut reader = RecordReader::new(Cursor::new(wire(&sample())));
        let record = reader.read_record().unwrap();
        assert_eq!(record, sample());
    }

    #[test]
    fn read_multiple_records() {
        let mut second = Record::new();
        second.insert("energyLevel", 0);

        let mut bytes = wire(&sample());
        bytes.extend(wire(&second));
        bytes.push(TERMINATOR);

        let mut reader = RecordReader::new(Cursor::new(bytes));
        assert_eq!(reader.read_record().unwrap(), sample());
        assert_eq!(reader.read_record().unwrap(), second);
        assert!(reader.read_record().unwrap().is_empty());
    }

    #[test]
    fn read_record_larger_than_chunk() {
        let mut record = Record::new();
        record.insert("names", vec!["block".repeat(10); 2000]);
        record.insert("weights", vec![0.5f64; 4000]);

        let mut reader = RecordReader::new(Cursor::new(wire(&record)));
        assert_eq!(reader.read_record().unwrap(), record);
    }

    #[test]
    fn large_single_entry_is_decoded_once_buffered() {
        let mut record = Record::new();
        record.insert("chunks", vec!["c".repeat(60_000); 64]);
        let bytes = wire(&record);
        assert!(bytes.len() > 3 * 1024 * 1024);

        let mut reader = RecordReader::new(Cursor::new(bytes));
        assert_eq!(reader.read_record().unwrap(), record);
        // One pass per element boundary at most, not one per 8 KiB chunk.
        assert!(
            reader.decode_passes <= 64 + 3,
            "decode passes: {}",
            reader.decode_passes
        );
    }

    #[test]
    fn entry_longer_than_limit_fails_before_buffering() {
        let cfg = RecordConfig {
            max_record_size: 4096,
            ..RecordConfig::default()
        };
        let mut record = Record::new();
        record.insert("blob", "x".repeat(60_000));
        let mut reader = RecordReader::with_config(Cursor::new(wire(&record)), cfg);

        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, RecordError::RecordTooLarge { max: 4096, .. }));
        assert!(reader.get_ref().position() <= 8 * 1024);
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: wire(&sample()),
            pos: 0,
        };
        let mut reader = RecordReader::new(byte_reader);
        assert_eq!(reader.read_record().unwrap(), sample());
    }

    #[test]
    fn read_into_replaces_previous_contents() {
        let mut record = Record::new();
        record.insert("stale", 1);
        record.insert("energy", "old");

        let mut reader = RecordReader::new(Cursor::new(wire(&sample())));
        reader.read_into(&mut record).unwrap();

        assert_eq!(record, sample());
        assert_eq!(record.get_int("stale"), None);
    }

    #[test]
    fn empty_stream_is_truncated() {
        let mut reader = RecordReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, RecordError::Truncated));
    }

    #[test]
    fn eof_after_tag_and_name_is_truncated() {
        let bytes = vec![1, 0x00, 0x03, b'h', b'p', b's'];
        let mut reader = RecordReader::new(Cursor::new(bytes));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, RecordError::Truncated));
    }

    #[test]
    fn terminator_only_stream_is_empty_record() {
        let mut reader = RecordReader::new(Cursor::new(vec![TERMINATOR]));
        let mut record = sample();
        reader.read_into(&mut record).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn invalid_tag_in_stream() {
        let mut reader = RecordReader::new(Cursor::new(vec![5u8, 0x00, 0x00, TERMINATOR]));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, RecordError::InvalidTag(5)));
    }

    fn good_entry_then_bad_tag() -> Vec<u8> {
        let mut first = Record::new();
        first.insert("energyLevel", 9);
        let mut bytes = wire(&first);
        bytes.pop();
        bytes.extend([7, 0x00, 0x01, b'x', TERMINATOR]);
        bytes
    }

    #[test]
    fn atomic_mode_discards_entries_on_failure() {
        let mut reader = RecordReader::new(Cursor::new(good_entry_then_bad_tag()));
        let mut record = sample();

        let err = reader.read_into(&mut record).unwrap_err();
        assert!(matches!(err, RecordError::InvalidTag(7)));
        assert!(record.is_empty());
    }

    #[test]
    fn partial_mode_keeps_entries_before_failure() {
        let cfg = RecordConfig {
            decode_mode: DecodeMode::Partial,
            ..RecordConfig::default()
        };
        let mut reader = RecordReader::with_config(Cursor::new(good_entry_then_bad_tag()), cfg);
        let mut record = sample();

        let err = reader.read_into(&mut record).unwrap_err();
        assert!(matches!(err, RecordError::InvalidTag(7)));
        assert_eq!(record.len(), 1);
        assert_eq!(record.get_int("energyLevel"), Some(9));
    }

    #[test]
    fn partial_mode_keeps_entries_before_truncation() {
        let cfg = RecordConfig {
            decode_mode: DecodeMode::Partial,
            ..RecordConfig::default()
        };
        let mut bytes = wire(&sample());
        bytes.truncate(bytes.len() - 3);

        let mut reader = RecordReader::with_config(Cursor::new(bytes), cfg);
        let mut record = Record::new();
        let err = reader.read_into(&mut record).unwrap_err();

        assert!(matches!(err, RecordError::Truncated));
        assert_eq!(record.get_int("energyLevel"), Some(120));
        assert_eq!(record.get_string("energy"), Some("redstone"));
        assert!(record.boolean_arrays.is_empty());
    }

    #[test]
    fn oversized_record_in_stream() {
        let cfg = RecordConfig {
            max_record_size: 16,
            ..RecordConfig::default()
        };
        let mut reader = RecordReader::with_config(Cursor::new(wire(&sample())), cfg);
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, RecordError::RecordTooLarge { max: 16, .. }));
    }

    #[test]
    fn set_max_record_size_updates_config() {
        let mut reader = RecordReader::new(Cursor::new(Vec::<u8>::new()));
        reader.set_max_record_size(64);
        assert_eq!(reader.config().max_record_size, 64);
        assert_eq!(reader.config().decode_mode, DecodeMode::Atomic);
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            if buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = RecordReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    struct FailFirst {
        kind: ErrorKind,
        failed: bool,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl FailFirst {
        fn new(kind: ErrorKind, bytes: Vec<u8>) -> Self {
            Self {
                kind,
                failed: false,
                bytes,
                pos: 0,
            }
        }
    }

    impl Read for FailFirst {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(std::io::Error::from(self.kind));
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn read_would_block_propagates_io_error() {
        let mut reader =
            RecordReader::new(FailFirst::new(ErrorKind::WouldBlock, wire(&sample())));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, RecordError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn interrupted_read_retries() {
        let mut reader =
            RecordReader::new(FailFirst::new(ErrorKind::Interrupted, wire(&sample())));
        assert_eq!(reader.read_record().unwrap(), sample());
    }
}
