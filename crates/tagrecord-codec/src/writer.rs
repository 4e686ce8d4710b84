use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::debug;

use crate::codec::{encode_record, RecordConfig};
use crate::error::{RecordError, Result};
use crate::record::Record;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete records to any `Write` stream.
pub struct RecordWriter<T> {
    inner: T,
    buf: BytesMut,
    config: RecordConfig,
}

impl<T: Write> RecordWriter<T> {
    /// Create a new record writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, RecordConfig::default())
    }

    /// Create a new record writer with explicit configuration.
    pub fn with_config(inner: T, config: RecordConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Write a record and clear it (blocking).
    ///
    /// The record is only cleared once it has been fully written and flushed;
    /// on error it is left untouched.
    pub fn write_record(&mut self, record: &mut Record) -> Result<()> {
        self.write(record)?;
        record.clear();
        Ok(())
    }

    /// Encode and write a record without consuming its contents.
    pub fn write(&mut self, record: &Record) -> Result<()> {
        self.buf.clear();
        encode_record(record, &mut self.buf)?;

        if self.buf.len() > self.config.max_record_size {
            return Err(RecordError::RecordTooLarge {
                size: self.buf.len(),
                max: self.config.max_record_size,
            });
        }

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(RecordError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(RecordError::Io(err)),
            }
        }

        self.flush()?;
        debug!(entries = record.len(), bytes = self.buf.len(), "encoded record");
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(RecordError::Io(err)),
            }
        }
    }

    /// Flush and hand back the stream; dropping it closes the output.
    pub fn finish(mut self) -> Result<T> {
        self.flush()?;
        Ok(self.inner)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum record size for subsequent encoding.
    pub fn set_max_record_size(&mut self, max_record_size: usize) {
        self.config.max_record_size = max_record_size;
    }

    /// Current record writer configuration.
    pub fn config(&self) -> &RecordConfig {
        &self.config
    }
}
