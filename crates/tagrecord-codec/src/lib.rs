//! Tagged key/value record encoding for game save data.
//!
//! A record is a flat set of named values split into eight typed mappings
//! (four scalar kinds and their array forms). On the wire every entry is:
//! - A 1-byte type tag
//! - A 2-byte big-endian name length followed by the UTF-8 name
//! - The payload for that tag
//!
//! A single `0xFF` byte terminates the record.

pub mod codec;
pub mod error;
pub mod file;
pub mod reader;
pub mod record;
pub mod tag;
pub mod writer;

pub use codec::{
    decode_record, encode_record, DecodeMode, RecordConfig, DEFAULT_MAX_RECORD_SIZE,
    MAX_ARRAY_LEN, MAX_STRING_LEN,
};
pub use error::{RecordError, Result};
pub use reader::RecordReader;
pub use record::{Field, Record, Value};
pub use tag::{Tag, TERMINATOR};
pub use writer::RecordWriter;
