use std::collections::BTreeMap;

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{RecordError, Result};
use crate::record::{Record, Value};
use crate::tag::{Tag, TERMINATOR};

/// Longest name or string value: the length prefix is an unsigned 16-bit count.
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Longest array value: the element count is a signed 16-bit count.
pub const MAX_ARRAY_LEN: usize = i16::MAX as usize;

/// Default maximum encoded record size: 16 MiB.
pub const DEFAULT_MAX_RECORD_SIZE: usize = 16 * 1024 * 1024;

/// What a reader leaves in the caller's record when decoding fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// The record is left empty; nothing from the failed pass is visible.
    #[default]
    Atomic,
    /// Entries decoded before the failure stay in the record.
    Partial,
}

/// Configuration for record readers and writers.
#[derive(Debug, Clone)]
pub struct RecordConfig {
    /// Maximum encoded record size in bytes. Default: 16 MiB.
    pub max_record_size: usize,
    /// Failure behavior for decoding. Default: [`DecodeMode::Atomic`].
    pub decode_mode: DecodeMode,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
            decode_mode: DecodeMode::default(),
        }
    }
}

/// Encode a record into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬────────────┬──────────────┬─────────────┐        ┌──────┐
/// │ Tag (1B) │ Name len   │ Name         │ Payload     │  ...   │ 0xFF │
/// │          │ (2B BE)    │ (UTF-8)      │ (per tag)   │        │      │
/// └──────────┴────────────┴──────────────┴─────────────┘        └──────┘
/// ```
///
/// Scalar kinds are written before array kinds, in tag order. On error `dst`
/// is restored to its original length.
pub fn encode_record(record: &Record, dst: &mut BytesMut) -> Result<()> {
    let start = dst.len();
    if let Err(err) = encode_entries(record, dst) {
        dst.truncate(start);
        return Err(err);
    }
    dst.put_u8(TERMINATOR);
    Ok(())
}

fn encode_entries(record: &Record, dst: &mut BytesMut) -> Result<()> {
    put_entries(dst, Tag::Boolean, &record.booleans, |dst, v| {
        dst.put_u8(u8::from(*v));
        Ok(())
    })?;
    put_entries(dst, Tag::Integer, &record.integers, |dst, v| {
        dst.put_i32(*v);
        Ok(())
    })?;
    put_entries(dst, Tag::Double, &record.doubles, |dst, v| {
        dst.put_f64(*v);
        Ok(())
    })?;
    put_entries(dst, Tag::String, &record.strings, |dst, v| put_string(dst, v))?;

    put_entries(dst, Tag::BooleanArray, &record.boolean_arrays, |dst, v| {
        put_array_len(dst, v.len())?;
        v.iter().for_each(|b| dst.put_u8(u8::from(*b)));
        Ok(())
    })?;
    put_entries(dst, Tag::IntegerArray, &record.integer_arrays, |dst, v| {
        put_array_len(dst, v.len())?;
        v.iter().for_each(|i| dst.put_i32(*i));
        Ok(())
    })?;
    put_entries(dst, Tag::DoubleArray, &record.double_arrays, |dst, v| {
        put_array_len(dst, v.len())?;
        v.iter().for_each(|d| dst.put_f64(*d));
        Ok(())
    })?;
    put_entries(dst, Tag::StringArray, &record.string_arrays, |dst, v| {
        put_array_len(dst, v.len())?;
        v.iter().try_for_each(|s| put_string(dst, s))
    })
}

fn put_entries<T>(
    dst: &mut BytesMut,
    tag: Tag,
    entries: &BTreeMap<String, T>,
    put_payload: impl Fn(&mut BytesMut, &T) -> Result<()>,
) -> Result<()> {
    for (name, value) in entries {
        dst.put_u8(tag.as_byte());
        put_string(dst, name)?;
        put_payload(dst, value)?;
    }
    Ok(())
}

fn put_string(dst: &mut BytesMut, s: &str) -> Result<()> {
    if s.len() > MAX_STRING_LEN {
        return Err(RecordError::StringTooLong { len: s.len() });
    }
    dst.reserve(2 + s.len());
    dst.put_u16(s.len() as u16);
    dst.put_slice(s.as_bytes());
    Ok(())
}

fn put_array_len(dst: &mut BytesMut, len: usize) -> Result<()> {
    if len > MAX_ARRAY_LEN {
        return Err(RecordError::ArrayTooLong { len });
    }
    dst.put_i16(len as i16);
    Ok(())
}

/// Decode a record from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete record yet.
/// On success, consumes the record bytes (terminator included) from the buffer;
/// anything after the terminator is left in place.
pub fn decode_record(src: &mut BytesMut, max_record_size: usize) -> Result<Option<Record>> {
    let mut record = Record::new();
    match decode_entries(src, 0, &mut record)? {
        Progress::Complete(len) => {
            if len > max_record_size {
                return Err(RecordError::RecordTooLarge {
                    size: len,
                    max: max_record_size,
                });
            }
            src.advance(len);
            Ok(Some(record))
        }
        Progress::Incomplete { .. } => {
            if src.len() > max_record_size {
                return Err(RecordError::RecordTooLarge {
                    size: src.len(),
                    max: max_record_size,
                });
            }
            Ok(None) // Need more data
        }
    }
}

/// How far a decode pass got through the buffered bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Progress {
    /// A terminator was read; the record spans this many bytes.
    Complete(usize),
    /// More data is needed. Entries before `offset` were decoded, and no later
    /// pass can get further until the buffer holds at least `needed` bytes.
    Incomplete { offset: usize, needed: usize },
}

/// Decode entries from `src[from..]` into `out`, stopping at the terminator.
///
/// `from` must be an entry boundary (0 or a previous `Incomplete` offset), so a
/// caller feeding a growing buffer never decodes the same entry twice. An entry
/// is measured before it is decoded; nothing is allocated for an entry whose
/// bytes have not all arrived.
pub(crate) fn decode_entries(src: &[u8], from: usize, out: &mut Record) -> Result<Progress> {
    let mut buf = &src[from..];
    loop {
        let entry_start = src.len() - buf.len();

        if !buf.has_remaining() {
            return Ok(Progress::Incomplete {
                offset: entry_start,
                needed: entry_start + 1,
            });
        }
        let byte = buf.get_u8();
        if byte == TERMINATOR {
            return Ok(Progress::Complete(entry_start + 1));
        }
        let tag = Tag::from_byte(byte).ok_or(RecordError::InvalidTag(byte))?;

        if let Extent::Short(len) = measure_entry(buf, tag)? {
            return Ok(Progress::Incomplete {
                offset: entry_start,
                needed: entry_start + 1 + len,
            });
        }

        let Some(name) = take_string(&mut buf)? else {
            return Ok(Progress::Incomplete {
                offset: entry_start,
                needed: src.len() + 1,
            });
        };
        let value = if tag.is_array() {
            take_array(&mut buf, tag)?
        } else {
            take_scalar(&mut buf, tag)?
        };
        let Some(value) = value else {
            return Ok(Progress::Incomplete {
                offset: entry_start,
                needed: src.len() + 1,
            });
        };

        out.insert(name, value);
    }
}

/// Size of an entry body (name and payload) found by reading length prefixes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extent {
    /// The body is fully buffered and spans this many bytes.
    Whole(usize),
    /// The body is cut short; at least this many bytes are needed.
    Short(usize),
}

fn measure_entry(buf: &[u8], tag: Tag) -> Result<Extent> {
    let pos = match measure_string(buf, 0) {
        Extent::Whole(end) => end,
        short => return Ok(short),
    };
    if !tag.is_array() {
        return Ok(measure_element(buf, pos, tag));
    }

    if buf.len() < pos + 2 {
        return Ok(Extent::Short(pos + 2));
    }
    let count = i16::from_be_bytes([buf[pos], buf[pos + 1]]);
    if count < 0 {
        return Err(RecordError::InvalidArrayLength(count));
    }
    let mut pos = pos + 2;

    if let Some(width) = fixed_width(tag.element()) {
        return Ok(bounded(buf, pos + count as usize * width));
    }
    for _ in 0..count {
        match measure_string(buf, pos) {
            Extent::Whole(end) => pos = end,
            short => return Ok(short),
        }
    }
    Ok(Extent::Whole(pos))
}

fn measure_element(buf: &[u8], pos: usize, tag: Tag) -> Extent {
    match fixed_width(tag.element()) {
        Some(width) => bounded(buf, pos + width),
        None => measure_string(buf, pos),
    }
}

fn measure_string(buf: &[u8], pos: usize) -> Extent {
    if buf.len() < pos + 2 {
        return Extent::Short(pos + 2);
    }
    let len = u16::from_be_bytes([buf[pos], buf[pos + 1]]) as usize;
    bounded(buf, pos + 2 + len)
}

fn bounded(buf: &[u8], end: usize) -> Extent {
    if buf.len() < end {
        Extent::Short(end)
    } else {
        Extent::Whole(end)
    }
}

/// Encoded width of a fixed-size scalar; `None` for strings.
fn fixed_width(tag: Tag) -> Option<usize> {
    match tag {
        Tag::Boolean => Some(1),
        Tag::Integer => Some(4),
        Tag::Double => Some(8),
        _ => None,
    }
}

fn take_scalar(buf: &mut &[u8], tag: Tag) -> Result<Option<Value>> {
    let value = match tag.element() {
        Tag::Boolean if buf.remaining() >= 1 => Value::Boolean(buf.get_u8() != 0),
        Tag::Integer if buf.remaining() >= 4 => Value::Integer(buf.get_i32()),
        Tag::Double if buf.remaining() >= 8 => Value::Double(buf.get_f64()),
        Tag::String => match take_string(buf)? {
            Some(s) => Value::String(s),
            None => return Ok(None),
        },
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn take_array(buf: &mut &[u8], tag: Tag) -> Result<Option<Value>> {
    if buf.remaining() < 2 {
        return Ok(None);
    }
    let count = buf.get_i16();
    if count < 0 {
        return Err(RecordError::InvalidArrayLength(count));
    }
    let count = count as usize;

    macro_rules! collect {
        ($variant:ident, $elem:ident) => {{
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                match take_scalar(buf, tag.element())? {
                    Some(Value::$elem(item)) => items.push(item),
                    _ => return Ok(None),
                }
            }
            Value::$variant(items)
        }};
    }

    let value = match tag {
        Tag::BooleanArray => collect!(BooleanArray, Boolean),
        Tag::IntegerArray => collect!(IntegerArray, Integer),
        Tag::DoubleArray => collect!(DoubleArray, Double),
        Tag::StringArray => collect!(StringArray, String),
        scalar => return take_scalar(buf, scalar),
    };
    Ok(Some(value))
}

fn take_string(buf: &mut &[u8]) -> Result<Option<String>> {
    if buf.remaining() < 2 {
        return Ok(None);
    }
    let len = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    if buf.remaining() < 2 + len {
        return Ok(None);
    }
    buf.advance(2);
    let s = std::str::from_utf8(&buf[..len]).map_err(|_| RecordError::InvalidUtf8)?;
    let s = s.to_string();
    buf.advance(len);
    Ok(Some(s))
}
