//! Save and load records from files on disk.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::RecordConfig;
use crate::error::Result;
use crate::reader::RecordReader;
use crate::record::Record;
use crate::writer::RecordWriter;

/// Write `record` to `path`, replacing any existing file, then clear it.
pub fn save(path: impl AsRef<Path>, record: &mut Record) -> Result<()> {
    save_with_config(path, record, RecordConfig::default())
}

/// Write `record` to `path` with explicit configuration, then clear it.
///
/// The record is written to a sibling `.tmp` file which is renamed over
/// `path` once synced. On any error the existing file is left as it was and
/// `record` keeps its contents.
pub fn save_with_config(
    path: impl AsRef<Path>,
    record: &mut Record,
    config: RecordConfig,
) -> Result<()> {
    let path = path.as_ref();
    let tmp = temp_sibling(path);

    let written = write_synced(&tmp, record, config).and_then(|()| Ok(fs::rename(&tmp, path)?));
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }

    debug!(path = %path.display(), entries = record.len(), "saved record");
    record.clear();
    Ok(())
}

fn write_synced(path: &Path, record: &Record, config: RecordConfig) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = RecordWriter::with_config(BufWriter::new(file), config);
    writer.write(record)?;
    let file = writer.finish()?.into_inner().map_err(|err| err.into_error())?;
    file.sync_all()?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read one record from the start of `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Record> {
    load_with_config(path, RecordConfig::default())
}

pub fn load_with_config(path: impl AsRef<Path>, config: RecordConfig) -> Result<Record> {
    let file = File::open(path.as_ref())?;
    let mut reader = RecordReader::with_config(BufReader::new(file), config);
    reader.read_record()
}

/// Read one record from `path` into an existing record.
pub fn load_into(path: impl AsRef<Path>, record: &mut Record, config: RecordConfig) -> Result<()> {
    let file = File::open(path.as_ref())?;
    RecordReader::with_config(BufReader::new(file), config).read_into(record)
}
