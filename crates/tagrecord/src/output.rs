use std::io::IsTerminal;
use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tagrecord_codec::{Record, Tag, Value};

use crate::exit::{CliError, CliResult, INTERNAL};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct DumpOutput {
    path: String,
    entries: usize,
    record: serde_json::Value,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string(value)
        .map_err(|err| CliError::new(INTERNAL, format!("failed encoding output: {err}")))
}

/// JSON form of a record. NaN and infinite doubles, which JSON numbers cannot
/// hold, are written as the strings `"NaN"`, `"inf"` and `"-inf"`.
pub fn record_json(record: &Record) -> CliResult<serde_json::Value> {
    let mut json = serde_json::to_value(record)
        .map_err(|err| CliError::new(INTERNAL, format!("failed encoding output: {err}")))?;

    for (name, v) in record.doubles.iter().filter(|(_, v)| !v.is_finite()) {
        json["doubles"][name.as_str()] = serde_json::Value::String(v.to_string());
    }
    for (name, values) in &record.double_arrays {
        for (i, v) in values.iter().enumerate().filter(|(_, v)| !v.is_finite()) {
            json["double_arrays"][name.as_str()][i] = serde_json::Value::String(v.to_string());
        }
    }
    Ok(json)
}

pub fn print_record(record: &Record, path: &Path, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let out = DumpOutput {
                path: path.display().to_string(),
                entries: record.len(),
                record: record_json(record)?,
            };
            println!("{}", to_json(&out)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TAG", "NAME", "VALUE"]);
            for field in record.fields() {
                table.add_row(vec![
                    field.tag().to_string(),
                    field.name.clone(),
                    value_preview(&field.value),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for field in record.fields() {
                println!(
                    "{} {} = {}",
                    field.tag(),
                    field.name,
                    value_preview(&field.value)
                );
            }
        }
    }
    Ok(())
}

/// Result of validating a record file.
#[derive(Serialize)]
pub struct CheckSummary {
    pub path: String,
    pub bytes: usize,
    pub trailing_bytes: usize,
    pub entries: usize,
    pub by_tag: Vec<TagCount>,
}

#[derive(Serialize)]
pub struct TagCount {
    pub tag: &'static str,
    pub code: u8,
    pub count: usize,
}

impl CheckSummary {
    pub fn new(path: &Path, bytes: usize, trailing_bytes: usize, record: &Record) -> Self {
        let by_tag = Tag::ALL
            .iter()
            .map(|tag| TagCount {
                tag: tag.name(),
                code: tag.as_byte(),
                count: record.fields().filter(|f| f.tag() == *tag).count(),
            })
            .collect();
        Self {
            path: path.display().to_string(),
            bytes,
            trailing_bytes,
            entries: record.len(),
            by_tag,
        }
    }
}

pub fn print_check(summary: &CheckSummary, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", to_json(summary)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TAG", "CODE", "COUNT"]);
            for row in &summary.by_tag {
                table.add_row(vec![
                    row.tag.to_string(),
                    row.code.to_string(),
                    row.count.to_string(),
                ]);
            }
            println!("{table}");
            println!(
                "{}: ok ({} entries, {} bytes)",
                summary.path, summary.entries, summary.bytes
            );
        }
        OutputFormat::Pretty => {
            println!(
                "{}: ok ({} entries, {} bytes, {} trailing)",
                summary.path, summary.entries, summary.bytes, summary.trailing_bytes
            );
        }
    }
    Ok(())
}

pub fn value_preview(value: &Value) -> String {
    fn list<T: ToString>(items: &[T]) -> String {
        let inner: Vec<String> = items.iter().map(ToString::to_string).collect();
        format!("[{}]", inner.join(", "))
    }

    match value {
        Value::Boolean(v) => v.to_string(),
        Value::Integer(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::String(v) => format!("{v:?}"),
        Value::BooleanArray(v) => list(v),
        Value::IntegerArray(v) => list(v),
        Value::DoubleArray(v) => list(v),
        Value::StringArray(v) => {
            let quoted: Vec<String> = v.iter().map(|s| format!("{s:?}")).collect();
            list(&quoted)
        }
    }
}
