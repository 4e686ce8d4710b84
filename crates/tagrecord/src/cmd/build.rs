use std::io::Read;
use std::path::Path;

use tagrecord_codec::{file, Record, RecordConfig};

use crate::cmd::BuildArgs;
use crate::exit::{io_error, record_error, CliError, CliResult, DATA_INVALID, SUCCESS};

pub fn run(args: BuildArgs, config: RecordConfig) -> CliResult<i32> {
    let json = read_input(&args.input)?;
    let mut record = parse_record(&json)?;
    let entries = record.len();

    file::save_with_config(&args.output, &mut record, config).map_err(|err| {
        record_error(&format!("failed writing {}", args.output.display()), err)
    })?;

    tracing::info!(path = %args.output.display(), entries, "wrote record");
    Ok(SUCCESS)
}

fn read_input(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .map_err(|err| io_error("failed reading stdin", err))?;
        return Ok(json);
    }
    std::fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}

fn parse_record(json: &str) -> CliResult<Record> {
    serde_json::from_str(json)
        .map_err(|err| CliError::new(DATA_INVALID, format!("invalid record description: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_description_with_every_kind() {
        let record = parse_record(
            r#"{
                "booleans": {"powered": true},
                "integers": {"health": 20},
                "doubles": {"speed": 0.5},
                "strings": {"owner": "alice"},
                "boolean_arrays": {"faces": [true, false]},
                "integer_arrays": {"scores": [1, 2, 3]},
                "double_arrays": {"temps": []},
                "string_arrays": {"tags": ["hot"]}
            }"#,
        )
        .expect("description should parse");
        assert_eq!(record.len(), 8);
        assert_eq!(record.get_string("owner"), Some("alice"));
    }

    #[test]
    fn rejects_unknown_mapping() {
        let err = parse_record(r#"{"longs": {"x": 1}}"#).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn rejects_out_of_range_integer() {
        let err = parse_record(r#"{"integers": {"x": 4294967296}}"#).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }
}
