use tagrecord_codec::{file, Record, RecordConfig};

use crate::cmd::DumpArgs;
use crate::exit::{record_error, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat};

pub fn run(args: DumpArgs, format: OutputFormat, config: RecordConfig) -> CliResult<i32> {
    let config = RecordConfig {
        decode_mode: args.decode_mode(),
        ..config
    };

    let mut record = Record::new();
    let result = file::load_into(&args.path, &mut record, config);

    if result.is_ok() || !record.is_empty() {
        print_record(&record, &args.path, format)?;
    }

    result.map_err(|err| {
        tracing::warn!(
            path = %args.path.display(),
            recovered = record.len(),
            "record could not be fully decoded"
        );
        record_error(&format!("failed decoding {}", args.path.display()), err)
    })?;

    Ok(SUCCESS)
}
