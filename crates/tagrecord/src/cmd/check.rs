use std::fs;

use bytes::BytesMut;
use tagrecord_codec::{decode_record, RecordConfig, RecordError};

use crate::cmd::CheckArgs;
use crate::exit::{io_error, record_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_check, CheckSummary, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat, config: RecordConfig) -> CliResult<i32> {
    let bytes = fs::read(&args.path)
        .map_err(|err| io_error(&format!("failed reading {}", args.path.display()), err))?;
    let context = format!("invalid record {}", args.path.display());

    let mut buf = BytesMut::from(bytes.as_slice());
    let record = decode_record(&mut buf, config.max_record_size)
        .map_err(|err| record_error(&context, err))?
        .ok_or_else(|| record_error(&context, RecordError::Truncated))?;
    let trailing = buf.len();

    if args.strict && trailing > 0 {
        return Err(CliError::new(
            DATA_INVALID,
            format!("{context}: {trailing} bytes after terminator"),
        ));
    }

    let summary = CheckSummary::new(&args.path, bytes.len() - trailing, trailing, &record);
    print_check(&summary, format)?;
    Ok(SUCCESS)
}
