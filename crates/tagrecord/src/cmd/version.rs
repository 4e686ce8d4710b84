use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("tagrecord {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: tagrecord");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "features: registry={}, cli=true",
        cfg!(feature = "registry")
    );
    println!(
        "max_record_size_default: {}",
        tagrecord_codec::DEFAULT_MAX_RECORD_SIZE
    );

    Ok(SUCCESS)
}
