pub mod formats;

use flexi_logger::Logger;

use crate::Error;

/// Maps the `-v` count to a default level spec.
fn level_spec(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Starts logging to stdout; `RUST_LOG` overrides the `-v` level.
pub fn init(verbose: u8) -> Result<(), Error> {
    Logger::try_with_env_or_str(level_spec(verbose))?
        .format(formats::cli_format)
        .log_to_stdout()
        .start()?;

    Ok(())
}
