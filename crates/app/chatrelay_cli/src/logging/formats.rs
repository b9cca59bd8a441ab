use std::io::Write;

use flexi_logger::DeferredNow;
use log::{Level, Record};

/// `LEVEL message`, with the module path only for debug and trace records.
pub fn cli_format(
    w: &mut dyn Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    match record.level() {
        Level::Error | Level::Warn | Level::Info => {
            write!(w, "{:<5} {}", record.level(), record.args())
        }
        Level::Debug | Level::Trace => write!(
            w,
            "{:<5} [{}] {}",
            record.level(),
            record.module_path().unwrap_or("<unnamed>"),
            record.args()
        ),
    }
}
