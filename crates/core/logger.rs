/*!
A minimal logger for the `log` crate: no filtering of its own, just a
single global sink writing to stderr. Level filtering is handled by
`log::set_max_level`, set from the `-v`/`-vv` flag count.
*/

use log::Log;

#[derive(Debug)]
pub(crate) struct Logger(());

const LOGGER: &Logger = &Logger(());

impl Logger {
    pub(crate) fn init() -> Result<(), log::SetLoggerError> {
        log::set_logger(LOGGER)
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        eprintln_locked!("{}|{}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}
