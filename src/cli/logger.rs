// stderr backend for the `log` facade

use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: StderrLogger = StderrLogger;

/// Writes every record to stderr, filtered by the global max level.
pub struct StderrLogger;

impl StderrLogger {
    pub fn setup(level: LevelFilter) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        let md = record.metadata();
        if !self.enabled(md) {
            return;
        }

        let module = record.module_path().unwrap_or_default();
        match md.level() {
            Level::Error => eprintln!("error: {}: {}", module, record.args()),
            Level::Warn => eprintln!("warning: {}: {}", module, record.args()),
            _ => eprintln!("{}: {}", module, record.args()),
        }
    }

    fn flush(&self) {}
}
