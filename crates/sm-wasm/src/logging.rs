//! `log` sink that writes to the browser console, plus a panic hook.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[selection-menu {} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
        write_console(record.level(), &line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::log_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(level: Level, line: &str) {
    if level <= Level::Warn {
        eprintln!("{line}");
    }
}

/// Install the console logger and panic hook. Safe to call repeatedly.
pub fn init() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Info);
        }
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(|info| {
            let msg = format!("selection-menu panic: {info}");
            web_sys::console::error_1(&msg.into());
        }));
    });
}

/// Switch between normal (`Info`) and verbose (`Trace`) logging.
pub fn set_verbose(verbose: bool) {
    log::set_max_level(if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    });
}
