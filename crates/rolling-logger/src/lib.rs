//! Rolling Logger
//!
//! `log` backend that keeps the last N formatted lines in memory and
//! forwards each line to the browser console (wasm32) or stderr.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

#[derive(Debug)]
pub enum InitError {
    /// Another `log` backend was installed first
    AlreadySet,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InitError::AlreadySet => write!(f, "a logger is already installed"),
        }
    }
}

impl std::error::Error for InitError {}

/// Fixed-capacity line buffer; the oldest line goes first
#[derive(Debug)]
pub struct Ring {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Ring {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub struct RollingLogger {
    app_name: String,
    ring: Mutex<Ring>,
}

impl RollingLogger {
    pub fn new(app_name: &str, capacity: usize) -> Self {
        Self {
            app_name: app_name.to_string(),
            ring: Mutex::new(Ring::new(capacity)),
        }
    }

    fn format(&self, record: &Record) -> String {
        format!(
            "[{}] {} {} {}: {}",
            chrono::Utc::now().format("%H:%M:%S%.3f"),
            self.app_name,
            record.level(),
            record.target(),
            record.args()
        )
    }

    pub fn recent_lines(&self) -> Vec<String> {
        match self.ring.lock() {
            Ok(ring) => ring.lines(),
            Err(poisoned) => poisoned.into_inner().lines(),
        }
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        emit(record.level(), &line);
        match self.ring.lock() {
            Ok(mut ring) => ring.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Install the logger as the `log` backend
///
/// Debug builds log at `Debug`, release builds at `Info`.
pub fn init_logger(app_name: &str, capacity: usize) -> Result<(), InitError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(app_name, capacity));
    log::set_logger(logger).map_err(|_| InitError::AlreadySet)?;
    log::set_max_level(if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    Ok(())
}

/// Buffered lines, oldest first; empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(RollingLogger::recent_lines).unwrap_or_default()
}
