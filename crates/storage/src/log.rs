//! A logger keeping the most recent log entries in the backend.
//!
//! In the browser every record is echoed to the console as well.

use std::{collections::VecDeque, sync::Mutex};

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

use crate::{Backend, Key};

pub const MAX_ENTRIES: usize = 100;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("log unavailable: {0}")]
    Backend(String),
    #[error("unreadable log: {0}")]
    Format(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelName")]
    pub level: Level,
    pub message: String,
}

impl Entry {
    fn new(record: &Record) -> Self {
        Self {
            time: Local::now().format("%b %d %H:%M:%S").to_string(),
            level: record.level(),
            message: record.args().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
pub enum LevelName {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Log entries persisted in a backend, newest first.
pub struct LogStore<B> {
    backend: B,
}

impl<B: Backend> LogStore<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn entries(&self) -> Result<VecDeque<Entry>, Error> {
        let json = self
            .backend
            .get(Key::Log.as_ref())
            .map_err(|err| Error::Backend(err.to_string()))?;
        match json {
            Some(json) => serde_json::from_str(&json).map_err(|err| Error::Format(err.to_string())),
            None => Ok(VecDeque::new()),
        }
    }

    /// Add an entry and drop the oldest ones beyond [`MAX_ENTRIES`]. An unreadable log is
    /// started anew.
    pub fn append(&self, entry: Entry) -> Result<(), Error> {
        let mut entries = match self.entries() {
            Ok(entries) => entries,
            Err(Error::Format(_)) => VecDeque::new(),
            Err(err) => return Err(err),
        };
        entries.push_front(entry);
        entries.truncate(MAX_ENTRIES);
        let json = serde_json::to_string(&entries).map_err(|err| Error::Format(err.to_string()))?;
        self.backend
            .set(Key::Log.as_ref(), &json)
            .map_err(|err| Error::Backend(err.to_string()))
    }
}

/// Install a logger persisting all records up to `level` in `backend`.
///
/// # Errors
///
/// Returns an error if a logger has already been installed.
pub fn init<B>(backend: B, level: LevelFilter) -> Result<(), SetLoggerError>
where
    B: Backend + Send + 'static,
{
    let logger = Box::leak(Box::new(Logger::new(backend, level)));
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

struct Logger<B> {
    store: Mutex<LogStore<B>>,
    level: LevelFilter,
}

impl<B: Backend> Logger<B> {
    fn new(backend: B, level: LevelFilter) -> Self {
        Self {
            store: Mutex::new(LogStore::new(backend)),
            level,
        }
    }
}

impl<B: Backend + Send> log::Log for Logger<B> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = Entry::new(record);
        echo(entry.level, &entry.message);
        let Ok(store) = self.store.lock() else {
            return;
        };
        if let Err(err) = store.append(entry) {
            echo(Level::Warn, &format!("failed to persist log entry: {err}"));
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn echo(level: Level, message: &str) {
    match level {
        Level::Error => gloo_console::error!(message),
        Level::Warn => gloo_console::warn!(message),
        Level::Info => gloo_console::info!(message),
        Level::Debug | Level::Trace => gloo_console::debug!(message),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn echo(_: Level, _: &str) {}

#[cfg(test)]
mod tests {
    use log::Log;
    use pretty_assertions::assert_eq;

    use crate::{BackendError, MemoryStorage};

    use super::*;

    fn entry(message: &str) -> Entry {
        Entry {
            time: "Nov 14 22:13:20".to_string(),
            level: Level::Warn,
            message: message.to_string(),
        }
    }

    struct Unavailable;

    impl Backend for Unavailable {
        fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
            Err(BackendError::Unavailable(key.to_string()))
        }

        fn set(&self, key: &str, _: &str) -> Result<(), BackendError> {
            Err(BackendError::Unavailable(key.to_string()))
        }
    }

    #[test]
    fn test_entries_empty() {
        assert_eq!(
            LogStore::new(MemoryStorage::new()).entries(),
            Ok(VecDeque::new())
        );
    }

    #[test]
    fn test_append() {
        let storage = MemoryStorage::new();
        let log = LogStore::new(storage.clone());

        log.append(entry("a")).unwrap();
        log.append(entry("b")).unwrap();

        assert_eq!(log.entries(), Ok(VecDeque::from([entry("b"), entry("a")])));
        assert_eq!(
            storage.get(Key::Log.as_ref()).unwrap(),
            Some(
                r#"[{"time":"Nov 14 22:13:20","level":"Warn","message":"b"},{"time":"Nov 14 22:13:20","level":"Warn","message":"a"}]"#
                    .to_string()
            )
        );
    }

    #[test]
    fn test_append_keeps_latest_entries() {
        let log = LogStore::new(MemoryStorage::new());

        for i in 0..=MAX_ENTRIES {
            log.append(entry(&i.to_string())).unwrap();
        }

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), MAX_ENTRIES);
        assert_eq!(entries.front(), Some(&entry(&MAX_ENTRIES.to_string())));
        assert_eq!(entries.back(), Some(&entry("1")));
    }

    #[test]
    fn test_append_replaces_unparsable_log() {
        let log = LogStore::new(MemoryStorage::with_entries([(Key::Log.as_ref(), "{")]));

        assert!(matches!(log.entries(), Err(Error::Format(_))));

        log.append(entry("a")).unwrap();

        assert_eq!(log.entries(), Ok(VecDeque::from([entry("a")])));
    }

    #[test]
    fn test_append_unavailable_backend() {
        let log = LogStore::new(Unavailable);

        assert_eq!(
            log.append(entry("a")),
            Err(Error::Backend("storage unavailable: log".to_string()))
        );
    }

    #[test]
    fn test_logger_filters_by_level() {
        let storage = MemoryStorage::new();
        let logger = Logger::new(storage.clone(), LevelFilter::Info);

        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("cache hit"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Error)
                .args(format_args!("quota exceeded"))
                .build(),
        );

        assert_eq!(
            LogStore::new(storage)
                .entries()
                .unwrap()
                .into_iter()
                .map(|e| (e.level, e.message))
                .collect::<Vec<_>>(),
            vec![(Level::Error, "quota exceeded".to_string())]
        );
    }

    #[test]
    fn test_logger_ignores_unavailable_backend() {
        let logger = Logger::new(Unavailable, LevelFilter::Trace);

        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("disk almost full"))
                .build(),
        );
    }

    #[test]
    fn test_init() {
        let storage = MemoryStorage::new();
        init(storage.clone(), LevelFilter::Info).unwrap();

        log::debug!("cache hit");
        log::warn!("disk almost full");

        let entries = LogStore::new(storage).entries().unwrap();
        assert!(
            entries
                .iter()
                .any(|e| e.level == Level::Warn && e.message == "disk almost full")
        );
        assert!(!entries.iter().any(|e| e.message == "cache hit"));
    }
}
