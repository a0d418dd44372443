#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use strum::AsRefStr;

pub mod local_storage;
pub mod log;
pub mod memory;
pub mod model;
pub mod store;
pub mod transfer;

pub use local_storage::LocalStorage;
pub use memory::MemoryStorage;
pub use store::Store;

#[cfg(test)]
mod tests {
    pub mod data;
}

/// A synchronous string key/value store, e.g. the local storage of a browser.
pub trait Backend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;
}

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<BackendError> for liftlog_domain::StorageError {
    fn from(value: BackendError) -> Self {
        liftlog_domain::StorageError::Other(Box::new(value))
    }
}

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    #[strum(serialize = "exerciseDataset")]
    Exercises,
    #[strum(serialize = "exercises")]
    Workouts,
    #[strum(serialize = "globals")]
    Globals,
    #[strum(serialize = "log")]
    Log,
}
