//! Network interface configuration store.
//!
//! Holds the interface records last loaded from the interfaces file and
//! rewrites the whole file when one of them changes. Writes go to a
//! temporary file in the same directory which then replaces the original,
//! so readers never observe a half-written file.

pub mod format;
pub mod markup;

pub use format::{parse_interfaces, serialize_interfaces};
pub use markup::interface_form;

use crate::domain::error::NetworkConfigError;
use crate::domain::interface::{AddressMode, InterfaceRecord};
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// In-memory interface set backed by one interfaces file.
pub struct NetworkConfigStore {
    path: PathBuf,
    records: Mutex<Vec<InterfaceRecord>>,
}

impl NetworkConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, replacing the in-memory set.
    ///
    /// On error the in-memory set is cleared.
    pub fn load(&self) -> Result<Vec<InterfaceRecord>, NetworkConfigError> {
        let mut records = self.records.lock();
        records.clear();

        let text = std::fs::read_to_string(&self.path)?;
        *records = parse_interfaces(&text);

        for record in records.iter() {
            debug!(
                interface = %record.name,
                is_static = record.is_static,
                "Loaded network interface"
            );
        }
        Ok(records.clone())
    }

    /// Records from the last load
    pub fn records(&self) -> Vec<InterfaceRecord> {
        self.records.lock().clone()
    }

    pub fn get(&self, name: &str) -> Option<InterfaceRecord> {
        self.records.lock().iter().find(|r| r.name == name).cloned()
    }

    /// Change one interface's addressing and rewrite the file.
    ///
    /// Unknown names and incomplete static modes leave the file untouched.
    /// Other records are written back as loaded. If the write fails the
    /// in-memory set keeps its previous state.
    pub fn update(&self, name: &str, mode: AddressMode) -> Result<(), NetworkConfigError> {
        if !mode.is_complete() {
            return Err(NetworkConfigError::IncompleteStatic(name.to_string()));
        }
        let mut records = self.records.lock();

        let mut updated = records.clone();
        let Some(record) = updated.iter_mut().find(|r| r.name == name) else {
            warn!(interface = %name, "Interface not found");
            return Err(NetworkConfigError::UnknownInterface(name.to_string()));
        };
        record.apply(mode);

        self.write_locked(&updated)?;
        *records = updated;

        info!(interface = %name, path = %self.path.display(), "Network configuration updated");
        Ok(())
    }

    /// Rewrite the file from the in-memory set
    pub fn write(&self) -> Result<(), NetworkConfigError> {
        let records = self.records.lock();
        self.write_locked(&records)
    }

    fn write_locked(&self, records: &[InterfaceRecord]) -> Result<(), NetworkConfigError> {
        let content = serialize_interfaces(records);

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
