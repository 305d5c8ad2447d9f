//! Locked, atomic JSON documents on disk.
//!
//! Shared by the file store tables and the device-local day overrides.
//! Reads take a shared lock; writes go to a temp file in the same
//! directory, are synced, and then renamed over the original. Every
//! read-modify-write cycle in a data directory runs under one exclusive
//! lock file.

use crate::{DayOverrides, Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const LOCK: &str = ".onyx.lock";

/// Take the exclusive lock shared by every writer in `dir`
///
/// Released when the returned file is unlocked or dropped.
pub(crate) fn lock_dir(dir: &Path) -> Result<File> {
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(dir.join(LOCK))?;
    lock.lock_exclusive()?;
    Ok(lock)
}

/// Read a document's raw contents under a shared lock.
///
/// Returns `None` if the file doesn't exist.
pub(crate) fn read_locked(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    Ok(Some(contents))
}

/// Atomically replace a document with the JSON form of `value`
pub(crate) fn write_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "document path missing parent")
    })?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string_pretty(value)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

/// Load a document, falling back to the default when missing or unreadable
pub(crate) fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let contents = match read_locked(path) {
        Ok(Some(contents)) => contents,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!("Unable to read {:?}: {}. Using defaults.", path, e);
            return T::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}. Using defaults.", path, e);
            T::default()
        }
    }
}

impl DayOverrides {
    /// Load overrides from a file
    ///
    /// Returns default (no overrides) if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let overrides: DayOverrides = load_or_default(path);
        tracing::debug!(
            "Loaded {} rest days and {} swaps from {:?}",
            overrides.rest_days.len(),
            overrides.swaps.len(),
            path
        );
        Ok(overrides)
    }

    /// Save overrides atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, self)
    }

    /// Load overrides, modify them, and save them back
    ///
    /// Runs under the data directory lock. Unlike [`DayOverrides::load`], a
    /// corrupt file is a storage error and is left on disk as it is.
    pub fn update<F, R>(path: &Path, f: F) -> Result<R>
    where
        F: FnOnce(&mut DayOverrides) -> R,
    {
        let dir = path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "overrides path missing parent")
        })?;
        std::fs::create_dir_all(dir)?;
        let lock = lock_dir(dir)?;

        let result = Self::load_for_update(path).and_then(|mut overrides| {
            let result = f(&mut overrides);
            overrides.save(path)?;
            Ok(result)
        });

        lock.unlock()?;
        result
    }

    fn load_for_update(path: &Path) -> Result<Self> {
        match read_locked(path)? {
            Some(contents) if !contents.trim().is_empty() => serde_json::from_str(&contents)
                .map_err(|e| Error::Storage(format!("{:?} is not valid overrides: {}", path, e))),
            _ => Ok(DayOverrides::default()),
        }
    }
}
