use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::models::JobApplication;

pub const SLOT_NAME: &str = "job-tracker.applications.v1";

/// A decoded slot. `entries` counts every array element, nulls included, so
/// callers can tell a literal `[]` from a payload whose records were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub entries: usize,
    pub apps: Vec<JobApplication>,
}

/// The persisted slot: the whole collection is read and written as a unit.
pub trait Storage {
    /// `Ok(None)` means nothing has been persisted yet.
    fn read(&self) -> Result<Option<Snapshot>, StorageError>;
    fn write(&mut self, apps: &[JobApplication]) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_path() -> PathBuf {
        let file_name = format!("{}.json", SLOT_NAME);
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "job-tracker") {
            proj_dirs.data_dir().join(file_name)
        } else {
            PathBuf::from(file_name)
        }
    }
}

impl Storage for JsonFileStorage {
    fn read(&self) -> Result<Option<Snapshot>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode(&raw).map(Some)
    }

    fn write(&mut self, apps: &[JobApplication]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Write then rename so a crash never leaves a half-written slot behind
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encode(apps)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory slot holding the raw serialized text, so tests can plant
/// corrupt payloads and simulate a full disk.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub raw: Option<String>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Some(raw.to_string()),
            fail_writes: false,
        }
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<Snapshot>, StorageError> {
        self.raw.as_deref().map(decode).transpose()
    }

    fn write(&mut self, apps: &[JobApplication]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(std::io::Error::other("quota exceeded").into());
        }
        self.raw = Some(encode(apps)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.raw = None;
        Ok(())
    }
}

/// Parses a persisted payload. Anything but a JSON array of well-formed
/// records is rejected as a whole; `null` entries are skipped.
pub fn decode(raw: &str) -> Result<Snapshot, StorageError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let serde_json::Value::Array(items) = value else {
        return Err(StorageError::NotAnArray);
    };

    let entries = items.len();
    let apps = items
        .into_iter()
        .filter(|item| !item.is_null())
        .map(|item| serde_json::from_value(item).map_err(StorageError::from))
        .collect::<Result<Vec<JobApplication>, StorageError>>()?;
    Ok(Snapshot { entries, apps })
}

pub fn encode(apps: &[JobApplication]) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(apps)?)
}
