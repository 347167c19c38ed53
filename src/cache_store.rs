//! Geocode cache backends.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;
use crate::model::Coordinate;
use crate::traits::CacheStore;

/// Stores the cache as a JSON object `{ address: { lat, lng } }`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for JsonFileStore {
    fn load(&self) -> Result<HashMap<String, Coordinate>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn persist(&self, entries: &HashMap<String, Coordinate>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Write aside, then swap in, so readers never see a truncated file.
        let tmp_path = self.path.with_extension("tmp");
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer(&mut writer, entries)?;
        writer.flush()?;
        drop(writer);
        fs::rename(tmp_path, &self.path)?;
        Ok(())
    }
}

/// In-process store. Keeps the last persisted snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Coordinate>>,
    persists: AtomicUsize,
}

impl MemoryStore {
    pub fn new(entries: HashMap<String, Coordinate>) -> Self {
        Self {
            entries: Mutex::new(entries),
            persists: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> HashMap<String, Coordinate> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// How many times `persist` was called.
    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}

impl CacheStore for MemoryStore {
    fn load(&self) -> Result<HashMap<String, Coordinate>> {
        Ok(self.snapshot())
    }

    fn persist(&self, entries: &HashMap<String, Coordinate>) -> Result<()> {
        *self.entries.lock().unwrap_or_else(|e| e.into_inner()) = entries.clone();
        self.persists.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl<S: CacheStore + ?Sized> CacheStore for std::sync::Arc<S> {
    fn load(&self) -> Result<HashMap<String, Coordinate>> {
        (**self).load()
    }

    fn persist(&self, entries: &HashMap<String, Coordinate>) -> Result<()> {
        (**self).persist(entries)
    }
}
