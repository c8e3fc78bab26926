//! DataStore — lazily loaded, process-wide cache of the job dataset.
//!
//! Two states: unloaded and loaded. The first successful `get()` reads the
//! source and freezes the result; every later call hands out the same
//! `Arc<Dataset>` without touching the file. A failed load leaves the store
//! unloaded and surfaces the error to the caller. `reset()` / `reload()` are
//! the only way back to the unloaded state.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::data::error::DataResult;
use crate::data::loader::load_dataset;
use crate::data::models::Dataset;

pub struct DataStore {
    path: PathBuf,
    cached: Mutex<Option<Arc<Dataset>>>,
    loads: AtomicUsize,
}

impl DataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// Returns the cached dataset, loading it on first access.
    ///
    /// The lock is held across the load so concurrent first callers read the
    /// source exactly once and all observe the same instance.
    pub fn get(&self) -> DataResult<Arc<Dataset>> {
        let mut cached = self.cached.lock();
        if let Some(dataset) = cached.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        self.loads.fetch_add(1, Ordering::SeqCst);
        let dataset = match load_dataset(&self.path) {
            Ok(dataset) => Arc::new(dataset),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Job dataset load failed");
                return Err(e);
            }
        };
        *cached = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Returns the dataset only if it has already been loaded.
    pub fn peek(&self) -> Option<Arc<Dataset>> {
        self.cached.lock().as_ref().map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.lock().is_some()
    }

    /// Drops the cached dataset. Outstanding `Arc`s stay valid.
    pub fn reset(&self) {
        if self.cached.lock().take().is_some() {
            info!(path = %self.path.display(), "Job dataset cache cleared");
        }
    }

    /// Discards the cache and reads the source again.
    pub fn reload(&self) -> DataResult<Arc<Dataset>> {
        self.reset();
        let dataset = self.get()?;
        info!(
            path = %self.path.display(),
            records = dataset.len(),
            loads = self.load_count(),
            "Job dataset reloaded"
        );
        Ok(dataset)
    }

    /// Number of times the source file has been read.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}
