// Read-through cache of the survey workbook.

use log::{debug, info};

use snafu::prelude::*;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use crate::dash::io_excel::{load_workbook, SurveyWorkbook};
use crate::dash::*;

/// Identifies one version of the workbook on disk.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CacheKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

/// Holds the last workbook loaded from `path`.
///
/// The workbook is reloaded when the modification time of the file changes, or
/// after an explicit call to [`WorkbookCache::invalidate`]. A disabled cache
/// reloads the file on every call.
#[derive(Debug)]
pub struct WorkbookCache {
    path: PathBuf,
    enabled: bool,
    entry: Mutex<Option<(CacheKey, Arc<SurveyWorkbook>)>>,
}

impl WorkbookCache {
    pub fn new(path: &Path) -> WorkbookCache {
        WorkbookCache {
            path: path.to_path_buf(),
            enabled: true,
            entry: Mutex::new(None),
        }
    }

    pub fn uncached(path: &Path) -> WorkbookCache {
        WorkbookCache {
            enabled: false,
            ..WorkbookCache::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The current workbook, loading it if needed.
    pub fn get(&self) -> DashResult<Arc<SurveyWorkbook>> {
        let key = self.current_key()?;
        if !self.enabled {
            return Ok(Arc::new(load_workbook(&self.path)?));
        }

        let mut entry = self.lock();
        if let Some((cached_key, workbook)) = entry.as_ref() {
            if *cached_key == key {
                debug!("WorkbookCache: hit for {:?}", key);
                return Ok(workbook.clone());
            }
            info!("WorkbookCache: {:?} changed on disk, reloading", self.path);
        }
        let workbook = Arc::new(load_workbook(&self.path)?);
        *entry = Some((key, workbook.clone()));
        Ok(workbook)
    }

    /// Drops the cached workbook. The next call to `get` reads the file again.
    pub fn invalidate(&self) {
        info!("WorkbookCache: invalidating {:?}", self.path);
        *self.lock() = None;
    }

    fn current_key(&self) -> DashResult<CacheKey> {
        let display = self.path.display().to_string();
        let meta = match fs::metadata(&self.path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return MissingFileSnafu { path: display }.fail()
            }
            Err(e) => return Err(e).context(ReadingMetadataSnafu { path: display }),
        };
        Ok(CacheKey {
            path: self.path.clone(),
            modified: meta.modified().ok(),
        })
    }

    // A panic while loading leaves no partial state behind, the poison can be ignored.
    fn lock(&self) -> MutexGuard<'_, Option<(CacheKey, Arc<SurveyWorkbook>)>> {
        self.entry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fetches the workbook from an async handler, off the runtime threads.
pub async fn fetch(cache: &Arc<WorkbookCache>) -> DashResult<Arc<SurveyWorkbook>> {
    let cache = cache.clone();
    match tokio::task::spawn_blocking(move || cache.get()).await {
        Ok(res) => res,
        Err(e) => whatever!("Workbook loading task failed: {}", e),
    }
}
