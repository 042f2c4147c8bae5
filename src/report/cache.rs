// Parsed workbooks, kept until the file changes on disk.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use crate::report::*;

struct CacheEntry {
    modified: SystemTime,
    data: Arc<Extraction>,
}

/// The extracted indicators of each workbook, keyed by path.
///
/// An entry is reused as long as the modification time of the file is the one
/// seen when it was loaded. The data is shared read-only.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

fn modification_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl DatasetCache {
    pub fn new() -> DatasetCache {
        DatasetCache::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> DashboardResult<Arc<Extraction>>
    where
        F: FnOnce(&Path) -> DashboardResult<Extraction>,
    {
        let modified = modification_time(path);
        if let (Some(entry), Some(m)) = (self.entries.get(path), modified) {
            if entry.modified == m {
                debug!("get_or_load: cache hit for {:?}", path);
                return Ok(entry.data.clone());
            }
            info!("File {:?} changed since it was loaded, reloading", path);
        }

        let data = Arc::new(load(path)?);
        match modified {
            Some(m) => {
                self.entries.insert(
                    path.to_path_buf(),
                    CacheEntry {
                        modified: m,
                        data: data.clone(),
                    },
                );
            }
            None => {
                // Without a modification time there is nothing to validate the entry against.
                self.entries.remove(path);
            }
        }
        Ok(data)
    }

    /// Drops the entry of this file. Returns true if there was one.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Reloads the file, whether or not it changed.
    pub fn refresh<F>(&mut self, path: &Path, load: F) -> DashboardResult<Arc<Extraction>>
    where
        F: FnOnce(&Path) -> DashboardResult<Extraction>,
    {
        self.invalidate(path);
        self.get_or_load(path, load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as Counter;
    use std::time::Duration;

    fn counting_loader(
        counter: &Counter<u32>,
    ) -> impl FnOnce(&Path) -> DashboardResult<Extraction> + '_ {
        move |_: &Path| {
            counter.set(counter.get() + 1);
            Ok(Extraction::default())
        }
    }

    #[test]
    fn loads_once_while_unchanged() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let counter = Counter::new(0);
        let mut cache = DatasetCache::new();
        let a = cache.get_or_load(file.path(), counting_loader(&counter)).unwrap();
        let b = cache.get_or_load(file.path(), counting_loader(&counter)).unwrap();
        assert_eq!(counter.get(), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reloads_when_modified() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let counter = Counter::new(0);
        let mut cache = DatasetCache::new();
        cache.get_or_load(file.path(), counting_loader(&counter)).unwrap();
        file.as_file()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(86_400))
            .unwrap();
        cache.get_or_load(file.path(), counting_loader(&counter)).unwrap();
        assert_eq!(counter.get(), 2);
        cache.get_or_load(file.path(), counting_loader(&counter)).unwrap();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn explicit_refresh_and_invalidate() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let counter = Counter::new(0);
        let mut cache = DatasetCache::new();
        cache.get_or_load(file.path(), counting_loader(&counter)).unwrap();
        cache.refresh(file.path(), counting_loader(&counter)).unwrap();
        assert_eq!(counter.get(), 2);
        assert!(cache.invalidate(file.path()));
        assert!(!cache.invalidate(file.path()));
        assert!(cache.is_empty());
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let counter = Counter::new(0);
        let mut cache = DatasetCache::new();
        let missing = Path::new("/nonexistent/indicadores.xlsx");
        let res = cache.get_or_load(missing, |p| {
            crate::report::io_xlsx::read_grid(&p.display().to_string(), "Ficha_indicadores")
                .map(|_| Extraction::default())
        });
        assert!(res.is_err());
        cache.get_or_load(missing, counting_loader(&counter)).unwrap();
        cache.get_or_load(missing, counting_loader(&counter)).unwrap();
        assert_eq!(counter.get(), 2);
        assert!(cache.is_empty());
    }
}
