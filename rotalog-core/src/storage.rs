use std::{
    collections::HashMap,
    fs::{self, File},
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

/// Upper bound on the candidates tried by [`LogStorage::next_available_name`].
pub const MAX_NAME_PROBES: u64 = 10_000;

/// Byte store holding log files and the status record.
///
/// Implementations report I/O problems through `io::Result`; the rotation
/// engine never lets them reach its callers.
pub trait LogStorage: Send + Sync {
    /// Appends `text` to `name`, creating it if needed.
    fn append(&self, name: &str, text: &str) -> io::Result<()>;
    /// Replaces the content of `name`.
    fn save(&self, name: &str, text: &str) -> io::Result<()>;
    /// Content of `name`, empty if it does not exist.
    fn load(&self, name: &str) -> io::Result<String>;
    /// Removes `name`. Removing a missing entry succeeds.
    fn delete(&self, name: &str) -> io::Result<()>;
    /// Size in KB rounded to the nearest integer, `None` if absent.
    fn size_kb(&self, name: &str) -> io::Result<Option<u64>>;
    fn exists(&self, name: &str) -> bool;

    /// First `{base}{N}.log` with N = 1, 2, ... that does not exist yet.
    ///
    /// Gives up after [`MAX_NAME_PROBES`] candidates, returning `{base}1.log`,
    /// so a store that reports every name as taken cannot stall the caller.
    fn next_available_name(&self, base: &str) -> String {
        (1..=MAX_NAME_PROBES)
            .map(|n| format!("{base}{n}.log"))
            .find(|name| !self.exists(name))
            .unwrap_or_else(|| format!("{base}1.log"))
    }
}

fn bytes_to_kb(len: u64) -> u64 {
    (len + 512) / 1024
}

impl<T: LogStorage + ?Sized> LogStorage for Box<T> {
    fn append(&self, name: &str, text: &str) -> io::Result<()> {
        (**self).append(name, text)
    }
    fn save(&self, name: &str, text: &str) -> io::Result<()> {
        (**self).save(name, text)
    }
    fn load(&self, name: &str) -> io::Result<String> {
        (**self).load(name)
    }
    fn delete(&self, name: &str) -> io::Result<()> {
        (**self).delete(name)
    }
    fn size_kb(&self, name: &str) -> io::Result<Option<u64>> {
        (**self).size_kb(name)
    }
    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }
    fn next_available_name(&self, base: &str) -> String {
        (**self).next_available_name(base)
    }
}

impl<T: LogStorage + ?Sized> LogStorage for Arc<T> {
    fn append(&self, name: &str, text: &str) -> io::Result<()> {
        (**self).append(name, text)
    }
    fn save(&self, name: &str, text: &str) -> io::Result<()> {
        (**self).save(name, text)
    }
    fn load(&self, name: &str) -> io::Result<String> {
        (**self).load(name)
    }
    fn delete(&self, name: &str) -> io::Result<()> {
        (**self).delete(name)
    }
    fn size_kb(&self, name: &str) -> io::Result<Option<u64>> {
        (**self).size_kb(name)
    }
    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }
    fn next_available_name(&self, base: &str) -> String {
        (**self).next_available_name(base)
    }
}

/// Log files stored flat inside one folder.
#[derive(Debug, Clone)]
pub struct FileStorage {
    folder: PathBuf,
}

impl FileStorage {
    /// Creates `folder` if it does not exist.
    pub fn new<P: AsRef<Path>>(folder: P) -> Result<Self, io::Error> {
        fs::create_dir_all(&folder)?;
        Ok(Self {
            folder: folder.as_ref().to_path_buf(),
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.folder.join(name)
    }
}

impl LogStorage for FileStorage {
    fn append(&self, name: &str, text: &str) -> io::Result<()> {
        let mut file = File::options()
            .create(true)
            .append(true)
            .open(self.path(name))?;
        file.write_all(text.as_bytes())?;
        file.flush()
    }

    fn save(&self, name: &str, text: &str) -> io::Result<()> {
        fs::write(self.path(name), text)
    }

    fn load(&self, name: &str) -> io::Result<String> {
        match fs::read_to_string(self.path(name)) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            other => other,
        }
    }

    fn delete(&self, name: &str) -> io::Result<()> {
        match fs::remove_file(self.path(name)) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn size_kb(&self, name: &str) -> io::Result<Option<u64>> {
        match fs::metadata(self.path(name)) {
            Ok(metadata) => Ok(Some(bytes_to_kb(metadata.len()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// A name whose existence cannot be determined counts as taken.
    fn exists(&self, name: &str) -> bool {
        fs::exists(self.path(name)).unwrap_or(true)
    }
}

/// Volatile storage, mostly useful in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted names of every stored entry.
    pub fn names(&self) -> Vec<String> {
        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = files.keys().cloned().collect();
        names.sort();
        names
    }
}

impl LogStorage for MemoryStorage {
    fn append(&self, name: &str, text: &str) -> io::Result<()> {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.entry(name.to_string()).or_default().push_str(text);
        Ok(())
    }

    fn save(&self, name: &str, text: &str) -> io::Result<()> {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.insert(name.to_string(), text.to_string());
        Ok(())
    }

    fn load(&self, name: &str) -> io::Result<String> {
        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(files.get(name).cloned().unwrap_or_default())
    }

    fn delete(&self, name: &str) -> io::Result<()> {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.remove(name);
        Ok(())
    }

    fn size_kb(&self, name: &str) -> io::Result<Option<u64>> {
        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(files.get(name).map(|content| bytes_to_kb(content.len() as u64)))
    }

    fn exists(&self, name: &str) -> bool {
        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.contains_key(name)
    }
}

/// Storage for targets without a usable filesystem. Every call panics.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedStorage;

impl UnsupportedStorage {
    fn fail(&self, op: &str) -> ! {
        panic!("log storage is not available on this platform (called `{op}`)")
    }
}

impl LogStorage for UnsupportedStorage {
    fn append(&self, _: &str, _: &str) -> io::Result<()> {
        self.fail("append")
    }
    fn save(&self, _: &str, _: &str) -> io::Result<()> {
        self.fail("save")
    }
    fn load(&self, _: &str) -> io::Result<String> {
        self.fail("load")
    }
    fn delete(&self, _: &str) -> io::Result<()> {
        self.fail("delete")
    }
    fn size_kb(&self, _: &str) -> io::Result<Option<u64>> {
        self.fail("size_kb")
    }
    fn exists(&self, _: &str) -> bool {
        self.fail("exists")
    }
    fn next_available_name(&self, _: &str) -> String {
        self.fail("next_available_name")
    }
}

/// Storage rooted at `folder` for the current target.
#[cfg(not(all(target_arch = "wasm32", not(target_os = "wasi"))))]
pub fn platform_storage<P: AsRef<Path>>(folder: P) -> Result<Box<dyn LogStorage>, io::Error> {
    Ok(Box::new(FileStorage::new(folder)?))
}

/// Storage rooted at `folder` for the current target.
#[cfg(all(target_arch = "wasm32", not(target_os = "wasi")))]
pub fn platform_storage<P: AsRef<Path>>(_folder: P) -> Result<Box<dyn LogStorage>, io::Error> {
    Ok(Box::new(UnsupportedStorage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_append_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        storage.append("app1.log", "Hello, world!\n").unwrap();
        storage.append("app1.log", "rust is awesome !\n").unwrap();
        assert_eq!(
            storage.load("app1.log").unwrap(),
            "Hello, world!\nrust is awesome !\n"
        );
        storage.save("app1.log", "test").unwrap();
        assert_eq!(storage.load("app1.log").unwrap(), "test");
    }

    #[test]
    fn test_file_storage_missing_entries() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested")).unwrap();
        assert!(storage.folder().is_dir());
        assert_eq!(storage.load("missing.log").unwrap(), "");
        assert_eq!(storage.size_kb("missing.log").unwrap(), None);
        assert!(storage.delete("missing.log").is_ok());
        assert!(!storage.exists("missing.log"));
    }

    #[test]
    fn test_file_storage_size_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        storage.save("big.log", &"x".repeat(2048)).unwrap();
        assert_eq!(storage.size_kb("big.log").unwrap(), Some(2));
        storage.delete("big.log").unwrap();
        assert!(!storage.path("big.log").exists());
    }

    #[test]
    fn test_size_rounds_to_nearest_kb() {
        assert_eq!(bytes_to_kb(0), 0);
        assert_eq!(bytes_to_kb(511), 0);
        assert_eq!(bytes_to_kb(512), 1);
        assert_eq!(bytes_to_kb(1535), 1);
        assert_eq!(bytes_to_kb(1536), 2);
    }

    #[test]
    fn test_next_available_name_skips_existing() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.next_available_name("app"), "app1.log");
        storage.append("app1.log", "a").unwrap();
        storage.append("app2.log", "b").unwrap();
        assert_eq!(storage.next_available_name("app"), "app3.log");
        storage.delete("app1.log").unwrap();
        assert_eq!(storage.next_available_name("app"), "app1.log");
    }

    #[test]
    fn test_next_available_name_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        File::create(storage.path("app1.log")).unwrap();
        assert_eq!(storage.next_available_name("app"), "app2.log");
    }

    #[test]
    fn test_unknown_existence_counts_as_taken() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        storage.save("blocker", "not a folder").unwrap();
        // stat below a regular file fails with something other than NotFound
        assert!(storage.exists("blocker/app1.log"));
        assert!(!storage.exists("app1.log"));
        assert_eq!(storage.next_available_name("blocker/app"), "blocker/app1.log");
    }

    #[test]
    fn test_next_available_name_gives_up_on_saturated_store() {
        struct Saturated;
        impl LogStorage for Saturated {
            fn append(&self, _: &str, _: &str) -> io::Result<()> {
                Ok(())
            }
            fn save(&self, _: &str, _: &str) -> io::Result<()> {
                Ok(())
            }
            fn load(&self, _: &str) -> io::Result<String> {
                Ok(String::new())
            }
            fn delete(&self, _: &str) -> io::Result<()> {
                Ok(())
            }
            fn size_kb(&self, _: &str) -> io::Result<Option<u64>> {
                Ok(None)
            }
            fn exists(&self, _: &str) -> bool {
                true
            }
        }
        assert_eq!(Saturated.next_available_name("app"), "app1.log");
    }

    #[test]
    fn test_boxed_storage_delegates() {
        let storage: Box<dyn LogStorage> = Box::new(MemoryStorage::new());
        storage.append("a.log", "line").unwrap();
        assert!(storage.exists("a.log"));
        assert_eq!(storage.next_available_name("a"), "a1.log");
    }

    #[test]
    #[should_panic(expected = "not available on this platform")]
    fn test_unsupported_storage_fails_loudly() {
        let _ = UnsupportedStorage.append("app1.log", "line");
    }
}
