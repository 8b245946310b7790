use std::collections::BTreeMap;
use std::io::{self, Cursor, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{CoreboxError, CoreboxResult};

use super::FilePath;
use super::traits::{Pal, ReadSeek};

/// Mode recorded for entries added through the test helpers.
const MOCK_DEFAULT_MODE: u32 = 0o755;

/* 📖 # How does MockPal model the filesystem?

A single ordered map from normalized path to entry, where an entry is either a
file (content and mode) or a directory (mode). The empty path is the root and is
always a directory. Directory listings are derived from the keys, so they come
back sorted by path.

Parent directories must exist before a file is created in them, which lets
tests exercise the same failures RealPal produces.
*/

#[derive(Debug, Clone)]
enum MockEntry {
    File { content: Vec<u8>, mode: u32 },
    Directory { mode: u32 },
}

type EntryMap = Arc<Mutex<BTreeMap<FilePath, MockEntry>>>;

/// In-memory PAL implementation for testing.
///
/// # Examples
///
/// ```
/// use corebox_base::{MockPal, Pal, FilePath};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("docs/test.txt"), b"content".to_vec());
/// let content = mock.read_file_to_string(&FilePath::from("docs/test.txt")).unwrap();
/// assert_eq!(content, "content");
/// assert!(mock.is_directory(&FilePath::from("docs")).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPal {
    entries: EntryMap,
}

impl MockPal {
    /// Create a new MockPal containing only the root directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating missing parent directories.
    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        let key = path.normalized();
        let mut entries = self.entries.lock();
        for ancestor in ancestors(&key) {
            entries
                .entry(ancestor)
                .or_insert(MockEntry::Directory {
                    mode: MOCK_DEFAULT_MODE,
                });
        }
        entries.insert(
            key,
            MockEntry::File {
                content,
                mode: MOCK_DEFAULT_MODE,
            },
        );
    }

    /// Add a directory and its missing parents.
    pub fn add_directory(&self, path: FilePath) {
        let key = path.normalized();
        let mut entries = self.entries.lock();
        for ancestor in ancestors(&key).into_iter().chain([key]) {
            entries
                .entry(ancestor)
                .or_insert(MockEntry::Directory {
                    mode: MOCK_DEFAULT_MODE,
                });
        }
    }

    /// Permission bits recorded for an entry.
    pub fn file_mode(&self, path: &FilePath) -> Option<u32> {
        match self.entries.lock().get(&path.normalized()) {
            Some(MockEntry::File { mode, .. }) | Some(MockEntry::Directory { mode }) => Some(*mode),
            None => None,
        }
    }

    fn check_parent_is_directory(
        entries: &BTreeMap<FilePath, MockEntry>,
        path: &FilePath,
        key: &FilePath,
    ) -> CoreboxResult<()> {
        let Some(parent) = key.parent() else {
            return Ok(());
        };
        if parent.is_root() {
            return Ok(());
        }
        match entries.get(&parent) {
            Some(MockEntry::Directory { .. }) => Ok(()),
            Some(MockEntry::File { .. }) => Err(io_failure(
                path,
                io::ErrorKind::NotADirectory,
                format!("Not a directory: {}", parent),
            )),
            None => Err(io_failure(
                path,
                io::ErrorKind::NotFound,
                format!("Parent directory not found: {}", parent),
            )),
        }
    }
}

/// Proper ancestors of a normalized path, outermost first, root excluded.
fn ancestors(key: &FilePath) -> Vec<FilePath> {
    let mut result = Vec::new();
    let mut current = key.parent();
    while let Some(parent) = current {
        if parent.is_root() {
            break;
        }
        current = parent.parent();
        result.push(parent);
    }
    result.reverse();
    result
}

fn io_failure(path: &FilePath, kind: io::ErrorKind, message: String) -> Box<CoreboxError> {
    Box::new(CoreboxError::file_error(
        path.as_path(),
        io::Error::new(kind, message),
    ))
}

impl Pal for MockPal {
    fn file_exists(&self, path: &FilePath) -> CoreboxResult<bool> {
        let key = path.normalized();
        Ok(key.is_root() || self.entries.lock().contains_key(&key))
    }

    fn read_file(&self, path: &FilePath) -> CoreboxResult<Box<dyn ReadSeek + 'static>> {
        let entries = self.entries.lock();
        match entries.get(&path.normalized()) {
            Some(MockEntry::File { content, .. }) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Directory { .. }) => Err(io_failure(
                path,
                io::ErrorKind::IsADirectory,
                format!("Is a directory: {}", path),
            )),
            None if path.is_root() => Err(io_failure(
                path,
                io::ErrorKind::IsADirectory,
                format!("Is a directory: {}", path),
            )),
            None => Err(Box::new(CoreboxError::not_found(path.as_path()))),
        }
    }

    fn create_file(&self, path: &FilePath, mode: u32) -> CoreboxResult<Box<dyn Write>> {
        let key = path.normalized();
        let mut entries = self.entries.lock();
        if key.is_root() || matches!(entries.get(&key), Some(MockEntry::Directory { .. })) {
            return Err(io_failure(
                path,
                io::ErrorKind::IsADirectory,
                format!("Is a directory: {}", path),
            ));
        }
        Self::check_parent_is_directory(&entries, path, &key)?;

        // An existing file keeps its mode, like a real truncating open.
        let mode = match entries.get(&key) {
            Some(MockEntry::File { mode, .. }) => *mode,
            _ => mode,
        };
        entries.insert(
            key.clone(),
            MockEntry::File {
                content: Vec::new(),
                mode,
            },
        );

        // Content is stored in the map when the writer is dropped
        Ok(Box::new(MockFileWriter {
            path: key,
            mode,
            entries: Arc::clone(&self.entries),
            buffer: Vec::new(),
        }))
    }

    fn create_directory_all(&self, path: &FilePath, mode: u32) -> CoreboxResult<()> {
        let key = path.normalized();
        if key.is_root() {
            return Ok(());
        }
        let mut entries = self.entries.lock();
        for component in ancestors(&key).into_iter().chain([key]) {
            match entries.get(&component) {
                Some(MockEntry::Directory { .. }) => {}
                Some(MockEntry::File { .. }) => {
                    return Err(io_failure(
                        path,
                        io::ErrorKind::AlreadyExists,
                        format!("File exists: {}", component),
                    ));
                }
                None => {
                    entries.insert(component, MockEntry::Directory { mode });
                }
            }
        }
        Ok(())
    }

    fn read_directory(&self, path: &FilePath) -> CoreboxResult<Vec<FilePath>> {
        let key = path.normalized();
        let entries = self.entries.lock();
        if !key.is_root() {
            match entries.get(&key) {
                Some(MockEntry::Directory { .. }) => {}
                Some(MockEntry::File { .. }) => {
                    return Err(io_failure(
                        path,
                        io::ErrorKind::NotADirectory,
                        format!("Not a directory: {}", path),
                    ));
                }
                None => return Err(Box::new(CoreboxError::not_found(path.as_path()))),
            }
        }
        Ok(entries
            .keys()
            .filter(|candidate| candidate.parent().as_ref() == Some(&key))
            .filter_map(|child| child.file_name().map(|name| key.join(name)))
            .collect())
    }

    fn is_directory(&self, path: &FilePath) -> CoreboxResult<bool> {
        let key = path.normalized();
        if key.is_root() {
            return Ok(true);
        }
        match self.entries.lock().get(&key) {
            Some(MockEntry::Directory { .. }) => Ok(true),
            Some(MockEntry::File { .. }) => Ok(false),
            None => Err(Box::new(CoreboxError::not_found(path.as_path()))),
        }
    }
}

/// Writer that stores its buffer as the file content when dropped.
struct MockFileWriter {
    path: FilePath,
    mode: u32,
    entries: EntryMap,
    buffer: Vec<u8>,
}

impl Write for MockFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MockFileWriter {
    fn drop(&mut self) {
        self.entries.lock().insert(
            self.path.clone(),
            MockEntry::File {
                content: std::mem::take(&mut self.buffer),
                mode: self.mode,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_exists_true() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("test.txt"), b"content".to_vec());

        assert!(pal.file_exists(&FilePath::from("test.txt")).unwrap());
    }

    #[test]
    fn test_file_exists_false() {
        let pal = MockPal::new();

        assert!(!pal.file_exists(&FilePath::from("test.txt")).unwrap());
    }

    #[test]
    fn test_file_exists_for_directory() {
        let pal = MockPal::new();
        pal.add_directory(FilePath::from("dir"));

        assert!(pal.file_exists(&FilePath::from("dir")).unwrap());
        assert!(pal.file_exists(&FilePath::from("")).unwrap());
    }

    #[test]
    fn test_read_file_not_found() {
        let pal = MockPal::new();

        let err = pal.read_file(&FilePath::from("nonexistent.txt")).err().unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_directory_as_file_fails() {
        let pal = MockPal::new();
        pal.add_directory(FilePath::from("dir"));

        let err = pal.read_file(&FilePath::from("dir")).err().unwrap();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_create_file() {
        let pal = MockPal::new();

        let mut writer = pal.create_file(&FilePath::from("new.txt"), 0o600).unwrap();
        writer.write_all(b"test content").unwrap();
        drop(writer);

        let content = pal.read_file_to_string(&FilePath::from("new.txt")).unwrap();
        assert_eq!(content, "test content");
        assert_eq!(pal.file_mode(&FilePath::from("new.txt")), Some(0o600));
    }

    #[test]
    fn test_create_file_truncates_and_keeps_mode() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("old.txt"), b"long old content".to_vec());

        let mut writer = pal.create_file(&FilePath::from("old.txt"), 0o600).unwrap();
        writer.write_all(b"new").unwrap();
        drop(writer);

        assert_eq!(
            pal.read_file_to_string(&FilePath::from("old.txt")).unwrap(),
            "new"
        );
        assert_eq!(
            pal.file_mode(&FilePath::from("old.txt")),
            Some(MOCK_DEFAULT_MODE)
        );
    }

    #[test]
    fn test_create_file_missing_parent() {
        let pal = MockPal::new();

        let err = pal
            .create_file(&FilePath::from("missing/new.txt"), 0o755)
            .err()
            .unwrap();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("missing/new.txt"));
    }

    #[test]
    fn test_create_directory_all() {
        let pal = MockPal::new();

        pal.create_directory_all(&FilePath::from("a/b/c"), 0o700).unwrap();

        for dir in ["a", "a/b", "a/b/c"] {
            assert!(pal.is_directory(&FilePath::from(dir)).unwrap());
            assert_eq!(pal.file_mode(&FilePath::from(dir)), Some(0o700));
        }
    }

    #[test]
    fn test_create_directory_all_existing_is_ok() {
        let pal = MockPal::new();
        pal.add_directory(FilePath::from("a"));

        pal.create_directory_all(&FilePath::from("a"), 0o700).unwrap();
        assert_eq!(pal.file_mode(&FilePath::from("a")), Some(MOCK_DEFAULT_MODE));
    }

    #[test]
    fn test_create_directory_all_through_file_fails() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("a"), b"".to_vec());

        let result = pal.create_directory_all(&FilePath::from("a/b"), 0o755);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_directory() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("dir/file1.txt"), b"".to_vec());
        pal.add_directory(FilePath::from("dir/sub_dir"));
        pal.add_file(FilePath::from("dir/sub_dir/nested.txt"), b"".to_vec());
        pal.add_file(FilePath::from("other.txt"), b"".to_vec());

        let entries = pal.read_directory(&FilePath::from("dir")).unwrap();
        assert_eq!(
            entries,
            vec![
                FilePath::from("dir/file1.txt"),
                FilePath::from("dir/sub_dir")
            ]
        );
    }

    #[test]
    fn test_read_directory_root() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("a.txt"), b"".to_vec());
        pal.add_file(FilePath::from("dir/b.txt"), b"".to_vec());

        let entries = pal.read_directory(&FilePath::from("")).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_read_directory_not_found() {
        let pal = MockPal::new();

        let err = pal.read_directory(&FilePath::from("nope")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_is_directory() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("dir/file.txt"), b"".to_vec());

        assert!(pal.is_directory(&FilePath::from("dir")).unwrap());
        assert!(!pal.is_directory(&FilePath::from("dir/file.txt")).unwrap());
        assert!(
            pal.is_directory(&FilePath::from("dir/missing"))
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn test_multiple_files() {
        let pal = MockPal::new();
        for i in 0..5 {
            pal.add_file(
                FilePath::from(format!("file{}.txt", i)),
                format!("content {}", i).into_bytes(),
            );
        }

        for i in 0..5 {
            let path = FilePath::from(format!("file{}.txt", i));
            let content = pal.read_file_to_string(&path).unwrap();
            assert_eq!(content, format!("content {}", i));
        }
    }
}
