use super::{DirEntry, FileMetadata, FileSystem, FileType};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub content: Option<Vec<u8>>,
    pub file_type: FileType,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl MockEntry {
    fn directory() -> Self {
        Self {
            content: None,
            file_type: FileType::Directory,
            created: None,
            modified: None,
        }
    }
}

/// In-memory file system for tests
pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, MockEntry>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            root,
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        self.add_bytes(path, content.as_bytes());
    }

    pub fn add_bytes(&self, path: impl AsRef<Path>, content: &[u8]) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.write();

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(
            path,
            MockEntry {
                content: Some(content.to_vec()),
                file_type: FileType::File,
                created: None,
                modified: None,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.write();

        Self::ensure_parents(&mut files, &path);
        files.entry(path).or_insert_with(MockEntry::directory);
    }

    /// Sets timestamps on an existing entry; returns false when the path is unknown
    pub fn set_timestamps(
        &self,
        path: impl AsRef<Path>,
        created: Option<DateTime<Utc>>,
        modified: Option<DateTime<Utc>>,
    ) -> bool {
        let path = self.normalize_path(path.as_ref());
        match self.write().get_mut(&path) {
            Some(entry) => {
                entry.created = created;
                entry.modified = modified;
                true
            }
            None => false,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files
                .entry(current.clone())
                .or_insert_with(MockEntry::directory);
        }
    }

    fn kind_of(&self, path: &Path) -> Option<FileType> {
        let path = self.normalize_path(path);
        self.read().get(&path).map(|e| e.file_type)
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        self.kind_of(path) == Some(FileType::Directory)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.kind_of(path) == Some(FileType::File)
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let path = self.normalize_path(path);
        let files = self.read();
        let entry = files
            .get(&path)
            .ok_or_else(|| anyhow!("Path not found: {:?}", path))?;

        Ok(FileMetadata {
            created: entry.created,
            modified: entry.modified,
        })
    }

    fn read_bytes(&self, path: &Path, max_bytes: usize) -> Result<Vec<u8>> {
        let path = self.normalize_path(path);
        let files = self.read();
        let entry = files
            .get(&path)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;
        let content = entry
            .content
            .as_ref()
            .ok_or_else(|| anyhow!("Not a file: {:?}", path))?;

        Ok(content[..content.len().min(max_bytes)].to_vec())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let path = self.normalize_path(path);
        let files = self.read();

        match files.get(&path) {
            Some(entry) if entry.file_type == FileType::Directory => {}
            _ => return Err(anyhow!("Directory not found: {:?}", path)),
        }

        let entries = files
            .iter()
            .filter(|(file_path, _)| file_path.parent() == Some(path.as_path()))
            .map(|(file_path, entry)| DirEntry {
                path: file_path.clone(),
                name: file_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("")
                    .to_string(),
                file_type: entry.file_type,
            })
            .collect();

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_add_file() {
        let fs = MockFileSystem::new();
        fs.add_file("test.txt", "hello");

        assert!(fs.is_dir(Path::new("/mock")));
        assert!(fs.is_file(Path::new("/mock/test.txt")));
    }

    #[test]
    fn test_add_dir() {
        let fs = MockFileSystem::new();
        fs.add_dir("Skim.app");

        assert!(fs.is_dir(Path::new("/mock/Skim.app")));
        assert!(!fs.is_file(Path::new("/mock/Skim.app")));
    }

    #[test]
    fn test_read_bytes() {
        let fs = MockFileSystem::new();
        fs.add_file("test.txt", "hello world");

        assert_eq!(fs.read_bytes(Path::new("/mock/test.txt"), 5).unwrap(), b"hello");
        assert_eq!(
            fs.read_bytes(Path::new("/mock/test.txt"), 100).unwrap(),
            b"hello world"
        );
    }

    #[test]
    fn test_binary_content() {
        let fs = MockFileSystem::new();
        fs.add_bytes("Info.plist", &[0x62, 0x70, 0xff, 0xfe]);

        assert_eq!(fs.read_bytes(Path::new("/mock/Info.plist"), 2).unwrap(), b"bp");
        assert!(fs.read_bytes(Path::new("/mock"), 2).is_err());
    }

    #[test]
    fn test_timestamps() {
        let fs = MockFileSystem::new();
        fs.add_dir("Skim.app");
        let when = Utc.with_ymd_and_hms(2023, 5, 6, 7, 8, 9).unwrap();

        assert!(fs.set_timestamps("Skim.app", Some(when), Some(when)));
        assert!(!fs.set_timestamps("Missing.app", None, None));

        let meta = fs.metadata(Path::new("/mock/Skim.app")).unwrap();
        assert_eq!(meta.created, Some(when));
        assert_eq!(meta.modified, Some(when));
    }

    #[test]
    fn test_read_dir_lists_direct_children_only() {
        let fs = MockFileSystem::new();
        fs.add_file("Skim.app/Contents/Info.plist", "<plist/>");
        fs.add_file("notes.txt", "content");

        let entries = fs.read_dir(Path::new("/mock")).unwrap();
        let mut names: Vec<&str> = entries.iter().map(|e| e.file_name()).collect();
        names.sort();

        assert_eq!(names, vec!["Skim.app", "notes.txt"]);
    }

    #[test]
    fn test_read_dir_on_file_errors() {
        let fs = MockFileSystem::new();
        fs.add_file("notes.txt", "content");
        assert!(fs.read_dir(Path::new("/mock/notes.txt")).is_err());
        assert!(fs.read_dir(Path::new("/mock/missing")).is_err());
    }

    #[test]
    fn test_with_root() {
        let fs = MockFileSystem::with_root(PathBuf::from("/Applications"));
        fs.add_file("Slack.app/Contents/Info.plist", "<plist/>");

        assert!(fs.is_dir(Path::new("/Applications/Slack.app")));
        assert!(fs.is_file(Path::new("/Applications/Slack.app/Contents/Info.plist")));
    }
}
