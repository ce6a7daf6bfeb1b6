use super::{DirEntry, FileMetadata, FileSystem, FileType};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Read;
use std::path::Path;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn file_type_of(meta: &fs::Metadata) -> FileType {
    if meta.is_file() {
        FileType::File
    } else if meta.is_dir() {
        FileType::Directory
    } else {
        FileType::Symlink
    }
}

impl FileSystem for RealFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let meta = fs::metadata(path).context(format!("Failed to get metadata for {:?}", path))?;

        Ok(FileMetadata {
            created: meta.created().ok().map(DateTime::<Utc>::from),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    fn read_bytes(&self, path: &Path, max_bytes: usize) -> Result<Vec<u8>> {
        let file = fs::File::open(path).context(format!("Failed to open file {:?}", path))?;
        let mut buffer = Vec::new();
        file.take(max_bytes as u64)
            .read_to_end(&mut buffer)
            .context(format!("Failed to read bytes from {:?}", path))?;
        Ok(buffer)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            // Follows symlinks so an aliased bundle still reads as a directory
            let file_type = match fs::metadata(&path) {
                Ok(meta) => file_type_of(&meta),
                Err(_) => FileType::Symlink,
            };

            result.push(DirEntry {
                path,
                name,
                file_type,
            });
        }

        Ok(result)
    }
}
