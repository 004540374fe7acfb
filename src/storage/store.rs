//! File store trait and test double.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{MemoscribeError, Result};

/// A file visible in a remote folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// File name without any folder prefix, e.g. `standup.m4a`.
    pub name: String,
    /// Size in bytes as reported by the storage API.
    pub size: u64,
}

/// Remote storage operations used by the pipeline.
///
/// Folder arguments are top-level folder names (or `folder/subfolder`
/// paths) without leading slashes; implementations add whatever path
/// syntax their API wants.
#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
    /// Lists the files in `folder`, in the order the storage API returns
    /// them. Folders and other non-file entries are skipped.
    async fn list_folder(&self, folder: &str) -> Result<Vec<RemoteEntry>>;

    /// Downloads `folder/name` to a local path, returning the number of
    /// bytes written.
    async fn download(&self, folder: &str, name: &str, dest: &Path) -> Result<u64>;

    /// Uploads `data` as `folder/name`, replacing any existing file.
    async fn upload(&self, folder: &str, name: &str, data: Vec<u8>) -> Result<()>;

    /// Deletes `folder/name`.
    async fn delete(&self, folder: &str, name: &str) -> Result<()>;
}

#[async_trait::async_trait]
impl<T: FileStore> FileStore for Arc<T> {
    async fn list_folder(&self, folder: &str) -> Result<Vec<RemoteEntry>> {
        self.as_ref().list_folder(folder).await
    }

    async fn download(&self, folder: &str, name: &str, dest: &Path) -> Result<u64> {
        self.as_ref().download(folder, name, dest).await
    }

    async fn upload(&self, folder: &str, name: &str, data: Vec<u8>) -> Result<()> {
        self.as_ref().upload(folder, name, data).await
    }

    async fn delete(&self, folder: &str, name: &str) -> Result<()> {
        self.as_ref().delete(folder, name).await
    }
}

/// In-memory store for tests.
///
/// Seed it with [`with_file`](MockFileStore::with_file), then inspect the
/// recorded traffic after a run.
#[derive(Debug, Default)]
pub struct MockFileStore {
    files: Mutex<Vec<(String, Vec<u8>)>>,
    downloads: Mutex<Vec<String>>,
    uploads: Mutex<Vec<(String, String, Vec<u8>)>>,
    deletions: Mutex<Vec<(String, String)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file to the listing, in call order.
    pub fn with_file(self, name: &str, data: Vec<u8>) -> Self {
        lock(&self.files).push((name.to_string(), data));
        self
    }

    /// Names passed to `download`, in call order.
    pub fn downloads(&self) -> Vec<String> {
        lock(&self.downloads).clone()
    }

    /// `(folder, name, data)` triples passed to `upload`, in call order.
    pub fn uploads(&self) -> Vec<(String, String, Vec<u8>)> {
        lock(&self.uploads).clone()
    }

    /// `(folder, name)` pairs passed to `delete`, in call order.
    pub fn deletions(&self) -> Vec<(String, String)> {
        lock(&self.deletions).clone()
    }

    /// Files still present, i.e. seeded but not deleted.
    pub fn remaining_files(&self) -> Vec<String> {
        lock(&self.files).iter().map(|(name, _)| name.clone()).collect()
    }
}

#[async_trait::async_trait]
impl FileStore for MockFileStore {
    async fn list_folder(&self, _folder: &str) -> Result<Vec<RemoteEntry>> {
        Ok(lock(&self.files)
            .iter()
            .map(|(name, data)| RemoteEntry {
                name: name.clone(),
                size: data.len() as u64,
            })
            .collect())
    }

    async fn download(&self, _folder: &str, name: &str, dest: &Path) -> Result<u64> {
        let data = lock(&self.files)
            .iter()
            .find(|(file, _)| file == name)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| MemoscribeError::Storage {
                message: format!("no such file: {name}"),
            })?;
        std::fs::write(dest, &data)?;
        lock(&self.downloads).push(name.to_string());
        Ok(data.len() as u64)
    }

    async fn upload(&self, folder: &str, name: &str, data: Vec<u8>) -> Result<()> {
        lock(&self.uploads).push((folder.to_string(), name.to_string(), data));
        Ok(())
    }

    async fn delete(&self, folder: &str, name: &str) -> Result<()> {
        lock(&self.files).retain(|(file, _)| file != name);
        lock(&self.deletions).push((folder.to_string(), name.to_string()));
        Ok(())
    }
}
