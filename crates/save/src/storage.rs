use super::*;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

/// Named blobs in a flat namespace.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Contents of `name`, or `None` if it was never written.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, SaveError>;
    /// Replace the contents of `name`.
    async fn write(&self, name: &str, bytes: Vec<u8>) -> Result<(), SaveError>;
}

/// Files in one directory. Writes go through a temporary file and a
/// rename so a reader never sees a partial document.
#[derive(Debug, Clone)]
pub struct Disk {
    dir: PathBuf,
}

impl Disk {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, SaveError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        log::info!("[save] storing under {}", dir.display());
        Ok(Self { dir })
    }
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl Storage for Disk {
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, SaveError> {
        match tokio::fs::read(self.dir.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
    async fn write(&self, name: &str, bytes: Vec<u8>) -> Result<(), SaveError> {
        let path = self.dir.join(name);
        let temp = path.with_extension("tmp");
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, &path).await?;
        log::debug!("[save] wrote {}", path.display());
        Ok(())
    }
}

/// In-process storage for tests and dry runs.
#[derive(Debug, Default)]
pub struct Memory {
    files: tokio::sync::Mutex<BTreeMap<String, Vec<u8>>>,
}

impl Memory {
    /// Names written so far, sorted.
    pub async fn names(&self) -> Vec<String> {
        self.files.lock().await.keys().cloned().collect()
    }
}

#[async_trait::async_trait]
impl Storage for Memory {
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, SaveError> {
        Ok(self.files.lock().await.get(name).cloned())
    }
    async fn write(&self, name: &str, bytes: Vec<u8>) -> Result<(), SaveError> {
        self.files.lock().await.insert(name.to_string(), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[tokio::test]
    async fn disk_reads_back_writes() {
        let temp = tempfile::TempDir::new().unwrap();
        let disk = Disk::open(temp.path().join("cup")).await.unwrap();
        assert_eq!(disk.read("a.json").await.unwrap(), None);
        disk.write("a.json", b"one".to_vec()).await.unwrap();
        disk.write("a.json", b"two".to_vec()).await.unwrap();
        assert_eq!(disk.read("a.json").await.unwrap(), Some(b"two".to_vec()));
        assert!(!disk.dir().join("a.tmp").exists());
    }
    #[tokio::test]
    async fn memory_reads_back_writes() {
        let memory = Memory::default();
        memory.write("b.json", b"x".to_vec()).await.unwrap();
        memory.write("a.json", b"y".to_vec()).await.unwrap();
        assert_eq!(memory.read("b.json").await.unwrap(), Some(b"x".to_vec()));
        assert_eq!(memory.names().await, vec!["a.json", "b.json"]);
    }
}
