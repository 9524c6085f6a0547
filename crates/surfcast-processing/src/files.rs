use async_trait::async_trait;
use std::io;
use std::path::Path;

/// Access to media files on the local device
#[async_trait]
pub trait MediaFiles: Send + Sync {
    async fn size(&self, path: &Path) -> io::Result<u64>;

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// `MediaFiles` over the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

#[async_trait]
impl MediaFiles for LocalFiles {
    async fn size(&self, path: &Path) -> io::Result<u64> {
        Ok(tokio::fs::metadata(path).await?.len())
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}
