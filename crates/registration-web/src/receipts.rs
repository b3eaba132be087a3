//! Filesystem storage for uploaded payment proofs.
//!
//! Uploads are written under a single directory with generated names
//! (`<uuid>.<ext>`). The registration row stores the generated name as its
//! `payment_proof` reference, so references must stay bare filenames.

use std::io;
use std::path::{Path, PathBuf};

use receipt_core::ImageUpload;
use tokio::fs;
use uuid::Uuid;

/// Stores payment proof images on disk.
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    dir: PathBuf,
}

impl ReceiptStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Directory the store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an uploaded image and return its reference.
    pub async fn save(&self, image: &ImageUpload) -> io::Result<String> {
        let reference = format!(
            "{}.{}",
            Uuid::new_v4(),
            extension_for(&image.content_type)
        );
        fs::write(self.dir.join(&reference), &image.bytes).await?;
        Ok(reference)
    }

    /// Read a stored image back.
    pub async fn read(&self, reference: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(reference)?).await
    }

    /// Delete a stored image.
    pub async fn remove(&self, reference: &str) -> io::Result<()> {
        fs::remove_file(self.path_for(reference)?).await
    }

    /// Content type to serve a stored reference with.
    pub fn content_type_for(reference: &str) -> &'static str {
        match Path::new(reference).extension().and_then(|ext| ext.to_str()) {
            Some("png") => "image/png",
            Some("jpg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            Some("bmp") => "image/bmp",
            _ => "application/octet-stream",
        }
    }

    /// Resolve a reference inside the store directory.
    ///
    /// References come back from the database, but they are also reachable
    /// through the download route, so anything that is not a bare filename
    /// is rejected.
    fn path_for(&self, reference: &str) -> io::Result<PathBuf> {
        let bare = Path::new(reference)
            .file_name()
            .and_then(|name| name.to_str());
        if reference.is_empty() || bare != Some(reference) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid receipt reference",
            ));
        }
        Ok(self.dir.join(reference))
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        _ => "img",
    }
}
