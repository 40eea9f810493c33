//! Layout of the output directory

use std::path::{Path, PathBuf};

use crate::{config::OutputConfig, domain::video_id::VideoId, storage::error::StorageError};

/// Naming contract shared by the link extractor and the downloader.
///
/// The extractor asks it whether `<id>.<extension>` is already present,
/// the downloader asks it where new files go.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
    extension: String,
    template: String,
}

impl OutputLayout {
    pub fn new(
        dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            template: template.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            config.resolve_dir()?,
            config.extension.clone(),
            config.template.clone(),
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory and its parents, no-op if it exists
    pub fn ensure_dir(&self) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn expected_path(&self, id: &VideoId) -> PathBuf {
        self.dir.join(format!("{}.{}", id.as_str(), self.extension))
    }

    /// Returns the path of the file marking `link` as downloaded, if it is on disk
    pub fn existing_output(&self, link: &str) -> Option<PathBuf> {
        let id = VideoId::from_link(link)?;
        let path = self.expected_path(&id);
        path.exists().then_some(path)
    }

    /// Full output template for the downloader
    pub fn download_target(&self) -> PathBuf {
        self.dir.join(&self.template)
    }
}
