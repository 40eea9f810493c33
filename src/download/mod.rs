//! Sequential, paced downloading of accepted links

use std::time::Duration;

use thiserror::Error;

use crate::storage::fs::OutputLayout;

pub mod ytdlp;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{0} not found, is it installed and on PATH?")]
    ToolNotFound(String),

    #[error("failed to run downloader: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),

    #[error("failed to parse metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

pub trait MediaDownloader {
    fn fetch_title(&self, link: &str) -> Result<String, DownloadError>;

    /// Saves the best available stream into the output directory
    fn download(&self, link: &str, layout: &OutputLayout) -> Result<(), DownloadError>;
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub succeeded: usize,
    pub failed: Vec<String>,
}

/// Downloads one link, reporting any failure on the console instead of returning it
pub fn download_one<D: MediaDownloader>(downloader: &D, link: &str, layout: &OutputLayout) -> bool {
    let result = downloader.fetch_title(link).and_then(|title| {
        println!("Downloading: {title}");
        downloader.download(link, layout)?;
        Ok(title)
    });

    match result {
        Ok(title) => {
            println!("Download complete: {title}");
            println!("Saved to: {}", layout.dir().display());
            println!("---");
            true
        }
        Err(err) => {
            println!("Error downloading {link}: {err}");
            false
        }
    }
}

/// Downloads every link in order, pausing `pacing` between two items
pub fn download_all<D: MediaDownloader>(
    downloader: &D,
    links: &[String],
    layout: &OutputLayout,
    pacing: Duration,
) -> DownloadReport {
    let mut report = DownloadReport::default();

    for (i, link) in links.iter().enumerate() {
        println!("\nProcessing track {} of {}", i + 1, links.len());
        if download_one(downloader, link, layout) {
            report.succeeded += 1;
        } else {
            report.failed.push(link.clone());
        }

        if i + 1 < links.len() {
            std::thread::sleep(pacing);
        }
    }

    report
}
