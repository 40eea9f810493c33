//! `yt-dlp` executable as the media downloader

use std::process::{Command, Stdio};

use log::debug;
use serde::Deserialize;

use crate::{
    config::DownloadConfig,
    download::{DownloadError, MediaDownloader},
    storage::fs::OutputLayout,
};

pub struct YtDlp {
    config: DownloadConfig,
}

#[derive(Deserialize)]
struct YtDlpMetadata {
    title: String,
}

impl YtDlp {
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    /// Fails if the configured program cannot be found
    pub fn check_available(&self) -> Result<(), DownloadError> {
        which::which(&self.config.program)
            .map(|path| debug!("using {}", path.display()))
            .map_err(|_| DownloadError::ToolNotFound(self.config.program.clone()))
    }

    /// `--no-overwrites` keeps a second run from downloading a logged link again
    fn download_args(&self, link: &str, layout: &OutputLayout) -> Vec<String> {
        let mut args = vec![
            "--no-overwrites".to_string(),
            "--format".to_string(),
            self.config.format.clone(),
            "--output".to_string(),
            layout.download_target().to_string_lossy().into_owned(),
        ];
        if self.config.ignore_errors {
            args.push("--ignore-errors".to_string());
        }
        args.push(link.to_string());
        args
    }
}

impl MediaDownloader for YtDlp {
    fn fetch_title(&self, link: &str) -> Result<String, DownloadError> {
        let output = Command::new(&self.config.program)
            .arg("--dump-json")
            .arg("--no-download")
            .arg(link)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            return Err(DownloadError::Failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let meta: YtDlpMetadata = serde_json::from_slice(&output.stdout)?;
        Ok(meta.title)
    }

    fn download(&self, link: &str, layout: &OutputLayout) -> Result<(), DownloadError> {
        let args = self.download_args(link, layout);
        debug!("{} {}", self.config.program, args.join(" "));

        let status = Command::new(&self.config.program).args(&args).status()?;
        if !status.success() {
            return Err(DownloadError::Failed(format!(
                "{} exited with {status}",
                self.config.program
            )));
        }
        Ok(())
    }
}
