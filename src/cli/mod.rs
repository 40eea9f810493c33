use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::{
    browser::{BrowserLauncher, chrome::ChromeLauncher},
    config::Config,
    download::{self, DownloadReport, MediaDownloader, ytdlp::YtDlp},
    playlist::extractor::LinkExtractor,
    storage::{fs::OutputLayout, ledger::Ledger},
};

#[derive(Parser)]
#[command(name = "playlistdl")]
#[command(version = "0.1")]
#[command(about = "Download videos from a Musi playlist")]
pub struct Cli {
    /// URL of the playlist page
    pub playlist_url: String,

    /// Output directory (default: ~/Downloads/YouTubeVideos)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run the browser with a visible window
    #[arg(long)]
    pub show_browser: bool,
}

impl Cli {
    /// Config file values with command line overrides applied
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(output) = &self.output {
            cfg.output.dir = Some(output.clone());
        }
        if self.show_browser {
            cfg.browser.headless = false;
        }
        Ok(cfg)
    }
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = cli.resolve_config()?;

    let layout = OutputLayout::from_config(&cfg.output)?;
    layout.ensure_dir().with_context(|| {
        format!(
            "Failed to create output directory {}",
            layout.dir().display()
        )
    })?;

    let downloader = YtDlp::new(cfg.download.clone());
    downloader.check_available()?;

    let launcher = ChromeLauncher::new(cfg.browser.clone());

    if let Some(report) = run_pipeline(&cfg, &layout, &launcher, &downloader, &cli.playlist_url) {
        info!("{report:?}");
        println!(
            "\nDone: {} downloaded, {} failed",
            report.succeeded,
            report.failed.len()
        );
    }

    Ok(())
}

/// Scrapes the playlist and downloads the accepted links, `None` when there is nothing to download
pub fn run_pipeline<L: BrowserLauncher, D: MediaDownloader>(
    cfg: &Config,
    layout: &OutputLayout,
    launcher: &L,
    downloader: &D,
    playlist_url: &str,
) -> Option<DownloadReport> {
    let ledger = Ledger::new(&cfg.ledger);

    println!("Fetching tracks from playlist: {playlist_url}");
    let links = LinkExtractor::new(&cfg.scraper, layout, &ledger).extract_tracks(launcher, playlist_url);

    if links.is_empty() {
        println!("No tracks found or error accessing the playlist.");
        return None;
    }

    Some(download::download_all(
        downloader,
        &links,
        layout,
        cfg.download.pacing(),
    ))
}
