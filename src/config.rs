use anyhow::Context;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub ledger: LedgerConfig,
    pub browser: BrowserConfig,
    pub scraper: ScraperConfig,
    pub download: DownloadConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// Defaults to `~/Downloads/YouTubeVideos` when unset
    pub dir: Option<PathBuf>,
    /// Extension of the `<id>.<ext>` file that marks a video as downloaded
    pub extension: String,
    /// Output template handed to the downloader, relative to `dir`
    pub template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extension: "mp4".to_string(),
            template: "%(title)s.%(ext)s".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn default_dir() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to locate home directory")?;
        Ok(home.join("Downloads").join("YouTubeVideos"))
    }

    pub fn resolve_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LedgerConfig {
    pub success_log: PathBuf,
    pub failure_log: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            success_log: PathBuf::from("successful_downloads.csv"),
            failure_log: PathBuf::from("unavailable_videos.csv"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScraperConfig {
    pub track_selector: String,
    pub title_selector: String,
    pub link_attribute: String,
    pub player_selector: String,
    pub unavailable_phrases: Vec<String>,
    pub track_wait_secs: u64,
    pub settle_secs: u64,
    pub probe_wait_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            track_selector: ".track".to_string(),
            title_selector: ".video_title".to_string(),
            link_attribute: "href".to_string(),
            player_selector: "#player".to_string(),
            unavailable_phrases: vec![
                "Video unavailable".to_string(),
                "This video isn't available anymore".to_string(),
            ],
            track_wait_secs: 10,
            settle_secs: 2,
            probe_wait_secs: 5,
        }
    }
}

impl ScraperConfig {
    pub fn track_wait(&self) -> Duration {
        Duration::from_secs(self.track_wait_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn probe_wait(&self) -> Duration {
        Duration::from_secs(self.probe_wait_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DownloadConfig {
    pub program: String,
    pub format: String,
    pub ignore_errors: bool,
    pub pacing_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            format: "bestaudio[ext=m4a]/best[ext=mp4]/best".to_string(),
            ignore_errors: true,
            pacing_secs: 5,
        }
    }
}

impl DownloadConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_secs(self.pacing_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r##"
[output]
dir = "/home/sancho/Music/playlist"
extension = "m4a"
template = "%(id)s.%(ext)s"

[ledger]
success_log = "/var/lib/playlistdl/ok.csv"
failure_log = "/var/lib/playlistdl/bad.csv"

[browser]
headless = false
chrome_path = "/usr/bin/chromium"

[scraper]
track_selector = "li.entry"
title_selector = "span.name"
link_attribute = "data-href"
player_selector = "#movie_player"
unavailable_phrases = ["Private video"]
track_wait_secs = 20
settle_secs = 0
probe_wait_secs = 8

[download]
program = "/opt/yt-dlp"
format = "best"
ignore_errors = false
pacing_secs = 1
"##;

        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(
            cfg.output.dir,
            Some(PathBuf::from("/home/sancho/Music/playlist"))
        );
        assert_eq!(cfg.output.extension, "m4a");
        assert_eq!(cfg.output.template, "%(id)s.%(ext)s");

        assert_eq!(
            cfg.ledger.success_log,
            PathBuf::from("/var/lib/playlistdl/ok.csv")
        );
        assert!(!cfg.browser.headless);
        assert_eq!(
            cfg.browser.chrome_path,
            Some(PathBuf::from("/usr/bin/chromium"))
        );

        assert_eq!(cfg.scraper.track_selector, "li.entry");
        assert_eq!(cfg.scraper.link_attribute, "data-href");
        assert_eq!(cfg.scraper.player_selector, "#movie_player");
        assert_eq!(cfg.scraper.unavailable_phrases, vec!["Private video"]);
        assert_eq!(cfg.scraper.track_wait(), Duration::from_secs(20));
        assert_eq!(cfg.scraper.settle(), Duration::ZERO);
        assert_eq!(cfg.scraper.probe_wait(), Duration::from_secs(8));

        assert_eq!(cfg.download.program, "/opt/yt-dlp");
        assert!(!cfg.download.ignore_errors);
        assert_eq!(cfg.download.pacing(), Duration::from_secs(1));

        Ok(())
    }

    #[test]
    fn test_empty_config_uses_defaults() -> anyhow::Result<()> {
        let cfg: Config = toml::from_str("")?;

        assert_eq!(cfg.output.dir, None);
        assert_eq!(cfg.output.extension, "mp4");
        assert_eq!(
            cfg.ledger.success_log,
            PathBuf::from("successful_downloads.csv")
        );
        assert_eq!(
            cfg.ledger.failure_log,
            PathBuf::from("unavailable_videos.csv")
        );
        assert!(cfg.browser.headless);
        assert_eq!(cfg.scraper.track_selector, ".track");
        assert_eq!(cfg.scraper.title_selector, ".video_title");
        assert_eq!(cfg.scraper.player_selector, "#player");
        assert_eq!(cfg.scraper.unavailable_phrases.len(), 2);
        assert_eq!(cfg.scraper.track_wait(), Duration::from_secs(10));
        assert_eq!(cfg.scraper.settle(), Duration::from_secs(2));
        assert_eq!(cfg.scraper.probe_wait(), Duration::from_secs(5));
        assert_eq!(cfg.download.format, "bestaudio[ext=m4a]/best[ext=mp4]/best");
        assert_eq!(cfg.download.pacing(), Duration::from_secs(5));

        Ok(())
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() -> anyhow::Result<()> {
        let toml_str = r#"
[scraper]
probe_wait_secs = 1
"#;
        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(cfg.scraper.probe_wait(), Duration::from_secs(1));
        assert_eq!(cfg.scraper.track_wait(), Duration::from_secs(10));
        assert_eq!(cfg.scraper.track_selector, ".track");

        Ok(())
    }

    #[test]
    fn test_explicit_output_dir_wins() -> anyhow::Result<()> {
        let output = OutputConfig {
            dir: Some(PathBuf::from("/tmp/videos")),
            ..Default::default()
        };
        assert_eq!(output.resolve_dir()?, PathBuf::from("/tmp/videos"));
        Ok(())
    }

    #[test]
    fn test_load_missing_file_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(Config::load(&tmp.path().join("absent.toml")).is_err());
    }
}
