//! Scrapes a playlist page and decides which links still need downloading

use std::collections::HashSet;

use anyhow::{Context, anyhow};
use log::{debug, info};
use url::Url;

use crate::{
    browser::{BrowserLauncher, BrowserSession, BrowserTab, ElementQuery, ScrapedElement},
    config::ScraperConfig,
    domain::track::TrackRecord,
    playlist::prober::Prober,
    storage::{
        fs::OutputLayout,
        ledger::{Ledger, LogTarget},
    },
};

/// Why a track was accepted or rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackDecision {
    /// already in the success log
    Known,
    /// the `<id>.<ext>` file is already in the output directory
    OnDisk,
    Available,
    Unavailable,
}

impl TrackDecision {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, TrackDecision::Unavailable)
    }
}

pub struct LinkExtractor<'a> {
    config: &'a ScraperConfig,
    layout: &'a OutputLayout,
    ledger: &'a Ledger,
}

impl<'a> LinkExtractor<'a> {
    pub fn new(config: &'a ScraperConfig, layout: &'a OutputLayout, ledger: &'a Ledger) -> Self {
        Self {
            config,
            layout,
            ledger,
        }
    }

    /// Returns the links worth downloading, in page order.
    ///
    /// Any failure is reported on the console and yields an empty list,
    /// which callers cannot tell apart from an empty playlist.
    pub fn extract_tracks<L: BrowserLauncher>(&self, launcher: &L, playlist_url: &str) -> Vec<String> {
        match self.try_extract(launcher, playlist_url) {
            Ok(links) => links,
            Err(err) => {
                println!("An error occurred: {err:#}");
                Vec::new()
            }
        }
    }

    fn try_extract<L: BrowserLauncher>(
        &self,
        launcher: &L,
        playlist_url: &str,
    ) -> anyhow::Result<Vec<String>> {
        let known = self
            .ledger
            .load_successful_links()
            .context("failed to read the success log")?;

        // dropping the session at the end of this scope shuts the browser down
        let session = launcher.launch()?;
        let tracks = self.scrape(&session, playlist_url)?;
        info!("found {} tracks on {playlist_url}", tracks.len());

        let prober = Prober::new(&session, self.config, self.ledger);
        let mut accepted = Vec::new();
        for track in tracks {
            let decision = self.classify(&prober, &known, &track)?;
            debug!("{} -> {decision:?}", track.link);
            if decision.is_accepted() {
                accepted.push(track.link);
            }
        }

        Ok(accepted)
    }

    /// Loads the playlist in the main tab and reads `(title, link)` of every track element
    fn scrape<S: BrowserSession>(
        &self,
        session: &S,
        playlist_url: &str,
    ) -> anyhow::Result<Vec<TrackRecord>> {
        let tab = session.main_tab();
        tab.navigate(playlist_url)?;
        tab.wait_for(&self.config.track_selector, self.config.track_wait())?;
        std::thread::sleep(self.config.settle());

        let query = ElementQuery {
            selector: &self.config.track_selector,
            attribute: &self.config.link_attribute,
            child_selector: &self.config.title_selector,
        };
        let base = Url::parse(&tab.current_url()).ok();

        tab.read_elements(&query)?
            .into_iter()
            .map(|element| to_track(element, base.as_ref()))
            .collect()
    }

    fn classify<S: BrowserSession>(
        &self,
        prober: &Prober<'_, S>,
        known: &HashSet<String>,
        track: &TrackRecord,
    ) -> anyhow::Result<TrackDecision> {
        if known.contains(&track.link) {
            println!("Skipping already processed video: {}", track.title);
            return Ok(TrackDecision::Known);
        }

        if let Some(path) = self.layout.existing_output(&track.link) {
            println!("File already exists: {}", track.title);
            debug!("{} found at {}", track.link, path.display());
            self.ledger
                .append_record(LogTarget::Success, &track.title, &track.link)?;
            return Ok(TrackDecision::OnDisk);
        }

        println!("Checking video: {}", track.title);
        let decision = if prober.probe(track)?.is_available() {
            TrackDecision::Available
        } else {
            TrackDecision::Unavailable
        };
        Ok(decision)
    }
}

fn to_track(element: ScrapedElement, base: Option<&Url>) -> anyhow::Result<TrackRecord> {
    let raw_link = element
        .attribute
        .ok_or_else(|| anyhow!("track element has no link"))?;
    let title = element
        .child_text
        .ok_or_else(|| anyhow!("track element {raw_link} has no title"))?;
    Ok(TrackRecord::new(title, resolve_link(base, &raw_link)))
}

/// Makes relative links absolute against the page they were found on
pub fn resolve_link(base: Option<&Url>, raw: &str) -> String {
    match Url::parse(raw) {
        Ok(_) => raw.to_string(),
        Err(_) => base
            .and_then(|base| base.join(raw).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}
