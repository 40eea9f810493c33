//! Checks whether a single video can still be played

use anyhow::Context;
use log::{debug, warn};

use crate::{
    browser::{BrowserError, BrowserSession, BrowserTab},
    config::ScraperConfig,
    domain::track::TrackRecord,
    storage::ledger::{Ledger, LogTarget},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable(UnavailableReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// the page contains one of the unavailability phrases
    Marker(String),
    /// the player never showed up
    PlayerMissing,
    /// loading or reading the page failed
    ProbeFailed(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Loads videos in a secondary tab of a borrowed session and records the verdict
pub struct Prober<'a, S: BrowserSession> {
    session: &'a S,
    config: &'a ScraperConfig,
    ledger: &'a Ledger,
}

impl<'a, S: BrowserSession> Prober<'a, S> {
    pub fn new(session: &'a S, config: &'a ScraperConfig, ledger: &'a Ledger) -> Self {
        Self {
            session,
            config,
            ledger,
        }
    }

    /// Classifies the track and appends it to the success or the failure log.
    ///
    /// Page problems are verdicts, not errors. Errors are reserved for a broken
    /// session (no tab can be opened) and for ledger writes.
    pub fn probe(&self, track: &TrackRecord) -> anyhow::Result<Availability> {
        let availability = self.check(&track.link)?;

        let target = match &availability {
            Availability::Available => {
                println!("Video available: {}", track.title);
                LogTarget::Success
            }
            Availability::Unavailable(UnavailableReason::Marker(_)) => {
                println!("Video unavailable: {}", track.title);
                LogTarget::Failure
            }
            Availability::Unavailable(reason) => {
                debug!("probe of {} failed: {reason:?}", track.link);
                println!("Error checking video: {}", track.title);
                LogTarget::Failure
            }
        };

        self.ledger
            .append_record(target, &track.title, &track.link)
            .with_context(|| format!("failed to record verdict for {}", track.link))?;

        Ok(availability)
    }

    /// Opens a tab, inspects the link and always closes the tab again
    fn check(&self, link: &str) -> anyhow::Result<Availability> {
        let tab = self
            .session
            .open_tab()
            .context("failed to open a tab for probing")?;

        let availability = match self.inspect(&tab, link) {
            Ok(availability) => availability,
            Err(err) => Availability::Unavailable(UnavailableReason::ProbeFailed(err.to_string())),
        };

        if let Err(err) = self.session.close_tab(tab) {
            warn!("failed to close probe tab for {link}: {err}");
        }

        Ok(availability)
    }

    fn inspect(&self, tab: &S::Tab, link: &str) -> Result<Availability, BrowserError> {
        tab.navigate(link)?;

        if let Err(err) = tab.wait_for(&self.config.player_selector, self.config.probe_wait()) {
            debug!("{err}");
            return Ok(Availability::Unavailable(UnavailableReason::PlayerMissing));
        }

        let markup = tab.markup()?;
        Ok(match find_marker(&markup, &self.config.unavailable_phrases) {
            Some(phrase) => Availability::Unavailable(UnavailableReason::Marker(phrase.to_string())),
            None => Availability::Available,
        })
    }
}

/// First phrase that occurs verbatim in the markup
pub fn find_marker<'p>(markup: &str, phrases: &'p [String]) -> Option<&'p str> {
    phrases
        .iter()
        .map(String::as_str)
        .find(|phrase| markup.contains(phrase))
}
