//! Browsing capability used to scrape playlists and probe videos
//!
//! The rest of the program only sees these traits. A session owns a main tab
//! and lends out secondary tabs; dropping the session tears the browser down.

use std::time::Duration;

use thiserror::Error;

pub mod chrome;
#[cfg(test)]
pub mod fake;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("failed to navigate to {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("no element matching '{selector}' within {timeout:?}: {message}")]
    Wait {
        selector: String,
        timeout: Duration,
        message: String,
    },

    #[error("failed to read element: {0}")]
    Element(String),

    #[error("tab error: {0}")]
    Tab(String),
}

/// What to read from every element matching `selector`
#[derive(Debug, Clone, Copy)]
pub struct ElementQuery<'a> {
    pub selector: &'a str,
    /// attribute read from the element itself
    pub attribute: &'a str,
    /// nested element whose text is read
    pub child_selector: &'a str,
}

/// Values read from a single element, `None` where the attribute or child is absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedElement {
    pub attribute: Option<String>,
    pub child_text: Option<String>,
}

pub trait BrowserTab {
    fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Blocks until an element matching `selector` is present, or `timeout` elapses
    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Reads every matching element in document order
    fn read_elements(&self, query: &ElementQuery<'_>) -> Result<Vec<ScrapedElement>, BrowserError>;

    /// Full rendered markup of the current page
    fn markup(&self) -> Result<String, BrowserError>;

    fn current_url(&self) -> String;
}

pub trait BrowserSession {
    type Tab: BrowserTab;

    fn main_tab(&self) -> &Self::Tab;

    /// Opens a new tab and gives it focus
    fn open_tab(&self) -> Result<Self::Tab, BrowserError>;

    /// Closes a tab obtained from `open_tab` and gives focus back to the main tab
    fn close_tab(&self, tab: Self::Tab) -> Result<(), BrowserError>;
}

pub trait BrowserLauncher {
    type Session: BrowserSession;

    fn launch(&self) -> Result<Self::Session, BrowserError>;
}

/// Runs `refocus` even when `close` fails. The first error wins.
pub(crate) fn close_and_refocus(
    close: impl FnOnce() -> Result<(), BrowserError>,
    refocus: impl FnOnce() -> Result<(), BrowserError>,
) -> Result<(), BrowserError> {
    let closed = close();
    let refocused = refocus();
    closed.and(refocused)
}
