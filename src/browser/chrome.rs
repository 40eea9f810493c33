//! Headless Chromium backend

use std::{sync::Arc, time::Duration};

use headless_chrome::{Browser, LaunchOptions, Tab};
use log::debug;

use crate::{
    browser::{
        BrowserError, BrowserLauncher, BrowserSession, BrowserTab, ElementQuery, ScrapedElement,
        close_and_refocus,
    },
    config::BrowserConfig,
};

pub struct ChromeLauncher {
    config: BrowserConfig,
}

impl ChromeLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

impl BrowserLauncher for ChromeLauncher {
    type Session = ChromeSession;

    fn launch(&self) -> Result<ChromeSession, BrowserError> {
        let options = LaunchOptions::default_builder()
            .headless(self.config.headless)
            .path(self.config.chrome_path.clone())
            .build()
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let browser = Browser::new(options).map_err(|e| BrowserError::Launch(e.to_string()))?;
        let main = browser
            .new_tab()
            .map_err(|e| BrowserError::Tab(e.to_string()))?;
        debug!("browser launched, headless = {}", self.config.headless);

        Ok(ChromeSession {
            main: ChromeTab(main),
            browser,
        })
    }
}

/// Browser process plus its main tab. The process is killed when this is dropped.
pub struct ChromeSession {
    main: ChromeTab,
    browser: Browser,
}

impl BrowserSession for ChromeSession {
    type Tab = ChromeTab;

    fn main_tab(&self) -> &ChromeTab {
        &self.main
    }

    fn open_tab(&self) -> Result<ChromeTab, BrowserError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| BrowserError::Tab(e.to_string()))?;
        tab.activate().map_err(|e| BrowserError::Tab(e.to_string()))?;
        Ok(ChromeTab(tab))
    }

    fn close_tab(&self, tab: ChromeTab) -> Result<(), BrowserError> {
        close_and_refocus(
            || {
                tab.0
                    .close(true)
                    .map(|_| ())
                    .map_err(|e| BrowserError::Tab(e.to_string()))
            },
            || {
                self.main
                    .0
                    .activate()
                    .map(|_| ())
                    .map_err(|e| BrowserError::Tab(e.to_string()))
            },
        )
    }
}

pub struct ChromeTab(Arc<Tab>);

impl BrowserTab for ChromeTab {
    fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        let nav_err = |e: anyhow::Error| BrowserError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        };
        self.0.navigate_to(url).map_err(nav_err)?;
        self.0.wait_until_navigated().map_err(nav_err)?;
        Ok(())
    }

    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        self.0
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(|e| BrowserError::Wait {
                selector: selector.to_string(),
                timeout,
                message: e.to_string(),
            })
    }

    fn read_elements(&self, query: &ElementQuery<'_>) -> Result<Vec<ScrapedElement>, BrowserError> {
        let elements = self
            .0
            .find_elements(query.selector)
            .map_err(|e| BrowserError::Element(e.to_string()))?;

        elements
            .iter()
            .map(|element| {
                let attribute = element
                    .get_attribute_value(query.attribute)
                    .map_err(|e| BrowserError::Element(e.to_string()))?;
                let child_text = element
                    .find_element(query.child_selector)
                    .and_then(|child| child.get_inner_text())
                    .ok();
                Ok(ScrapedElement {
                    attribute,
                    child_text,
                })
            })
            .collect()
    }

    fn markup(&self) -> Result<String, BrowserError> {
        self.0
            .get_content()
            .map_err(|e| BrowserError::Element(e.to_string()))
    }

    fn current_url(&self) -> String {
        self.0.get_url()
    }
}
