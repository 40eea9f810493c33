//! In-memory browser for tests

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
    time::Duration,
};

use crate::browser::{
    BrowserError, BrowserLauncher, BrowserSession, BrowserTab, ElementQuery, ScrapedElement,
    close_and_refocus,
};

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub markup: String,
    /// selectors `wait_for` succeeds on
    pub present: HashSet<String>,
    /// elements returned by `read_elements`, keyed by selector
    pub elements: HashMap<String, Vec<ScrapedElement>>,
}

impl FakePage {
    pub fn with_selector(mut self, selector: &str) -> Self {
        self.present.insert(selector.to_string());
        self
    }

    pub fn with_markup(mut self, markup: &str) -> Self {
        self.markup = markup.to_string();
        self
    }

    pub fn with_elements(mut self, selector: &str, elements: Vec<ScrapedElement>) -> Self {
        self.present.insert(selector.to_string());
        self.elements.insert(selector.to_string(), elements);
        self
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub pages: HashMap<String, FakePage>,
    pub fail_launch: bool,
    pub fail_close: bool,
    pub launches: usize,
    pub sessions_dropped: usize,
    pub opened_tabs: usize,
    pub closed_tabs: usize,
    pub refocused: usize,
    pub visited: Vec<String>,
}

/// Cloning shares the state, so a test keeps a handle to inspect it afterwards
#[derive(Debug, Clone, Default)]
pub struct FakeBrowser {
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&self, url: &str, page: FakePage) {
        self.state.borrow_mut().pages.insert(url.to_string(), page);
    }

    pub fn fail_launch(&self) {
        self.state.borrow_mut().fail_launch = true;
    }

    pub fn fail_close(&self) {
        self.state.borrow_mut().fail_close = true;
    }

    pub fn refocused(&self) -> usize {
        self.state.borrow().refocused
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.borrow().visited.clone()
    }

    pub fn opened_tabs(&self) -> usize {
        self.state.borrow().opened_tabs
    }

    pub fn closed_tabs(&self) -> usize {
        self.state.borrow().closed_tabs
    }

    pub fn sessions_dropped(&self) -> usize {
        self.state.borrow().sessions_dropped
    }

    pub fn session(&self) -> FakeSession {
        FakeSession {
            main: self.tab(),
            state: self.state.clone(),
        }
    }

    fn tab(&self) -> FakeTab {
        FakeTab {
            state: self.state.clone(),
            url: RefCell::new("about:blank".to_string()),
        }
    }
}

impl BrowserLauncher for FakeBrowser {
    type Session = FakeSession;

    fn launch(&self) -> Result<FakeSession, BrowserError> {
        if self.state.borrow().fail_launch {
            return Err(BrowserError::Launch("no browser installed".to_string()));
        }
        self.state.borrow_mut().launches += 1;
        Ok(self.session())
    }
}

pub struct FakeSession {
    main: FakeTab,
    state: Rc<RefCell<FakeState>>,
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.state.borrow_mut().sessions_dropped += 1;
    }
}

impl BrowserSession for FakeSession {
    type Tab = FakeTab;

    fn main_tab(&self) -> &FakeTab {
        &self.main
    }

    fn open_tab(&self) -> Result<FakeTab, BrowserError> {
        self.state.borrow_mut().opened_tabs += 1;
        Ok(FakeTab {
            state: self.state.clone(),
            url: RefCell::new("about:blank".to_string()),
        })
    }

    fn close_tab(&self, _tab: FakeTab) -> Result<(), BrowserError> {
        close_and_refocus(
            || {
                let mut state = self.state.borrow_mut();
                if state.fail_close {
                    return Err(BrowserError::Tab("target closed unexpectedly".to_string()));
                }
                state.closed_tabs += 1;
                Ok(())
            },
            || {
                self.state.borrow_mut().refocused += 1;
                Ok(())
            },
        )
    }
}

pub struct FakeTab {
    state: Rc<RefCell<FakeState>>,
    url: RefCell<String>,
}

impl FakeTab {
    fn page(&self) -> Option<FakePage> {
        self.state.borrow().pages.get(&*self.url.borrow()).cloned()
    }
}

impl BrowserTab for FakeTab {
    fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.state.borrow_mut().visited.push(url.to_string());
        if !self.state.borrow().pages.contains_key(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        *self.url.borrow_mut() = url.to_string();
        Ok(())
    }

    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        match self.page() {
            Some(page) if page.present.contains(selector) => Ok(()),
            _ => Err(BrowserError::Wait {
                selector: selector.to_string(),
                timeout,
                message: "timed out".to_string(),
            }),
        }
    }

    fn read_elements(&self, query: &ElementQuery<'_>) -> Result<Vec<ScrapedElement>, BrowserError> {
        Ok(self
            .page()
            .and_then(|page| page.elements.get(query.selector).cloned())
            .unwrap_or_default())
    }

    fn markup(&self) -> Result<String, BrowserError> {
        self.page()
            .map(|page| page.markup)
            .ok_or_else(|| BrowserError::Element("no page loaded".to_string()))
    }

    fn current_url(&self) -> String {
        self.url.borrow().clone()
    }
}
