/// One playlist entry as scraped from the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub title: String,
    pub link: String,
}

impl TrackRecord {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}
