use std::fmt::Display;

use url::Url;

/// Represents the canonical video id.
///
/// The id is the value of the `v` query parameter of a watch link,
/// and is what the already-downloaded file is named after.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Extracts the id from a watch link, `None` if the link has no usable `v` parameter
    pub fn from_link(link: &str) -> Option<Self> {
        let url = Url::parse(link).ok()?;
        url.query_pairs()
            .find(|(key, value)| key == "v" && !value.is_empty())
            .map(|(_, value)| Self(value.into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
