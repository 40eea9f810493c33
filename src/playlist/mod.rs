//! Turning a playlist page into a list of links to download

pub mod extractor;
pub mod prober;
