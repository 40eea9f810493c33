//! Everything this program persists: the outcome logs and the downloaded files

pub mod error;
pub mod fs;
pub mod ledger;
