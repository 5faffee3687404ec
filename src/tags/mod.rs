//! Tag catalog and pattern matching

pub mod catalog;
pub mod matcher;

pub use catalog::Tag;
pub use matcher::{match_tag, split_marker, TagResult};
