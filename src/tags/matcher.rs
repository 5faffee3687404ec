//! Matching of raw tag blocks against the catalog patterns

use log::trace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

use crate::tags::catalog::{self, Tag};
use crate::types::*;

/// Marker at the start of a tag block, e.g. `:60F:`
static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:\n?(?P<full_tag>(?:[0-9]{2}|NS)[A-Z]?):").expect("marker pattern is valid")
});

/// Named fields captured from one tag occurrence
#[derive(Debug, Clone)]
pub struct TagResult {
    tag_id: String,
    tag: &'static Tag,
    fields: BTreeMap<String, String>,
    records: Vec<BTreeMap<String, String>>,
}

impl TagResult {
    /// Tag id as found in the statement, e.g. `60F`
    pub fn tag_id(&self) -> &str {
        &self.tag_id
    }

    /// Catalog entry the id resolved to
    pub fn tag(&self) -> &'static Tag {
        self.tag
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Captured text of a group declared by the tag's pattern
    ///
    /// Declared groups are always present; a group that did not take part in
    /// the match reads as the empty string.
    pub fn field(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Captured text of a group, `None` when it is empty
    pub fn optional(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Sub-records of tags declaring a sub-pattern, one per matching line
    pub fn records(&self) -> &[BTreeMap<String, String>] {
        &self.records
    }
}

fn named_groups(pattern: &Regex, caps: &Captures<'_>) -> BTreeMap<String, String> {
    pattern
        .capture_names()
        .flatten()
        .map(|name| {
            let value = caps.name(name).map_or("", |m| m.as_str());
            (name.to_string(), value.to_string())
        })
        .collect()
}

impl Tag {
    /// Match a marker-stripped payload against the tag's pattern
    pub fn parse(&'static self, tag_id: &str, payload: &str) -> Option<TagResult> {
        let caps = self.pattern().captures(payload)?;
        let fields = named_groups(self.pattern(), &caps);

        let records = match self.sub_pattern() {
            Some(sub_pattern) => payload
                .lines()
                .filter_map(|line| {
                    let record = sub_pattern.captures(line).map(|c| named_groups(sub_pattern, &c));
                    if record.is_none() {
                        trace!("tag {}: line {:?} is not a sub-record", tag_id, line);
                    }
                    record
                })
                .collect(),
            None => Vec::new(),
        };

        Some(TagResult {
            tag_id: tag_id.to_string(),
            tag: self,
            fields,
            records,
        })
    }
}

/// Split a tag block into the id named by its marker and the remaining text
pub fn split_marker(raw: &str) -> Option<(&str, &str)> {
    let caps = MARKER.captures(raw)?;
    let full_tag = caps.name("full_tag")?.as_str();
    let end = caps.get(0)?.end();
    Some((full_tag, &raw[end..]))
}

/// Match one raw tag block, marker included, against the catalog
pub fn match_tag(tag_id: &str, raw: &str) -> Mt940Result<TagResult> {
    let (marker_id, payload) = split_marker(raw)
        .filter(|(marker_id, _)| *marker_id == tag_id)
        .ok_or_else(|| Mt940Error::MalformedTag {
            tag_id: tag_id.to_string(),
            raw: raw.to_string(),
        })?;

    let tag = catalog::lookup(marker_id).ok_or_else(|| Mt940Error::UnknownTag {
        tag_id: tag_id.to_string(),
        raw: raw.to_string(),
    })?;

    let payload = payload.trim();
    tag.parse(marker_id, payload)
        .ok_or_else(|| Mt940Error::TagDidNotMatch {
            tag_id: tag_id.to_string(),
            raw: payload.to_string(),
        })
}
