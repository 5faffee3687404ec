//! Splitting of statement text into tag blocks

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::tags::catalog;
use crate::types::*;

/// Tag whose free-text payload may contain lines resembling markers
pub const FREE_TEXT_TAG: &str = "86";

static MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^:\n?(?P<full_tag>(?:[0-9]{2}|NS)[A-Z]?):").expect("marker pattern is valid")
});

/// One tag occurrence: its id and the raw block, marker included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagBlock<'a> {
    pub tag_id: &'a str,
    pub raw: &'a str,
}

#[derive(Debug, Clone, Copy)]
struct Marker<'a> {
    start: usize,
    tag_id: &'a str,
}

fn resolves_to_free_text(tag_id: &str) -> bool {
    catalog::lookup(tag_id).is_some_and(|tag| tag.id == FREE_TEXT_TAG)
}

fn line_at(text: &str, start: usize) -> &str {
    let rest = &text[start..];
    // the marker itself may be wrapped after its first colon
    let skip = if rest.starts_with(":\n") { 2 } else { 0 };
    match rest[skip..].find('\n') {
        Some(end) => &rest[..skip + end],
        None => rest,
    }
}

/// Drop marker candidates that belong to a free-text payload
///
/// Once a free-text tag is accepted, following candidates are folded into
/// it until one resolves to a known tag id. Outside free text an unknown id
/// is an error.
fn sanitize<'a>(text: &'a str, candidates: Vec<Marker<'a>>) -> Mt940Result<Vec<Marker<'a>>> {
    let mut accepted: Vec<Marker<'a>> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let in_free_text = accepted
            .last()
            .is_some_and(|previous| resolves_to_free_text(previous.tag_id));

        if catalog::is_known(candidate.tag_id) {
            accepted.push(candidate);
        } else if in_free_text {
            debug!(
                "folding {:?} into the preceding :{}: block",
                line_at(text, candidate.start),
                FREE_TEXT_TAG
            );
        } else {
            return Err(Mt940Error::UnknownTag {
                tag_id: candidate.tag_id.to_string(),
                raw: line_at(text, candidate.start).to_string(),
            });
        }
    }

    Ok(accepted)
}

/// Split statement text into ordered tag blocks
pub fn tokenize(text: &str) -> Mt940Result<Vec<TagBlock<'_>>> {
    let candidates: Vec<Marker<'_>> = MARKERS
        .captures_iter(text)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let tag_id = caps.name("full_tag")?.as_str();
            Some(Marker { start, tag_id })
        })
        .collect();

    if candidates.is_empty() {
        return Err(Mt940Error::NoTagsFound);
    }

    if let Some(first) = candidates.first() {
        let leading = &text[..first.start];
        if leading.lines().map(str::trim).any(|line| !line.is_empty() && line != "-") {
            return Err(Mt940Error::MalformedTag {
                tag_id: String::new(),
                raw: leading.trim().to_string(),
            });
        }
    }

    let markers = sanitize(text, candidates)?;

    let blocks: Vec<TagBlock<'_>> = markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers.get(i + 1).map_or(text.len(), |next| next.start);
            TagBlock {
                tag_id: marker.tag_id,
                raw: text[marker.start..end].trim_end(),
            }
        })
        .collect();

    for block in &blocks {
        trace!("tag {}: {:?}", block.tag_id, block.raw);
    }
    debug!("tokenized statement into {} tag blocks", blocks.len());

    Ok(blocks)
}
