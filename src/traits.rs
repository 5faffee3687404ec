//! Traits at the seams between parsed tags and the records they fill

use crate::config::ParserOptions;
use crate::tags::TagResult;
use crate::types::*;

/// A record that parsed tags can be applied to
///
/// The assembler offers every tag to its candidate targets in priority
/// order, the open transaction first and the statement envelope second. The
/// first target returning `Ok(true)` takes the tag.
pub trait TagTarget {
    /// Apply a parsed tag
    ///
    /// Returns `Ok(false)` when the tag does not belong to this target, and
    /// an error when it does but its values cannot be converted.
    fn apply_tag(&mut self, tag: &TagResult, options: &ParserOptions) -> Mt940Result<bool>;
}

/// Offer a tag to each target in turn until one takes it
pub fn apply_to_first(
    targets: &mut [&mut dyn TagTarget],
    tag: &TagResult,
    options: &ParserOptions,
) -> Mt940Result<()> {
    for target in targets.iter_mut() {
        if target.apply_tag(tag, options)? {
            return Ok(());
        }
    }

    Err(Mt940Error::TagDoesNotApply {
        tag_id: tag.tag_id().to_string(),
    })
}
