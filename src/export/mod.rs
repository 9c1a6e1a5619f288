//! Output archive production.
//!
//! Chooses between handing the caller's bytes straight back and rebuilding
//! the archive. Only members in the change set are re-encoded; everything
//! else is passed through byte-identical.

pub(crate) mod zip_patcher;

use std::borrow::Cow;

use crate::error::Result;
use crate::types::ChangeSet;

/// Produce the output archive for `original_bytes` and its change set.
///
/// An empty change set returns the input itself, borrowed, so the no-op
/// result cannot drift from the input by even one byte.
pub(crate) fn save_archive<'a>(
    original_bytes: &'a [u8],
    changes: &ChangeSet,
) -> Result<Cow<'a, [u8]>> {
    if changes.is_empty() {
        return Ok(Cow::Borrowed(original_bytes));
    }

    zip_patcher::rewrite_archive(original_bytes, changes).map(Cow::Owned)
}
