//! Splits an ordered comment list into bounded analysis batches.

use sentinel_core::Comment;

/// One batch of comments destined for a single analysis call.
///
/// Holds only the comments with non-empty trimmed text, in input order.
#[derive(Debug)]
pub(crate) struct Chunk<'a> {
    /// 1-based position among yielded chunks, for progress labels.
    pub(crate) index: usize,
    pub(crate) comments: Vec<&'a Comment>,
}

impl Chunk<'_> {
    /// Number of comments actually sent in this chunk — the weight this
    /// chunk carries in the aggregate's average-score divisor.
    pub(crate) fn eligible(&self) -> usize {
        self.comments.len()
    }
}

/// Lazily yield chunks of up to `chunk_size` comments, skipping comments
/// whose trimmed text is empty. Windows containing no eligible comments are
/// not yielded at all. Single pass, not restartable.
pub(crate) fn chunks(comments: &[Comment], chunk_size: usize) -> impl Iterator<Item = Chunk<'_>> {
    assert!(chunk_size > 0, "chunk_size must be at least 1");
    let mut yielded = 0usize;
    comments.chunks(chunk_size).filter_map(move |window| {
        let eligible: Vec<&Comment> = window
            .iter()
            .filter(|c| !c.text.trim().is_empty())
            .collect();
        if eligible.is_empty() {
            return None;
        }
        yielded += 1;
        Some(Chunk {
            index: yielded,
            comments: eligible,
        })
    })
}
