//! Offset-based chunking of an already-materialized result set.

/// One page of a result set plus the bookkeeping for the next call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<T> {
    pub records: Vec<T>,
    pub next_offset: usize,
    pub has_more: bool,
}

/// Cuts `results[offset..offset + page_size]` out of the result set.
///
/// Stateless: the offset lives with the caller, so repeated calls over an
/// unchanged result set are idempotent. An offset at or beyond the end
/// yields an empty chunk with `has_more = false`; callers must treat an
/// empty chunk as the end and must not advance their offset past it.
pub fn next_chunk<T: Clone>(results: &[T], offset: usize, page_size: usize) -> Chunk<T> {
    let end = results.len().min(offset.saturating_add(page_size));
    let records: Vec<T> = results.get(offset..end).unwrap_or(&[]).to_vec();
    let next_offset = offset + records.len();

    Chunk {
        has_more: next_offset < results.len(),
        next_offset,
        records,
    }
}
