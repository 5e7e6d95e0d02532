//! Circular index arithmetic shared by every carousel.
//!
//! A cursor is `Option<usize>`: `None` is the sentinel for an empty collection,
//! so callers never divide by zero and never hold an index into nothing.

/// Moves `current` by `delta` steps around a ring of `len` slots.
///
/// `delta` may be of any sign or magnitude. Returns `None` when `len == 0`.
pub fn advance(current: usize, delta: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as i128;
    let next = (current as i128 + delta as i128).rem_euclid(len);
    Some(next as usize)
}

/// Wraps an externally supplied index into `[0, len)`.
///
/// Persisted or user-entered values may be negative or past the end; they
/// are normalized with the same rule as [`advance`] instead of faulting.
pub fn jump_to(target: i64, len: usize) -> Option<usize> {
    advance(0, target, len)
}

pub fn next(current: usize, len: usize) -> Option<usize> {
    advance(current, 1, len)
}

pub fn previous(current: usize, len: usize) -> Option<usize> {
    advance(current, -1, len)
}
