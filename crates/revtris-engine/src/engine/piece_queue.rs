use arrayvec::ArrayVec;

use crate::PieceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece queue is full")]
pub struct QueueSaturatedError;

/// Bounded FIFO of piece requests waiting for the engine to become idle.
///
/// Requests beyond [`PieceQueue::CAPACITY`] are rejected; the caller decides
/// whether that is worth reporting (the session simply drops them).
///
/// # Example
///
/// ```
/// use revtris_engine::{PieceKind, PieceQueue};
///
/// let mut queue = PieceQueue::new();
/// queue.try_push(PieceKind::T).unwrap();
/// queue.try_push(PieceKind::O).unwrap();
///
/// assert_eq!(queue.pop_front(), Some(PieceKind::T));
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceQueue {
    pieces: ArrayVec<PieceKind, { PieceQueue::CAPACITY }>,
}

impl PieceQueue {
    pub const CAPACITY: usize = 5;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.pieces.is_full()
    }

    /// Appends a request at the back of the queue.
    pub fn try_push(&mut self, kind: PieceKind) -> Result<(), QueueSaturatedError> {
        self.pieces.try_push(kind).map_err(|_| QueueSaturatedError)
    }

    /// Removes the oldest request.
    pub fn pop_front(&mut self) -> Option<PieceKind> {
        self.pieces.pop_at(0)
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    /// Returns an iterator over the queued requests, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pieces.iter().copied()
    }
}
