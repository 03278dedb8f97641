//! Stream storage and id allocation.

use std::collections::HashMap;

use meterstream_types::{Amount, AssetId, LedgerError, Result, Stream, StreamId};

/// Owns every stream ever created, live or dormant.
///
/// Ids come from a monotonic counter starting at 1 and are never reused;
/// streams are never deleted.
pub struct StreamRegistry {
    streams: HashMap<StreamId, Stream>,
    next_id: StreamId,
}

impl StreamRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            streams: HashMap::new(),
            next_id: StreamId(1),
        }
    }

    /// Hand out the next stream id. Called only once the operation is
    /// certain to commit, so failed creations leave no gap.
    pub fn allocate_id(&mut self) -> StreamId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Store a newly created stream under its id.
    pub fn insert(&mut self, stream: Stream) {
        self.streams.insert(stream.id, stream);
    }

    /// Look up a stream.
    ///
    /// # Errors
    /// Returns `StreamNotFound` for an unknown id.
    pub fn get(&self, id: StreamId) -> Result<&Stream> {
        self.streams.get(&id).ok_or(LedgerError::StreamNotFound(id))
    }

    /// Look up a stream for mutation.
    ///
    /// # Errors
    /// Returns `StreamNotFound` for an unknown id.
    pub fn get_mut(&mut self, id: StreamId) -> Result<&mut Stream> {
        self.streams
            .get_mut(&id)
            .ok_or(LedgerError::StreamNotFound(id))
    }

    #[must_use]
    pub fn contains(&self, id: StreamId) -> bool {
        self.streams.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Every stream, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Stream> {
        self.streams.values()
    }

    /// Unwithdrawn escrow across all streams of one asset. This is what the
    /// ledger must still be holding for them.
    #[must_use]
    pub fn total_escrow(&self, asset: &AssetId) -> Amount {
        self.streams
            .values()
            .filter(|s| s.asset == *asset)
            .fold(Amount::ZERO, |acc, s| {
                acc.saturating_add(s.remaining_escrow())
            })
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}
