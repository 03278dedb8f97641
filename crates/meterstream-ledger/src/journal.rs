//! Append-only journal of stream mutations.
//!
//! Every successful state change appends exactly one entry. Entries are
//! never rewritten or dropped, and `seq` numbers are dense: entry `n` sits
//! at index `n`.

use meterstream_types::{RecordEntry, RecordKind, StreamId, StreamRecord, Timestamp};

/// The ledger's durable audit trail.
pub struct RecordJournal {
    entries: Vec<RecordEntry>,
}

impl RecordJournal {
    /// Create a new empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a record, stamping it with the next sequence number and the
    /// ledger time `at`. Returns the assigned sequence number.
    pub fn append(&mut self, at: Timestamp, record: StreamRecord) -> u64 {
        let seq = self.entries.len() as u64;
        self.entries.push(RecordEntry::new(seq, at, record));
        seq
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[RecordEntry] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&RecordEntry> {
        self.entries.last()
    }

    /// All entries touching one stream, oldest first.
    pub fn for_stream(&self, stream_id: StreamId) -> impl Iterator<Item = &RecordEntry> {
        self.entries
            .iter()
            .filter(move |e| e.stream_id() == stream_id)
    }

    /// All entries of one kind, oldest first.
    pub fn of_kind(&self, kind: RecordKind) -> impl Iterator<Item = &RecordEntry> {
        self.entries.iter().filter(move |e| e.kind() == kind)
    }
}

impl Default for RecordJournal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halted(id: u64) -> StreamRecord {
        StreamRecord::Halted {
            stream_id: StreamId(id),
        }
    }

    #[test]
    fn sequence_numbers_are_dense() {
        let mut journal = RecordJournal::new();
        for i in 0..5 {
            let seq = journal.append(Timestamp::new(i), halted(i));
            assert_eq!(seq, i);
        }
        for (idx, entry) in journal.entries().iter().enumerate() {
            assert_eq!(entry.seq as usize, idx);
        }
    }

    #[test]
    fn append_stamps_time_and_hash() {
        let mut journal = RecordJournal::new();
        journal.append(Timestamp::new(42), halted(1));
        let entry = journal.last().unwrap();
        assert_eq!(entry.at, Timestamp::new(42));
        assert_eq!(entry.payload_hash, halted(1).payload_hash());
    }

    #[test]
    fn filters_by_stream_and_kind() {
        let mut journal = RecordJournal::new();
        journal.append(Timestamp::new(1), halted(1));
        journal.append(Timestamp::new(2), halted(2));
        journal.append(
            Timestamp::new(3),
            StreamRecord::Withdrawn {
                stream_id: StreamId(1),
                amount: meterstream_types::Amount::new(10),
                payee: meterstream_types::AccountId::NULL,
            },
        );

        assert_eq!(journal.for_stream(StreamId(1)).count(), 2);
        assert_eq!(journal.for_stream(StreamId(2)).count(), 1);
        assert_eq!(journal.of_kind(RecordKind::StreamHalted).count(), 2);
        assert_eq!(journal.of_kind(RecordKind::WithdrawalPaid).count(), 1);
        assert_eq!(journal.of_kind(RecordKind::StreamCreated).count(), 0);
    }

    #[test]
    fn last_tracks_most_recent() {
        let mut journal = RecordJournal::new();
        assert!(journal.last().is_none());
        journal.append(Timestamp::new(1), halted(1));
        journal.append(Timestamp::new(2), halted(2));
        assert_eq!(journal.last().map(|e| e.seq), Some(1));
        assert_eq!(journal.len(), 2);
    }
}
