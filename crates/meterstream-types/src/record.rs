//! Journal record types for the MeterStream audit trail.
//!
//! Every successful mutation (create, top-up, withdraw, halt, terminate)
//! produces one [`RecordEntry`] in the append-only journal. Entries carry a
//! SHA-256 hash over a canonical byte encoding of the record so downstream
//! consumers can verify them independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, Amount, AssetId, RecordId, StreamId, Timestamp};

/// The kind of mutation a record proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// A stream was opened and its deposit escrowed.
    StreamCreated,
    /// An existing stream's deposit and runway grew.
    StreamToppedUp,
    /// Accrued funds were paid out to the payee.
    WithdrawalPaid,
    /// The Halting Authority froze further funding.
    StreamHalted,
    /// The payer ended the stream early and reclaimed unvested funds.
    StreamTerminated,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StreamCreated => write!(f, "STREAM_CREATED"),
            Self::StreamToppedUp => write!(f, "STREAM_TOPPED_UP"),
            Self::WithdrawalPaid => write!(f, "WITHDRAWAL_PAID"),
            Self::StreamHalted => write!(f, "STREAM_HALTED"),
            Self::StreamTerminated => write!(f, "STREAM_TERMINATED"),
        }
    }
}

/// The payload of a journal entry: which stream changed and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamRecord {
    Created {
        stream_id: StreamId,
        payer: AccountId,
        payee: AccountId,
        asset: AssetId,
        deposit: Amount,
        rate_per_second: Amount,
        start_time: Timestamp,
        stop_time: Timestamp,
    },
    ToppedUp {
        stream_id: StreamId,
        added: Amount,
        new_stop_time: Timestamp,
    },
    Withdrawn {
        stream_id: StreamId,
        amount: Amount,
        payee: AccountId,
    },
    Halted {
        stream_id: StreamId,
    },
    Terminated {
        stream_id: StreamId,
        refund: Amount,
        stop_time: Timestamp,
    },
}

impl StreamRecord {
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Created { .. } => RecordKind::StreamCreated,
            Self::ToppedUp { .. } => RecordKind::StreamToppedUp,
            Self::Withdrawn { .. } => RecordKind::WithdrawalPaid,
            Self::Halted { .. } => RecordKind::StreamHalted,
            Self::Terminated { .. } => RecordKind::StreamTerminated,
        }
    }

    #[must_use]
    pub fn stream_id(&self) -> StreamId {
        match self {
            Self::Created { stream_id, .. }
            | Self::ToppedUp { stream_id, .. }
            | Self::Withdrawn { stream_id, .. }
            | Self::Halted { stream_id }
            | Self::Terminated { stream_id, .. } => *stream_id,
        }
    }

    /// SHA-256 over a canonical byte encoding of every field.
    ///
    /// Fixed-width little-endian integers and length-prefixed strings keep
    /// the encoding unambiguous across versions.
    #[must_use]
    pub fn payload_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"meterstream:record:v1:");
        hasher.update(self.kind().to_string().as_bytes());
        match self {
            Self::Created {
                stream_id,
                payer,
                payee,
                asset,
                deposit,
                rate_per_second,
                start_time,
                stop_time,
            } => {
                hasher.update(stream_id.0.to_le_bytes());
                hasher.update(payer.as_bytes());
                hasher.update(payee.as_bytes());
                hash_asset(&mut hasher, asset);
                hasher.update(deposit.raw().to_le_bytes());
                hasher.update(rate_per_second.raw().to_le_bytes());
                hasher.update(start_time.as_secs().to_le_bytes());
                hasher.update(stop_time.as_secs().to_le_bytes());
            }
            Self::ToppedUp {
                stream_id,
                added,
                new_stop_time,
            } => {
                hasher.update(stream_id.0.to_le_bytes());
                hasher.update(added.raw().to_le_bytes());
                hasher.update(new_stop_time.as_secs().to_le_bytes());
            }
            Self::Withdrawn {
                stream_id,
                amount,
                payee,
            } => {
                hasher.update(stream_id.0.to_le_bytes());
                hasher.update(amount.raw().to_le_bytes());
                hasher.update(payee.as_bytes());
            }
            Self::Halted { stream_id } => {
                hasher.update(stream_id.0.to_le_bytes());
            }
            Self::Terminated {
                stream_id,
                refund,
                stop_time,
            } => {
                hasher.update(stream_id.0.to_le_bytes());
                hasher.update(refund.raw().to_le_bytes());
                hasher.update(stop_time.as_secs().to_le_bytes());
            }
        }
        hasher.finalize().into()
    }
}

fn hash_asset(hasher: &mut Sha256, asset: &AssetId) {
    match asset {
        AssetId::Native => hasher.update([0u8]),
        AssetId::Token(sym) => {
            hasher.update([1u8]);
            hasher.update((sym.len() as u64).to_le_bytes());
            hasher.update(sym.as_bytes());
        }
    }
}

/// One entry in the append-only record journal.
///
/// `at` is the ledger time the operation ran at (the caller-supplied clock);
/// `issued_at` is wall time, kept for observability only and never used in
/// accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Unique, time-ordered identity of this entry.
    pub id: RecordId,
    /// Dense journal position, starting at 0 with no gaps.
    pub seq: u64,
    /// Ledger time of the mutation.
    pub at: Timestamp,
    /// Wall time the entry was written.
    pub issued_at: DateTime<Utc>,
    /// The mutation itself.
    pub record: StreamRecord,
    /// SHA-256 of the record's canonical encoding.
    pub payload_hash: [u8; 32],
}

impl RecordEntry {
    #[must_use]
    pub fn new(seq: u64, at: Timestamp, record: StreamRecord) -> Self {
        let payload_hash = record.payload_hash();
        Self {
            id: RecordId::new(),
            seq,
            at,
            issued_at: Utc::now(),
            record,
            payload_hash,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.record.kind()
    }

    #[must_use]
    pub fn stream_id(&self) -> StreamId {
        self.record.stream_id()
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
    fn kind_display() {
        assert_eq!(format!("{}", RecordKind::StreamCreated), "STREAM_CREATED");
        assert_eq!(format!("{}", RecordKind::WithdrawalPaid), "WITHDRAWAL_PAID");
        assert_eq!(
            format!("{}", RecordKind::StreamTerminated),
            "STREAM_TERMINATED"
        );
    }

    #[test]
    fn payload_hash_is_deterministic() {
        assert_eq!(halted(7).payload_hash(), halted(7).payload_hash());
    }

    #[test]
    fn payload_hash_covers_every_field() {
        let base = StreamRecord::Withdrawn {
            stream_id: StreamId(1),
            amount: Amount::new(50),
            payee: AccountId::NULL,
        };
        let other_amount = StreamRecord::Withdrawn {
            stream_id: StreamId(1),
            amount: Amount::new(51),
            payee: AccountId::NULL,
        };
        let other_stream = StreamRecord::Withdrawn {
            stream_id: StreamId(2),
            amount: Amount::new(50),
            payee: AccountId::NULL,
        };
        assert_ne!(base.payload_hash(), other_amount.payload_hash());
        assert_ne!(base.payload_hash(), other_stream.payload_hash());
        assert_ne!(base.payload_hash(), halted(1).payload_hash());
    }

    #[test]
    fn asset_encoding_distinguishes_native_from_token() {
        let native = StreamRecord::Created {
            stream_id: StreamId(1),
            payer: AccountId::NULL,
            payee: AccountId::NULL,
            asset: AssetId::Native,
            deposit: Amount::new(100),
            rate_per_second: Amount::new(1),
            start_time: Timestamp::new(0),
            stop_time: Timestamp::new(100),
        };
        let mut token = native.clone();
        if let StreamRecord::Created { asset, .. } = &mut token {
            *asset = AssetId::token("USDB");
        }
        assert_ne!(native.payload_hash(), token.payload_hash());
    }

    #[test]
    fn entry_carries_hash_and_accessors() {
        let entry = RecordEntry::new(3, Timestamp::new(90), halted(12));
        assert_eq!(entry.seq, 3);
        assert_eq!(entry.at, Timestamp::new(90));
        assert_eq!(entry.kind(), RecordKind::StreamHalted);
        assert_eq!(entry.stream_id(), StreamId(12));
        assert_eq!(entry.payload_hash, entry.record.payload_hash());
    }

    #[test]
    fn entry_serde_roundtrip() {
        let entry = RecordEntry::new(0, Timestamp::new(5), halted(1));
        let json = serde_json::to_string(&entry).unwrap();
        let back: RecordEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seq, entry.seq);
        assert_eq!(back.payload_hash, entry.payload_hash);
        assert_eq!(back.record, entry.record);
    }
}
