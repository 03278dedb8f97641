//! Asset identification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The asset a stream pays out in.
///
/// `Native` is the ledger's base asset; `Token` names any other asset by
/// symbol. Each asset is custodied by its own vault.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    Native,
    Token(String),
}

impl AssetId {
    #[must_use]
    pub fn token(symbol: impl Into<String>) -> Self {
        Self::Token(symbol.into())
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token(sym) => write!(f, "tok:{sym}"),
        }
    }
}
