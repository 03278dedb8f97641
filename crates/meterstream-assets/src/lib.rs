//! # meterstream-assets
//!
//! **Asset custody boundary**: how funds actually enter and leave ledger
//! custody.
//!
//! ## Architecture
//!
//! The ledger core never holds balances itself; it drives vaults:
//! 1. **AssetVault**: the trait every custodian implements, with atomic
//!    `move_in` / `move_out` against ledger custody
//! 2. **TokenVault**: ERC-20-style pull payment (balance + approval)
//! 3. **NativeVault**: direct debit for the base asset
//! 4. **VaultRegistry**: per-asset vault lookup
//!
//! ## Funding Flow
//!
//! ```text
//! payer → TokenVault.approve() → StreamLedger.create_stream()
//!       → vault.move_in() → custody ... vault.move_out() → payee
//! ```
//!
//! A failed transfer never leaves a partial balance change.

pub mod native_vault;
pub mod registry;
pub mod token_vault;
pub mod vault;

pub use native_vault::NativeVault;
pub use registry::VaultRegistry;
pub use token_vault::TokenVault;
pub use vault::{AssetVault, TransferError};
