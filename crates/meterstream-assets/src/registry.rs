//! Per-asset vault lookup.

use std::collections::HashMap;

use meterstream_types::AssetId;

use crate::vault::AssetVault;

/// Maps each asset to the vault that custodies it.
///
/// The ledger consults the registry on every transfer; an asset with no
/// registered vault cannot fund streams.
pub struct VaultRegistry {
    vaults: HashMap<AssetId, Box<dyn AssetVault>>,
}

impl VaultRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vaults: HashMap::new(),
        }
    }

    /// Register `vault` as the custodian for `asset`, replacing any
    /// previous one.
    pub fn register(&mut self, asset: AssetId, vault: impl AssetVault + 'static) {
        self.vaults.insert(asset, Box::new(vault));
    }

    #[must_use]
    pub fn get(&self, asset: &AssetId) -> Option<&dyn AssetVault> {
        self.vaults.get(asset).map(Box::as_ref)
    }

    pub fn get_mut(&mut self, asset: &AssetId) -> Option<&mut dyn AssetVault> {
        match self.vaults.get_mut(asset) {
            Some(vault) => Some(vault.as_mut()),
            None => None,
        }
    }

    #[must_use]
    pub fn contains(&self, asset: &AssetId) -> bool {
        self.vaults.contains_key(asset)
    }

    /// Every asset with a registered vault.
    pub fn assets(&self) -> impl Iterator<Item = &AssetId> {
        self.vaults.keys()
    }
}

impl Default for VaultRegistry {
    fn default() -> Self {
        Self::new()
    }
}
