//! Eligibility registry: which assets are redeemable pools.
//!
//! Absent entries are ineligible. Only administration mutates it.

use std::collections::HashMap;

use offset_types::AssetHandle;

/// Mapping from asset to "is a poolable, redeemable asset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibilityRegistry {
    eligible: HashMap<AssetHandle, bool>,
}

impl EligibilityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every asset in `pools` marked eligible.
    #[must_use]
    pub fn with_pools(pools: impl IntoIterator<Item = AssetHandle>) -> Self {
        Self {
            eligible: pools.into_iter().map(|pool| (pool, true)).collect(),
        }
    }

    /// Mark `asset` eligible. Idempotent.
    pub fn set_eligible(&mut self, asset: AssetHandle) {
        self.eligible.insert(asset, true);
    }

    /// Mark `asset` ineligible. Idempotent.
    pub fn clear_eligible(&mut self, asset: AssetHandle) {
        self.eligible.insert(asset, false);
    }

    #[must_use]
    pub fn is_eligible(&self, asset: AssetHandle) -> bool {
        self.eligible.get(&asset).copied().unwrap_or(false)
    }

    /// Currently eligible assets, sorted.
    #[must_use]
    pub fn eligible_assets(&self) -> Vec<AssetHandle> {
        let mut assets: Vec<AssetHandle> = self
            .eligible
            .iter()
            .filter(|(_, eligible)| **eligible)
            .map(|(asset, _)| *asset)
            .collect();
        assets.sort();
        assets
    }
}
