//! Configuration for an offset helper instance.

use serde::{Deserialize, Serialize};

use crate::{Address, AssetHandle, OffsetError, Result, constants};

fn default_helper() -> Address {
    Address::derive(constants::DEFAULT_HELPER_LABEL)
}

/// Construction-time configuration of a settlement helper.
///
/// The exchange address is fixed for the life of the helper. The
/// eligibility list only seeds the registry, which the owner can edit later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperConfig {
    /// Custody account the helper holds balances under.
    #[serde(default = "default_helper")]
    pub helper: Address,
    /// Initial administrative owner.
    pub owner: Address,
    /// Exchange every swap instruction is forwarded to.
    pub exchange: Address,
    /// Pool assets registered as redeemable at start-up.
    #[serde(default)]
    pub eligible_pools: Vec<AssetHandle>,
}

impl HelperConfig {
    /// Config with the default helper address and no eligible pools.
    #[must_use]
    pub fn new(owner: Address, exchange: Address) -> Self {
        Self {
            helper: default_helper(),
            owner,
            exchange,
            eligible_pools: Vec::new(),
        }
    }

    /// Add a pool to the start-up eligibility list.
    #[must_use]
    pub fn with_eligible_pool(mut self, pool: AssetHandle) -> Self {
        self.eligible_pools.push(pool);
        self
    }

    /// Override the custody address.
    #[must_use]
    pub fn with_helper(mut self, helper: Address) -> Self {
        self.helper = helper;
        self
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configs with unusable addresses.
    pub fn validate(&self) -> Result<()> {
        for (what, addr) in [
            ("helper", self.helper),
            ("owner", self.owner),
            ("exchange", self.exchange),
        ] {
            if addr.is_zero() {
                return Err(OffsetError::Configuration(format!(
                    "{what} address must not be zero"
                )));
            }
        }
        if self.eligible_pools.iter().any(AssetHandle::is_native) {
            return Err(OffsetError::Configuration(
                "the native asset cannot be an eligible pool".to_string(),
            ));
        }
        Ok(())
    }
}
