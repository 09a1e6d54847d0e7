//! Opaque exchange instruction payload.

use serde::{Deserialize, Serialize};

/// Caller-supplied bytes interpreted only by the exchange.
///
/// The helper never inspects or rewrites these bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapInstruction(pub Vec<u8>);

impl SwapInstruction {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// An empty instruction, used when no swap is expected.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SwapInstruction {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}
