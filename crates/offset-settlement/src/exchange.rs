//! Exchange adapter: forwards opaque swap instructions.
//!
//! The exchange address is fixed at construction. Failures come back as
//! the exchange reported them: a diagnostic payload is surfaced byte for
//! byte in `OffsetError::ExternalRevert`, a nested error unchanged, and
//! only a reason-less failure becomes the generic `OffsetError::CallFailed`.

use offset_host::Host;
use offset_types::{Address, Result, SwapInstruction};

/// Call-forwarder bound to one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeAdapter {
    exchange: Address,
}

impl ExchangeAdapter {
    #[must_use]
    pub fn new(exchange: Address) -> Self {
        Self { exchange }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.exchange
    }

    /// Forward `instruction` to the exchange on behalf of `caller`.
    pub fn fill_instruction(
        &self,
        host: &mut Host,
        caller: Address,
        instruction: &SwapInstruction,
    ) -> Result<()> {
        let exchange = host.exchange(self.exchange)?;
        tracing::debug!(
            exchange = %self.exchange,
            instruction_len = instruction.len(),
            "Forwarding swap instruction"
        );
        exchange
            .fill(host, caller, instruction)
            .map_err(|failure| failure.into_error(self.exchange))
    }
}
