//! # offset-settlement
//!
//! **Settlement plane**: turns an arbitrary input asset into retired
//! environmental credits in one atomic unit.
//!
//! ## Architecture
//!
//! [`OffsetHelper`] receives an [`offset_types::OffsetRequest`] and:
//! 1. Pulls the input ceiling into custody
//! 2. Authorizes the exchange over custody ([`allowance`])
//! 3. Swaps into the pooled asset ([`exchange`]) unless the input is one
//! 4. Redeems the pooled asset into credit units ([`redemption`])
//! 5. Refunds unspent input
//! 6. Retires every unit under the caller's certificate ([`retirement`])
//!
//! Steps run inside one host transaction and under one
//! [`ReentrancyGuard`]. Owner-only administration lives in [`admin`];
//! the redeemable pool set lives in [`registry`].

pub mod admin;
pub mod allowance;
pub mod exchange;
pub mod guard;
pub mod helper;
pub mod redemption;
pub mod registry;
pub mod retirement;

pub use admin::Ownership;
pub use allowance::ensure_authorized;
pub use exchange::ExchangeAdapter;
pub use guard::{Entered, ReentrancyGuard};
pub use helper::OffsetHelper;
pub use registry::EligibilityRegistry;
