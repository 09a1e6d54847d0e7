//! # offset-types
//!
//! Shared types, errors, and configuration for the **offset helper**.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`Address`], [`AssetHandle`], [`OffsetId`]
//! - **Request data**: [`OffsetRequest`], [`CertificateData`], [`SwapInstruction`]
//! - **Redemption output**: [`RetirementBatch`]
//! - **Audit record**: [`OffsetOutcome`]
//! - **Configuration**: [`HelperConfig`]
//! - **Errors**: [`OffsetError`] with `OS_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod batch;
pub mod certificate;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod instruction;
pub mod outcome;
pub mod request;

pub use batch::*;
pub use certificate::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use instruction::*;
pub use outcome::*;
pub use request::*;

// Constants are accessed via `offset_types::constants::FOO`.
