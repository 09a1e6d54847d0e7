//! Retirement certificate metadata supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::Address;

/// Beneficiary metadata attached to every unit retired in one request.
///
/// Built per request by the caller and handed unchanged to the
/// certification authority for each unit in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateData {
    /// Name of the entity performing the retirement.
    pub retiring_entity: String,
    /// Account the retirement is made on behalf of.
    pub beneficiary: Address,
    /// Display name of the beneficiary.
    pub beneficiary_name: String,
    /// Free-text retirement message.
    pub message: String,
}

impl CertificateData {
    #[must_use]
    pub fn new(
        retiring_entity: impl Into<String>,
        beneficiary: Address,
        beneficiary_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            retiring_entity: retiring_entity.into(),
            beneficiary,
            beneficiary_name: beneficiary_name.into(),
            message: message.into(),
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl CertificateData {
    /// Fixed certificate for tests.
    #[must_use]
    pub fn dummy() -> Self {
        Self::new(
            "Test Retiring Entity",
            Address::derive("beneficiary"),
            "Test Beneficiary",
            "retired in test",
        )
    }
}
