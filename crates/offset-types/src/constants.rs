//! System-wide constants for the offset helper.

use rust_decimal::Decimal;

/// Largest representable quantity; an allowance at this value is unlimited.
pub const MAX_AMOUNT: Decimal = Decimal::MAX;

/// Label the default helper custody address is derived from.
pub const DEFAULT_HELPER_LABEL: &str = "offset-helper";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component name used in log fields.
pub const COMPONENT_NAME: &str = "OffsetHelper";
