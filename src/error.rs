//! Typed errors raised by the address-block core.

use thiserror::Error;

/// Errors produced while validating user or discovery input.
///
/// Everything the exclusion engine meets after parsing is a normal case,
/// so no variant is ever raised mid-computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IpamError {
    /// The text is not an `address/prefix` block with a valid, masked address.
    #[error("invalid address block '{input}': {reason}")]
    InvalidAddressBlock { input: String, reason: String },

    /// No parent range was supplied.
    #[error("no parent address ranges given (expected e.g. 10.0.0.0/8, 192.168.0.0/16)")]
    NoParentRanges,
}

impl IpamError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> IpamError {
        IpamError::InvalidAddressBlock {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
