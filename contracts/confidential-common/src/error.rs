//! Error codes shared by the confidential contracts.

/// Error codes for the confidential contracts.
///
/// Codes are stable: clients match on the numeric value carried by
/// `Error(Contract, #n)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ConfidentialError {
    /// Contract not initialized
    NotInitialized = 1,
    /// Contract already initialized
    AlreadyInitialized = 2,
    /// Caller is not authorized
    Unauthorized = 3,
    /// Zero address supplied as token, recipient or owner
    ZeroAddress = 4,
    /// Batch is empty
    EmptyBatch = 5,
    /// Batch exceeds the current maximum size
    BatchTooLarge = 6,
    /// Recipients and amounts differ in length
    LengthMismatch = 7,
    /// New maximum batch size outside the configured range
    InvalidBatchSize = 8,
    /// Batch policy bounds are inconsistent
    InvalidPolicy = 9,
    /// Nested entry into a locked operation
    Reentrancy = 10,
    /// Amount must be positive
    InvalidAmount = 11,
    /// Amount does not fit an encrypted 64-bit value
    AmountOverflow = 12,
    /// No pending withdrawal for the request id
    NoPendingRequest = 13,
    /// Reveal proof rejected by the executor
    InvalidRevealProof = 14,
    /// No ownership transfer in progress
    NoPendingOwner = 15,
}

impl From<ConfidentialError> for soroban_sdk::Error {
    fn from(e: ConfidentialError) -> Self {
        soroban_sdk::Error::from_contract_error(e as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_contract_errors() {
        assert_eq!(
            soroban_sdk::Error::from(ConfidentialError::BatchTooLarge),
            soroban_sdk::Error::from_contract_error(6)
        );
        assert_eq!(
            soroban_sdk::Error::from(ConfidentialError::NoPendingOwner),
            soroban_sdk::Error::from_contract_error(15)
        );
    }
}
