//! Amount checks for deposits.

use confidential_common::ConfidentialError;

/// Converts a deposit amount into the encrypted 64-bit range.
pub fn encryptable_amount(amount: i128) -> Result<u64, ConfidentialError> {
    if amount <= 0 {
        return Err(ConfidentialError::InvalidAmount);
    }
    u64::try_from(amount).map_err(|_| ConfidentialError::AmountOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encryptable_amount() {
        assert_eq!(encryptable_amount(1), Ok(1));
        assert_eq!(encryptable_amount(u64::MAX as i128), Ok(u64::MAX));
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        assert_eq!(encryptable_amount(0), Err(ConfidentialError::InvalidAmount));
        assert_eq!(
            encryptable_amount(-5),
            Err(ConfidentialError::InvalidAmount)
        );
    }

    #[test]
    fn test_amount_above_u64_rejected() {
        assert_eq!(
            encryptable_amount(u64::MAX as i128 + 1),
            Err(ConfidentialError::AmountOverflow)
        );
        assert_eq!(
            encryptable_amount(i128::MAX),
            Err(ConfidentialError::AmountOverflow)
        );
    }
}
