//! The null principal.
//!
//! Soroban addresses are valid by construction, so "zero" is a convention:
//! the ed25519 account whose public key is all zero bytes.

use soroban_sdk::{Address, Env, String};

use crate::ConfidentialError;

/// Strkey of the all-zero ed25519 account.
pub const ZERO_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

pub fn zero_address(env: &Env) -> Address {
    Address::from_string(&String::from_str(env, ZERO_ACCOUNT))
}

pub fn is_zero(env: &Env, address: &Address) -> bool {
    *address == zero_address(env)
}

/// Rejects the zero address.
pub fn require_non_zero(env: &Env, address: &Address) -> Result<(), ConfidentialError> {
    if is_zero(env, address) {
        return Err(ConfidentialError::ZeroAddress);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;

    #[test]
    fn test_zero_address_detection() {
        let env = Env::default();
        let zero = zero_address(&env);
        let other = Address::generate(&env);

        assert!(is_zero(&env, &zero));
        assert!(!is_zero(&env, &other));
        assert_eq!(
            require_non_zero(&env, &zero),
            Err(ConfidentialError::ZeroAddress)
        );
        assert!(require_non_zero(&env, &other).is_ok());
    }
}
