//! Shape checks for batch requests.
//!
//! Everything here runs before the first call to the executor or the
//! ledger, so a rejected batch has no side effects.

use soroban_sdk::{Address, Env, Vec};

use confidential_common::{require_non_zero, ConfidentialError};

pub fn validate_token(env: &Env, token: &Address) -> Result<(), ConfidentialError> {
    require_non_zero(env, token)
}

/// Checks `1 <= count <= max_batch_size`.
pub fn validate_batch_size(count: u32, max_batch_size: u32) -> Result<(), ConfidentialError> {
    if count == 0 {
        return Err(ConfidentialError::EmptyBatch);
    }
    if count > max_batch_size {
        return Err(ConfidentialError::BatchTooLarge);
    }
    Ok(())
}

pub fn validate_lengths(recipients: u32, amounts: u32) -> Result<(), ConfidentialError> {
    if recipients != amounts {
        return Err(ConfidentialError::LengthMismatch);
    }
    Ok(())
}

/// Rejects the zero address anywhere in the list.
pub fn validate_recipients(env: &Env, recipients: &Vec<Address>) -> Result<(), ConfidentialError> {
    for recipient in recipients.iter() {
        require_non_zero(env, &recipient)?;
    }
    Ok(())
}

/// Full check for a shared-amount batch.
pub fn validate_batch(
    env: &Env,
    token: &Address,
    recipients: &Vec<Address>,
    max_batch_size: u32,
) -> Result<(), ConfidentialError> {
    validate_token(env, token)?;
    validate_batch_size(recipients.len(), max_batch_size)?;
    validate_recipients(env, recipients)
}

/// Full check for a per-recipient-amount batch.
pub fn validate_batch_with_amounts(
    env: &Env,
    token: &Address,
    recipients: &Vec<Address>,
    amount_count: u32,
    max_batch_size: u32,
) -> Result<(), ConfidentialError> {
    validate_token(env, token)?;
    validate_batch_size(recipients.len(), max_batch_size)?;
    validate_lengths(recipients.len(), amount_count)?;
    validate_recipients(env, recipients)
}
