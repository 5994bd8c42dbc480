//! # Confidential Batcher Contract
//!
//! Sends encrypted token amounts to many recipients in one atomic call,
//! on top of a confidential token that keeps balances as encrypted handles.
//!
//! ## Features
//!
//! - **Shared amount**: one encrypted amount, materialized once, sent to every
//!   recipient (duplicates receive it once per occurrence)
//! - **Per-recipient amounts**: one encrypted amount per recipient, each with
//!   its own access grants
//! - **Audit totals**: an encrypted sum per batch, granted to the caller
//! - **All or nothing**: any failing transfer reverts the whole batch
//! - **Owner controls**: tunable maximum batch size, token rescue, two-step
//!   ownership
//!
//! The batcher must be an approved operator of the caller on the token.

#![no_std]

mod types;
mod validation;

use soroban_sdk::{
    contract, contractimpl, log, panic_with_error, Address, Bytes, BytesN, Env, Vec,
};

use confidential_common::{
    non_reentrant, ownable, require_non_zero, ConfidentialError, ConfidentialTokenClient,
    FheExecutorClient,
};

pub use crate::types::{BatchReceipt, BatcherEvents, BatcherPolicy, DataKey};
use crate::validation::{validate_batch, validate_batch_with_amounts};

#[contract]
pub struct ConfidentialBatcher;

#[contractimpl]
impl ConfidentialBatcher {
    /// Initializes the contract.
    ///
    /// # Arguments
    /// * `owner` - The address allowed to tune the batch size and rescue tokens
    /// * `fhe_executor` - The encrypted-value executor contract
    /// * `policy` - Batch size bounds and flavor flags
    ///
    /// # Errors
    /// * `AlreadyInitialized` - If called twice
    /// * `InvalidPolicy` - If the policy bounds are inconsistent
    /// * `ZeroAddress` - If the owner is the zero address
    pub fn initialize(env: Env, owner: Address, fhe_executor: Address, policy: BatcherPolicy) {
        if !policy.is_valid() {
            panic_with_error!(&env, ConfidentialError::InvalidPolicy);
        }
        if let Err(e) = ownable::initialize_owner(&env, &owner) {
            panic_with_error!(&env, e);
        }

        let storage = env.storage().instance();
        storage.set(&DataKey::FheExecutor, &fhe_executor);
        storage.set(&DataKey::MaxBatchSize, &policy.default_batch_size);
        storage.set(&DataKey::Policy, &policy);
        storage.set(&DataKey::TotalBatches, &0u64);
        storage.set(&DataKey::TotalTransfers, &0u64);
    }

    /// Sends the same encrypted amount to every recipient.
    ///
    /// `amount` is a per-recipient amount: the caller is debited
    /// `amount * recipients.len()`.
    ///
    /// # Events Emitted
    /// * `batch_sent` - Once, after every transfer went through
    ///
    /// # Errors
    /// * `ZeroAddress` - If the token or any recipient is the zero address
    /// * `EmptyBatch` - If no recipients are given
    /// * `BatchTooLarge` - If there are more recipients than the maximum batch size
    /// * `Reentrancy` - If entered while another batch is running
    pub fn batch_send_same_amount(
        env: Env,
        caller: Address,
        token: Address,
        recipients: Vec<Address>,
        amount: BytesN<32>,
        proof: Bytes,
    ) -> BatchReceipt {
        caller.require_auth();

        non_reentrant(&env, || {
            Self::send_same_amount(&env, &caller, &token, &recipients, &amount, &proof)
        })
        .unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    /// Sends `amounts[i]` to `recipients[i]` for every `i`.
    ///
    /// All amounts share one input proof. An encrypted zero is sent like
    /// any other amount.
    ///
    /// # Errors
    /// Same as [`Self::batch_send_same_amount`], plus `LengthMismatch` when
    /// the two lists differ in length.
    pub fn batch_send_different_amounts(
        env: Env,
        caller: Address,
        token: Address,
        recipients: Vec<Address>,
        amounts: Vec<BytesN<32>>,
        proof: Bytes,
    ) -> BatchReceipt {
        caller.require_auth();

        non_reentrant(&env, || {
            Self::send_different_amounts(&env, &caller, &token, &recipients, &amounts, &proof)
        })
        .unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    /// Moves tokens held by the batcher itself to `to`. Owner only.
    ///
    /// Returns the handle of the amount moved.
    pub fn token_rescue(
        env: Env,
        caller: Address,
        token: Address,
        to: Address,
        amount: BytesN<32>,
        proof: Bytes,
    ) -> BytesN<32> {
        if let Err(e) = ownable::require_owner(&env, &caller) {
            panic_with_error!(&env, e);
        }

        non_reentrant(&env, || Self::rescue(&env, &caller, &token, &to, &amount, &proof))
            .unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    /// Sets the maximum batch size. Owner only.
    ///
    /// # Errors
    /// * `Unauthorized` - If the caller is not the owner
    /// * `InvalidBatchSize` - If `new_size` is outside the policy bounds
    pub fn change_max_batch_size(env: Env, caller: Address, new_size: u32) {
        if let Err(e) = ownable::require_owner(&env, &caller) {
            panic_with_error!(&env, e);
        }

        let policy = Self::load_policy(&env).unwrap_or_else(|e| panic_with_error!(&env, e));
        if !policy.allows(new_size) {
            panic_with_error!(&env, ConfidentialError::InvalidBatchSize);
        }

        let old_size = Self::max_batch_size(env.clone());
        env.storage()
            .instance()
            .set(&DataKey::MaxBatchSize, &new_size);

        log!(&env, "max batch size {} -> {}", old_size, new_size);
        BatcherEvents::max_batch_size_changed(&env, old_size, new_size);
    }

    /// Returns the current maximum batch size.
    pub fn max_batch_size(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::MaxBatchSize)
            .unwrap_or_else(|| panic_with_error!(&env, ConfidentialError::NotInitialized))
    }

    pub fn policy(env: Env) -> BatcherPolicy {
        Self::load_policy(&env).unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    pub fn fhe_executor(env: Env) -> Address {
        Self::load_executor(&env).unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    /// Returns the total number of batches sent.
    pub fn total_batches(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::TotalBatches)
            .unwrap_or(0)
    }

    /// Returns the total number of recipient transfers across all batches.
    pub fn total_transfers(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::TotalTransfers)
            .unwrap_or(0)
    }

    pub fn owner(env: Env) -> Address {
        ownable::owner(&env).unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    pub fn pending_owner(env: Env) -> Option<Address> {
        ownable::pending_owner(&env)
    }

    /// Nominates a new owner, who must call `accept_ownership`.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) {
        if let Err(e) = ownable::begin_transfer(&env, &caller, &new_owner) {
            panic_with_error!(&env, e);
        }
    }

    pub fn accept_ownership(env: Env, caller: Address) {
        if let Err(e) = ownable::accept_transfer(&env, &caller) {
            panic_with_error!(&env, e);
        }
    }

    pub fn cancel_ownership_transfer(env: Env, caller: Address) {
        if let Err(e) = ownable::cancel_transfer(&env, &caller) {
            panic_with_error!(&env, e);
        }
    }

    fn send_same_amount(
        env: &Env,
        caller: &Address,
        token: &Address,
        recipients: &Vec<Address>,
        amount: &BytesN<32>,
        proof: &Bytes,
    ) -> Result<BatchReceipt, ConfidentialError> {
        let policy = Self::load_policy(env)?;
        let fhe = FheExecutorClient::new(env, &Self::load_executor(env)?);
        validate_batch(env, token, recipients, Self::max_batch_size(env.clone()))?;

        let this = env.current_contract_address();
        let ledger = ConfidentialTokenClient::new(env, token);

        let value = fhe.from_external(&this, amount, proof);
        Self::grant(env, &fhe, &policy, &value, caller, token);

        for recipient in recipients.iter() {
            ledger.confidential_transfer_from(&this, caller, &recipient, &value);
        }

        let total = if policy.emit_total {
            let total = fhe.mul_plain(&this, &value, &(recipients.len() as u64));
            fhe.allow(&this, &total, caller);
            Some(total)
        } else {
            None
        };

        Ok(Self::record_batch(env, caller, token, recipients, total))
    }

    fn send_different_amounts(
        env: &Env,
        caller: &Address,
        token: &Address,
        recipients: &Vec<Address>,
        amounts: &Vec<BytesN<32>>,
        proof: &Bytes,
    ) -> Result<BatchReceipt, ConfidentialError> {
        let policy = Self::load_policy(env)?;
        let fhe = FheExecutorClient::new(env, &Self::load_executor(env)?);
        validate_batch_with_amounts(
            env,
            token,
            recipients,
            amounts.len(),
            Self::max_batch_size(env.clone()),
        )?;

        let this = env.current_contract_address();
        let ledger = ConfidentialTokenClient::new(env, token);
        let mut total: Option<BytesN<32>> = None;

        for (recipient, amount) in recipients.iter().zip(amounts.iter()) {
            let value = fhe.from_external(&this, &amount, proof);
            Self::grant(env, &fhe, &policy, &value, caller, token);

            ledger.confidential_transfer_from(&this, caller, &recipient, &value);

            if policy.emit_total {
                total = Some(match total {
                    Some(running) => fhe.add(&this, &running, &value),
                    None => value,
                });
            }
        }

        if let Some(total) = &total {
            fhe.allow(&this, total, caller);
        }

        Ok(Self::record_batch(env, caller, token, recipients, total))
    }

    fn rescue(
        env: &Env,
        caller: &Address,
        token: &Address,
        to: &Address,
        amount: &BytesN<32>,
        proof: &Bytes,
    ) -> Result<BytesN<32>, ConfidentialError> {
        require_non_zero(env, token)?;
        require_non_zero(env, to)?;
        let policy = Self::load_policy(env)?;
        let fhe = FheExecutorClient::new(env, &Self::load_executor(env)?);

        let this = env.current_contract_address();
        let value = fhe.from_external(&this, amount, proof);
        Self::grant(env, &fhe, &policy, &value, caller, token);

        let moved =
            ConfidentialTokenClient::new(env, token).confidential_transfer(&this, to, &value);

        BatcherEvents::rescued(env, token, to, &moved);
        Ok(moved)
    }

    // Grants the caller, and the token when the policy asks for it.
    fn grant(
        env: &Env,
        fhe: &FheExecutorClient,
        policy: &BatcherPolicy,
        value: &BytesN<32>,
        caller: &Address,
        token: &Address,
    ) {
        let this = env.current_contract_address();
        fhe.allow(&this, value, caller);
        if policy.grant_token_access {
            fhe.allow(&this, value, token);
        }
    }

    fn record_batch(
        env: &Env,
        caller: &Address,
        token: &Address,
        recipients: &Vec<Address>,
        total: Option<BytesN<32>>,
    ) -> BatchReceipt {
        let batch_id = Self::total_batches(env.clone()) + 1;
        let transfers = Self::total_transfers(env.clone()) + recipients.len() as u64;

        let storage = env.storage().instance();
        storage.set(&DataKey::TotalBatches, &batch_id);
        storage.set(&DataKey::TotalTransfers, &transfers);

        log!(env, "batch {} sent to {} recipients", batch_id, recipients.len());
        BatcherEvents::batch_sent(env, batch_id, caller, token, recipients, &total);

        BatchReceipt {
            batch_id,
            recipient_count: recipients.len(),
            total,
        }
    }

    fn load_policy(env: &Env) -> Result<BatcherPolicy, ConfidentialError> {
        env.storage()
            .instance()
            .get(&DataKey::Policy)
            .ok_or(ConfidentialError::NotInitialized)
    }

    fn load_executor(env: &Env) -> Result<Address, ConfidentialError> {
        env.storage()
            .instance()
            .get(&DataKey::FheExecutor)
            .ok_or(ConfidentialError::NotInitialized)
    }
}
