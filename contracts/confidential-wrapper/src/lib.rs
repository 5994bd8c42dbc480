//! # Confidential Wrapper Contract
//!
//! Wraps a Stellar asset into encrypted balances.
//!
//! Deposits are synchronous: the underlying asset comes in and the encrypted
//! balance grows in the same call. Withdrawals take two steps, because the
//! amount actually burned is only known in encrypted form:
//!
//! 1. `withdraw` burns the encrypted amount at once and queues a reveal of
//!    it with the executor. The request is `Pending`.
//! 2. The relayer delivers the cleartext with a signature to
//!    `finalize_withdrawal`. After the executor verifies it, the request
//!    becomes `Settled` and the underlying asset is released, exactly once.

#![no_std]

mod types;
mod validation;

use soroban_sdk::{
    contract, contractimpl, log, panic_with_error, token, Address, Bytes, BytesN, Env,
};

use confidential_common::{
    non_reentrant, ownable, require_non_zero, ConfidentialError, FheExecutorClient,
};

pub use crate::types::{DataKey, WithdrawalRequest, WithdrawalState, WrapperEvents};
use crate::validation::encryptable_amount;

#[contract]
pub struct ConfidentialWrapper;

#[contractimpl]
impl ConfidentialWrapper {
    /// Initializes the contract.
    ///
    /// # Arguments
    /// * `owner` - The administrative owner
    /// * `underlying` - The Stellar asset contract being wrapped
    /// * `fhe_executor` - The encrypted-value executor contract
    ///
    /// # Errors
    /// * `AlreadyInitialized` - If called twice
    /// * `ZeroAddress` - If any of the addresses is the zero address
    pub fn initialize(env: Env, owner: Address, underlying: Address, fhe_executor: Address) {
        if let Err(e) = ownable::initialize_owner(&env, &owner) {
            panic_with_error!(&env, e);
        }
        for address in [&underlying, &fhe_executor] {
            if let Err(e) = require_non_zero(&env, address) {
                panic_with_error!(&env, e);
            }
        }

        env.storage()
            .instance()
            .set(&DataKey::Underlying, &underlying);
        env.storage()
            .instance()
            .set(&DataKey::FheExecutor, &fhe_executor);
    }

    /// Moves `amount` of the underlying asset from `from` into the wrapper and
    /// credits the same encrypted amount to `from`.
    ///
    /// Returns the new encrypted balance handle.
    ///
    /// # Errors
    /// * `InvalidAmount` - If `amount` is not positive
    /// * `AmountOverflow` - If `amount`, or the total wrapped supply after
    ///   adding it, does not fit an encrypted 64-bit value
    pub fn deposit(env: Env, from: Address, amount: i128) -> BytesN<32> {
        from.require_auth();

        non_reentrant(&env, || Self::wrap(&env, &from, amount))
            .unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    /// Burns an encrypted amount from `from` and queues its reveal.
    ///
    /// Burns zero when the amount exceeds the balance. Returns the reveal
    /// request id that `finalize_withdrawal` settles.
    pub fn withdraw(env: Env, from: Address, amount: BytesN<32>, proof: Bytes) -> u64 {
        from.require_auth();

        non_reentrant(&env, || Self::burn(&env, &from, &amount, &proof))
            .unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    /// Reveal callback: releases the decrypted amount of a pending withdrawal.
    ///
    /// # Errors
    /// * `InvalidRevealProof` - If the executor rejects the signature
    /// * `NoPendingRequest` - If the request is unknown or already settled
    pub fn finalize_withdrawal(env: Env, request_id: u64, cleartext: u64, proof: Bytes) {
        non_reentrant(&env, || Self::settle(&env, request_id, cleartext, &proof))
            .unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    pub fn confidential_balance_of(env: Env, account: Address) -> Option<BytesN<32>> {
        env.storage().persistent().get(&DataKey::Balance(account))
    }

    pub fn withdrawal(env: Env, request_id: u64) -> Option<WithdrawalRequest> {
        env.storage()
            .persistent()
            .get(&DataKey::Withdrawal(request_id))
    }

    /// Returns the amount of underlying asset currently backing encrypted
    /// balances and pending withdrawals.
    pub fn total_supply(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0)
    }

    pub fn underlying(env: Env) -> Address {
        Self::load_underlying(&env).unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    pub fn fhe_executor(env: Env) -> Address {
        Self::load_executor(&env).unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    pub fn owner(env: Env) -> Address {
        ownable::owner(&env).unwrap_or_else(|e| panic_with_error!(&env, e))
    }

    pub fn pending_owner(env: Env) -> Option<Address> {
        ownable::pending_owner(&env)
    }

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

    fn wrap(env: &Env, from: &Address, amount: i128) -> Result<BytesN<32>, ConfidentialError> {
        let value = encryptable_amount(amount)?;
        // Every balance is bounded by the supply, so homomorphic adds never wrap.
        let supply = Self::total_supply(env.clone())
            .checked_add(value)
            .ok_or(ConfidentialError::AmountOverflow)?;
        let underlying = Self::load_underlying(env)?;
        let fhe = FheExecutorClient::new(env, &Self::load_executor(env)?);
        let this = env.current_contract_address();

        token::Client::new(env, &underlying).transfer(from, &this, &amount);

        let minted = fhe.as_encrypted(&this, &value);
        fhe.allow(&this, &minted, from);
        let balance = match Self::confidential_balance_of(env.clone(), from.clone()) {
            Some(current) => fhe.add(&this, &current, &minted),
            None => minted.clone(),
        };
        Self::store_balance(env, &fhe, from, &balance);
        env.storage().instance().set(&DataKey::TotalSupply, &supply);

        WrapperEvents::deposited(env, from, amount, &minted);
        Ok(balance)
    }

    fn burn(
        env: &Env,
        from: &Address,
        amount: &BytesN<32>,
        proof: &Bytes,
    ) -> Result<u64, ConfidentialError> {
        let fhe = FheExecutorClient::new(env, &Self::load_executor(env)?);
        let this = env.current_contract_address();

        let requested = fhe.from_external(&this, amount, proof);
        let zero = fhe.as_encrypted(&this, &0);
        let balance = Self::confidential_balance_of(env.clone(), from.clone())
            .unwrap_or_else(|| zero.clone());

        let covered = fhe.le(&this, &requested, &balance);
        let burned = fhe.select(&this, &covered, &requested, &zero);
        let remaining = fhe.sub(&this, &balance, &burned);
        Self::store_balance(env, &fhe, from, &remaining);

        fhe.allow(&this, &burned, from);
        let request_id = fhe.request_reveal(&this, &burned);
        env.storage().persistent().set(
            &DataKey::Withdrawal(request_id),
            &WithdrawalRequest {
                user: from.clone(),
                amount: burned.clone(),
                state: WithdrawalState::Pending,
            },
        );

        log!(env, "withdrawal {} pending", request_id);
        WrapperEvents::withdrawal_requested(env, request_id, from, &burned);
        Ok(request_id)
    }

    fn settle(
        env: &Env,
        request_id: u64,
        cleartext: u64,
        proof: &Bytes,
    ) -> Result<(), ConfidentialError> {
        let fhe = FheExecutorClient::new(env, &Self::load_executor(env)?);
        if !fhe.verify_reveal(&request_id, &cleartext, proof) {
            return Err(ConfidentialError::InvalidRevealProof);
        }

        let key = DataKey::Withdrawal(request_id);
        let mut request: WithdrawalRequest = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(ConfidentialError::NoPendingRequest)?;
        if request.state != WithdrawalState::Pending {
            return Err(ConfidentialError::NoPendingRequest);
        }

        let supply = Self::total_supply(env.clone())
            .checked_sub(cleartext)
            .ok_or(ConfidentialError::AmountOverflow)?;

        request.state = WithdrawalState::Settled;
        env.storage().persistent().set(&key, &request);
        env.storage().instance().set(&DataKey::TotalSupply, &supply);

        // Zero-value releases (over-withdrawals) settle without a transfer.
        if cleartext > 0 {
            token::Client::new(env, &Self::load_underlying(env)?).transfer(
                &env.current_contract_address(),
                &request.user,
                &(cleartext as i128),
            );
        }

        log!(env, "withdrawal {} settled", request_id);
        WrapperEvents::withdrawal_settled(env, request_id, &request.user, cleartext);
        Ok(())
    }

    fn store_balance(
        env: &Env,
        fhe: &FheExecutorClient,
        account: &Address,
        balance: &BytesN<32>,
    ) {
        fhe.allow(&env.current_contract_address(), balance, account);
        env.storage()
            .persistent()
            .set(&DataKey::Balance(account.clone()), balance);
    }

    fn load_underlying(env: &Env) -> Result<Address, ConfidentialError> {
        env.storage()
            .instance()
            .get(&DataKey::Underlying)
            .ok_or(ConfidentialError::NotInitialized)
    }

    fn load_executor(env: &Env) -> Result<Address, ConfidentialError> {
        env.storage()
            .instance()
            .get(&DataKey::FheExecutor)
            .ok_or(ConfidentialError::NotInitialized)
    }
}
