//! Data types and events for the confidential wrapper.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum WithdrawalState {
    /// Balance burned, waiting for the decrypted amount
    Pending,
    /// Underlying released; terminal
    Settled,
}

/// A withdrawal waiting for, or done with, its reveal callback.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct WithdrawalRequest {
    /// Account that receives the underlying asset
    pub user: Address,
    /// Encrypted amount burned from the user's balance
    pub amount: BytesN<32>,
    pub state: WithdrawalState,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Underlying,
    FheExecutor,
    /// Plaintext sum of all deposits not yet released
    TotalSupply,
    /// Encrypted balance handle per account
    Balance(Address),
    /// Withdrawal keyed by the executor's reveal request id
    Withdrawal(u64),
}

pub struct WrapperEvents;

impl WrapperEvents {
    pub fn deposited(env: &Env, user: &Address, amount: i128, minted: &BytesN<32>) {
        let topics = (symbol_short!("deposit"), user.clone());
        env.events().publish(topics, (amount, minted.clone()));
    }

    pub fn withdrawal_requested(env: &Env, request_id: u64, user: &Address, burned: &BytesN<32>) {
        let topics = (
            symbol_short!("withdraw"),
            symbol_short!("request"),
            request_id,
        );
        env.events().publish(topics, (user.clone(), burned.clone()));
    }

    pub fn withdrawal_settled(env: &Env, request_id: u64, user: &Address, cleartext: u64) {
        let topics = (
            symbol_short!("withdraw"),
            symbol_short!("settled"),
            request_id,
        );
        env.events().publish(topics, (user.clone(), cleartext));
    }
}
