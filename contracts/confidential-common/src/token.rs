//! Client interface of the confidential token ledger.
//!
//! Both transfers fail atomically when the payer has not approved the
//! spender, when the balance is insufficient, or when the ledger may not
//! operate on the amount handle. They return the handle of the amount
//! actually moved.

use soroban_sdk::{contractclient, Address, BytesN, Env};

#[contractclient(name = "ConfidentialTokenClient")]
pub trait ConfidentialToken {
    fn confidential_transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: BytesN<32>,
    ) -> BytesN<32>;

    fn confidential_transfer(env: Env, from: Address, to: Address, amount: BytesN<32>)
        -> BytesN<32>;
}
