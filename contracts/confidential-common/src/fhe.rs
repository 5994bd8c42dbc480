//! Client interface of the encrypted-value executor.
//!
//! Encrypted values are 32-byte handles. The executor owns the ciphertexts
//! and an access list per handle; every operation that consumes handles
//! requires `caller` to be allowed on each operand, and the result is
//! granted to `caller`.

use soroban_sdk::{contractclient, Address, Bytes, BytesN, Env};

#[contractclient(name = "FheExecutorClient")]
pub trait FheExecutor {
    /// Verifies `proof` for the externally encrypted `input` and returns a
    /// usable handle. Panics when the proof does not verify.
    fn from_external(env: Env, caller: Address, input: BytesN<32>, proof: Bytes) -> BytesN<32>;

    /// Trivially encrypts a plaintext.
    fn as_encrypted(env: Env, caller: Address, value: u64) -> BytesN<32>;

    fn add(env: Env, caller: Address, lhs: BytesN<32>, rhs: BytesN<32>) -> BytesN<32>;

    fn sub(env: Env, caller: Address, lhs: BytesN<32>, rhs: BytesN<32>) -> BytesN<32>;

    /// Multiplies an encrypted value by a plaintext scalar.
    fn mul_plain(env: Env, caller: Address, lhs: BytesN<32>, rhs: u64) -> BytesN<32>;

    /// Encrypted `lhs <= rhs`, as an encrypted boolean handle.
    fn le(env: Env, caller: Address, lhs: BytesN<32>, rhs: BytesN<32>) -> BytesN<32>;

    fn select(
        env: Env,
        caller: Address,
        condition: BytesN<32>,
        if_true: BytesN<32>,
        if_false: BytesN<32>,
    ) -> BytesN<32>;

    /// Grants `account` access to `handle`. `caller` must already hold access.
    fn allow(env: Env, caller: Address, handle: BytesN<32>, account: Address);

    fn is_allowed(env: Env, handle: BytesN<32>, account: Address) -> bool;

    /// Queues a decryption of `handle` and returns the request id the
    /// relayer will echo back with the cleartext.
    fn request_reveal(env: Env, caller: Address, handle: BytesN<32>) -> u64;

    /// Checks the signatures over a delivered cleartext.
    fn verify_reveal(env: Env, request_id: u64, cleartext: u64, proof: Bytes) -> bool;
}
