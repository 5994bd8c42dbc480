//! Mock collaborators for contract tests.
//!
//! [`MockFheExecutor`] stores plaintexts next to counter-tagged handles so
//! tests can follow encrypted values through a call. [`MockConfidentialToken`]
//! keeps plaintext balances and enforces the ledger rules the orchestrator
//! relies on: operator approval, sufficient balance and handle access.

use soroban_sdk::{
    contract, contractimpl, contracttype, panic_with_error, Address, Bytes, BytesN, Env, Vec,
};

use crate::FheExecutorClient;

const INPUT_PROOF: &[u8] = b"mock-input-proof";
const REVEAL_DOMAIN: &[u8] = b"mock-kms";

const INPUT_TAG: u8 = 0xee;
const HANDLE_TAG: u8 = 0xfe;

/// Error codes raised by the mock contracts.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum MockError {
    InvalidInputProof = 100,
    UnknownInput = 101,
    UnknownHandle = 102,
    AccessDenied = 103,
    UnknownReveal = 104,
    NotOperator = 105,
    InsufficientBalance = 106,
    NotInitialized = 107,
}

impl From<MockError> for soroban_sdk::Error {
    fn from(e: MockError) -> Self {
        soroban_sdk::Error::from_contract_error(e as u32)
    }
}

#[derive(Clone)]
#[contracttype]
enum MockFheKey {
    Counter,
    Input(BytesN<32>),
    Value(BytesN<32>),
    Acl(BytesN<32>, Address),
    RevealCounter,
    Reveal(u64),
}

#[contract]
pub struct MockFheExecutor;

#[contractimpl]
impl MockFheExecutor {
    /// Client-side encryption: registers `value` as an external input.
    pub fn encrypt_input(env: Env, value: u64) -> BytesN<32> {
        let input = Self::next_handle(&env, INPUT_TAG);
        env.storage()
            .persistent()
            .set(&MockFheKey::Input(input.clone()), &value);
        input
    }

    /// The proof accepted for every registered input.
    pub fn input_proof(env: Env) -> Bytes {
        Bytes::from_slice(&env, INPUT_PROOF)
    }

    /// Relayer-side signature over a decrypted request.
    pub fn sign_reveal(env: Env, request_id: u64, cleartext: u64) -> Bytes {
        let mut proof = Bytes::from_slice(&env, REVEAL_DOMAIN);
        proof.extend_from_slice(&request_id.to_be_bytes());
        proof.extend_from_slice(&cleartext.to_be_bytes());
        proof
    }

    pub fn plaintext(env: Env, handle: BytesN<32>) -> u64 {
        Self::value_of(&env, &handle)
    }

    /// Cleartext behind a queued reveal, as the relayer would decrypt it.
    pub fn revealed_value(env: Env, request_id: u64) -> u64 {
        let handle: BytesN<32> = env
            .storage()
            .persistent()
            .get(&MockFheKey::Reveal(request_id))
            .unwrap_or_else(|| panic_with_error!(&env, MockError::UnknownReveal));
        Self::value_of(&env, &handle)
    }

    pub fn reveal_count(env: Env) -> u64 {
        env.storage()
            .persistent()
            .get(&MockFheKey::RevealCounter)
            .unwrap_or(0)
    }

    pub fn from_external(env: Env, caller: Address, input: BytesN<32>, proof: Bytes) -> BytesN<32> {
        if proof != Bytes::from_slice(&env, INPUT_PROOF) {
            panic_with_error!(&env, MockError::InvalidInputProof);
        }
        let value: u64 = env
            .storage()
            .persistent()
            .get(&MockFheKey::Input(input))
            .unwrap_or_else(|| panic_with_error!(&env, MockError::UnknownInput));
        Self::store(&env, value, &caller)
    }

    pub fn as_encrypted(env: Env, caller: Address, value: u64) -> BytesN<32> {
        Self::store(&env, value, &caller)
    }

    pub fn add(env: Env, caller: Address, lhs: BytesN<32>, rhs: BytesN<32>) -> BytesN<32> {
        let (a, b) = Self::operands(&env, &caller, &lhs, &rhs);
        Self::store(&env, a.wrapping_add(b), &caller)
    }

    pub fn sub(env: Env, caller: Address, lhs: BytesN<32>, rhs: BytesN<32>) -> BytesN<32> {
        let (a, b) = Self::operands(&env, &caller, &lhs, &rhs);
        Self::store(&env, a.wrapping_sub(b), &caller)
    }

    pub fn mul_plain(env: Env, caller: Address, lhs: BytesN<32>, rhs: u64) -> BytesN<32> {
        Self::require_access(&env, &lhs, &caller);
        let a = Self::value_of(&env, &lhs);
        Self::store(&env, a.wrapping_mul(rhs), &caller)
    }

    pub fn le(env: Env, caller: Address, lhs: BytesN<32>, rhs: BytesN<32>) -> BytesN<32> {
        let (a, b) = Self::operands(&env, &caller, &lhs, &rhs);
        Self::store(&env, (a <= b) as u64, &caller)
    }

    pub fn select(
        env: Env,
        caller: Address,
        condition: BytesN<32>,
        if_true: BytesN<32>,
        if_false: BytesN<32>,
    ) -> BytesN<32> {
        Self::require_access(&env, &condition, &caller);
        let (t, f) = Self::operands(&env, &caller, &if_true, &if_false);
        let picked = if Self::value_of(&env, &condition) != 0 { t } else { f };
        Self::store(&env, picked, &caller)
    }

    pub fn allow(env: Env, caller: Address, handle: BytesN<32>, account: Address) {
        Self::require_access(&env, &handle, &caller);
        env.storage()
            .persistent()
            .set(&MockFheKey::Acl(handle, account), &true);
    }

    pub fn is_allowed(env: Env, handle: BytesN<32>, account: Address) -> bool {
        env.storage()
            .persistent()
            .get(&MockFheKey::Acl(handle, account))
            .unwrap_or(false)
    }

    pub fn request_reveal(env: Env, caller: Address, handle: BytesN<32>) -> u64 {
        Self::require_access(&env, &handle, &caller);
        let request_id = Self::reveal_count(env.clone()) + 1;
        env.storage()
            .persistent()
            .set(&MockFheKey::RevealCounter, &request_id);
        env.storage()
            .persistent()
            .set(&MockFheKey::Reveal(request_id), &handle);
        request_id
    }

    pub fn verify_reveal(env: Env, request_id: u64, cleartext: u64, proof: Bytes) -> bool {
        let handle: Option<BytesN<32>> = env
            .storage()
            .persistent()
            .get(&MockFheKey::Reveal(request_id));
        match handle {
            Some(handle) => {
                Self::value_of(&env, &handle) == cleartext
                    && proof == Self::sign_reveal(env.clone(), request_id, cleartext)
            }
            None => false,
        }
    }

    fn next_handle(env: &Env, tag: u8) -> BytesN<32> {
        let counter: u64 = env
            .storage()
            .persistent()
            .get(&MockFheKey::Counter)
            .unwrap_or(0)
            + 1;
        env.storage().persistent().set(&MockFheKey::Counter, &counter);

        let mut raw = [0u8; 32];
        raw[0] = tag;
        raw[24..].copy_from_slice(&counter.to_be_bytes());
        BytesN::from_array(env, &raw)
    }

    fn store(env: &Env, value: u64, owner: &Address) -> BytesN<32> {
        let handle = Self::next_handle(env, HANDLE_TAG);
        env.storage()
            .persistent()
            .set(&MockFheKey::Value(handle.clone()), &value);
        env.storage()
            .persistent()
            .set(&MockFheKey::Acl(handle.clone(), owner.clone()), &true);
        handle
    }

    fn value_of(env: &Env, handle: &BytesN<32>) -> u64 {
        env.storage()
            .persistent()
            .get(&MockFheKey::Value(handle.clone()))
            .unwrap_or_else(|| panic_with_error!(env, MockError::UnknownHandle))
    }

    fn require_access(env: &Env, handle: &BytesN<32>, account: &Address) {
        if !Self::is_allowed(env.clone(), handle.clone(), account.clone()) {
            panic_with_error!(env, MockError::AccessDenied);
        }
    }

    fn operands(env: &Env, caller: &Address, lhs: &BytesN<32>, rhs: &BytesN<32>) -> (u64, u64) {
        Self::require_access(env, lhs, caller);
        Self::require_access(env, rhs, caller);
        (Self::value_of(env, lhs), Self::value_of(env, rhs))
    }
}

/// One ledger movement, recorded in call order.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct MockTransfer {
    pub from: Address,
    pub to: Address,
    pub amount: u64,
}

#[derive(Clone)]
#[contracttype]
enum MockTokenKey {
    Executor,
    RequireSelfAccess,
    Balance(Address),
    Operator(Address, Address),
    Transfers,
}

#[contract]
pub struct MockConfidentialToken;

#[contractimpl]
impl MockConfidentialToken {
    /// `require_self_access` makes the ledger insist on its own grant on
    /// every amount handle, like ledgers that compute on the amount directly.
    pub fn init(env: Env, executor: Address, require_self_access: bool) {
        env.storage()
            .instance()
            .set(&MockTokenKey::Executor, &executor);
        env.storage()
            .instance()
            .set(&MockTokenKey::RequireSelfAccess, &require_self_access);
    }

    pub fn mint(env: Env, to: Address, amount: u64) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&MockTokenKey::Balance(to), &(balance + amount));
    }

    pub fn balance(env: Env, account: Address) -> u64 {
        env.storage()
            .persistent()
            .get(&MockTokenKey::Balance(account))
            .unwrap_or(0)
    }

    pub fn set_operator(env: Env, holder: Address, operator: Address, approved: bool) {
        holder.require_auth();
        env.storage()
            .persistent()
            .set(&MockTokenKey::Operator(holder, operator), &approved);
    }

    pub fn is_operator(env: Env, holder: Address, operator: Address) -> bool {
        env.storage()
            .persistent()
            .get(&MockTokenKey::Operator(holder, operator))
            .unwrap_or(false)
    }

    pub fn transfers(env: Env) -> Vec<MockTransfer> {
        env.storage()
            .persistent()
            .get(&MockTokenKey::Transfers)
            .unwrap_or(Vec::new(&env))
    }

    pub fn confidential_transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: BytesN<32>,
    ) -> BytesN<32> {
        spender.require_auth();
        if spender != from && !Self::is_operator(env.clone(), from.clone(), spender.clone()) {
            panic_with_error!(&env, MockError::NotOperator);
        }
        Self::move_balance(&env, &spender, &from, &to, amount)
    }

    pub fn confidential_transfer(
        env: Env,
        from: Address,
        to: Address,
        amount: BytesN<32>,
    ) -> BytesN<32> {
        from.require_auth();
        Self::move_balance(&env, &from, &from, &to, amount)
    }

    fn move_balance(
        env: &Env,
        actor: &Address,
        from: &Address,
        to: &Address,
        amount: BytesN<32>,
    ) -> BytesN<32> {
        let executor: Address = env
            .storage()
            .instance()
            .get(&MockTokenKey::Executor)
            .unwrap_or_else(|| panic_with_error!(env, MockError::NotInitialized));
        let fhe = FheExecutorClient::new(env, &executor);

        if !fhe.is_allowed(&amount, actor) {
            panic_with_error!(env, MockError::AccessDenied);
        }
        let require_self_access: bool = env
            .storage()
            .instance()
            .get(&MockTokenKey::RequireSelfAccess)
            .unwrap_or(false);
        if require_self_access && !fhe.is_allowed(&amount, &env.current_contract_address()) {
            panic_with_error!(env, MockError::AccessDenied);
        }

        let value = MockFheExecutorClient::new(env, &executor).plaintext(&amount);
        let from_balance = Self::balance(env.clone(), from.clone());
        if from_balance < value {
            panic_with_error!(env, MockError::InsufficientBalance);
        }
        env.storage()
            .persistent()
            .set(&MockTokenKey::Balance(from.clone()), &(from_balance - value));
        let to_balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&MockTokenKey::Balance(to.clone()), &(to_balance + value));

        let mut log = Self::transfers(env.clone());
        log.push_back(MockTransfer {
            from: from.clone(),
            to: to.clone(),
            amount: value,
        });
        env.storage().persistent().set(&MockTokenKey::Transfers, &log);

        amount
    }
}
