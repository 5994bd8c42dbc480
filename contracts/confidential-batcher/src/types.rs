//! Data types and events for confidential batch transfers.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, Vec};

/// Bounds and behavior of one deployment flavor.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct BatcherPolicy {
    /// Smallest value the owner may set as maximum batch size
    pub min_batch_size: u32,
    /// Largest value the owner may set as maximum batch size
    pub max_batch_size: u32,
    /// Maximum batch size at initialization
    pub default_batch_size: u32,
    /// Compute an encrypted total for every batch
    pub emit_total: bool,
    /// Grant the token contract access to every amount handle
    pub grant_token_access: bool,
}

impl BatcherPolicy {
    /// Ledgers that only check the spender's grant.
    pub fn standard() -> Self {
        BatcherPolicy {
            min_batch_size: 10,
            max_batch_size: 100,
            default_batch_size: 50,
            emit_total: true,
            grant_token_access: false,
        }
    }

    /// Ledgers that compute on the amount handle themselves.
    pub fn erc7984() -> Self {
        BatcherPolicy {
            min_batch_size: 2,
            max_batch_size: 10,
            default_batch_size: 10,
            emit_total: true,
            grant_token_access: true,
        }
    }

    pub fn upgradeable() -> Self {
        BatcherPolicy {
            min_batch_size: 2,
            max_batch_size: 50,
            default_batch_size: 50,
            emit_total: true,
            grant_token_access: true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_batch_size >= 1
            && self.min_batch_size <= self.default_batch_size
            && self.default_batch_size <= self.max_batch_size
    }

    pub fn allows(&self, size: u32) -> bool {
        size >= self.min_batch_size && size <= self.max_batch_size
    }
}

/// Outcome of a committed batch.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct BatchReceipt {
    pub batch_id: u64,
    pub recipient_count: u32,
    /// Encrypted sum of every amount sent, when the policy computes it
    pub total: Option<BytesN<32>>,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    FheExecutor,
    Policy,
    MaxBatchSize,
    TotalBatches,
    TotalTransfers,
}

pub struct BatcherEvents;

impl BatcherEvents {
    pub fn batch_sent(
        env: &Env,
        batch_id: u64,
        caller: &Address,
        token: &Address,
        recipients: &Vec<Address>,
        total: &Option<BytesN<32>>,
    ) {
        let topics = (symbol_short!("batch"), symbol_short!("sent"), batch_id);
        env.events().publish(
            topics,
            (
                caller.clone(),
                token.clone(),
                recipients.clone(),
                total.clone(),
            ),
        );
    }

    pub fn rescued(env: &Env, token: &Address, to: &Address, amount: &BytesN<32>) {
        let topics = (symbol_short!("rescue"), token.clone());
        env.events().publish(topics, (to.clone(), amount.clone()));
    }

    pub fn max_batch_size_changed(env: &Env, old_size: u32, new_size: u32) {
        let topics = (symbol_short!("config"), symbol_short!("maxbatch"));
        env.events().publish(topics, (old_size, new_size));
    }
}
