//! Call-scoped reentrancy lock.
//!
//! The flag lives in instance storage. A returning call always clears it;
//! an aborting call has every storage write rolled back by the host, the
//! flag included.

use soroban_sdk::{contracttype, Env};

use crate::ConfidentialError;

#[derive(Clone)]
#[contracttype]
enum GuardKey {
    Entered,
}

pub fn is_entered(env: &Env) -> bool {
    env.storage().instance().has(&GuardKey::Entered)
}

pub fn enter(env: &Env) -> Result<(), ConfidentialError> {
    if is_entered(env) {
        return Err(ConfidentialError::Reentrancy);
    }
    env.storage().instance().set(&GuardKey::Entered, &true);
    Ok(())
}

pub fn exit(env: &Env) {
    env.storage().instance().remove(&GuardKey::Entered);
}

/// Runs `body` while holding the lock.
pub fn non_reentrant<T>(
    env: &Env,
    body: impl FnOnce() -> Result<T, ConfidentialError>,
) -> Result<T, ConfidentialError> {
    enter(env)?;
    let outcome = body();
    exit(env);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{contract, contractimpl};

    #[contract]
    pub struct GuardHost;

    #[contractimpl]
    impl GuardHost {
        pub fn ping() -> u32 {
            1
        }
    }

    #[test]
    fn test_lock_released_after_success() {
        let env = Env::default();
        let host = env.register(GuardHost, ());

        env.as_contract(&host, || {
            let value = non_reentrant(&env, || Ok(7u32)).unwrap();
            assert_eq!(value, 7);
            assert!(!is_entered(&env));
        });
    }

    #[test]
    fn test_lock_released_after_error() {
        let env = Env::default();
        let host = env.register(GuardHost, ());

        env.as_contract(&host, || {
            let outcome: Result<(), _> =
                non_reentrant(&env, || Err(ConfidentialError::EmptyBatch));
            assert_eq!(outcome, Err(ConfidentialError::EmptyBatch));
            assert!(!is_entered(&env));
        });
    }

    #[test]
    fn test_nested_entry_rejected() {
        let env = Env::default();
        let host = env.register(GuardHost, ());

        env.as_contract(&host, || {
            let outcome = non_reentrant(&env, || non_reentrant(&env, || Ok(())));
            assert_eq!(outcome, Err(ConfidentialError::Reentrancy));
            assert!(!is_entered(&env));
        });
    }
}
