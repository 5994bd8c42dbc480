//! Two-step ownership.
//!
//! The owner nominates a successor, and the successor must accept before
//! control moves. Every owner-gated entry point goes through
//! [`require_owner`].

use soroban_sdk::{contracttype, log, symbol_short, Address, Env};

use crate::{require_non_zero, ConfidentialError};

#[derive(Clone)]
#[contracttype]
enum OwnableKey {
    Owner,
    PendingOwner,
}

pub struct OwnershipEvents;

impl OwnershipEvents {
    pub fn transfer_started(env: &Env, owner: &Address, pending: &Address) {
        let topics = (symbol_short!("owner"), symbol_short!("started"));
        env.events()
            .publish(topics, (owner.clone(), pending.clone()));
    }

    pub fn transfer_accepted(env: &Env, previous: &Address, new_owner: &Address) {
        let topics = (symbol_short!("owner"), symbol_short!("accepted"));
        env.events()
            .publish(topics, (previous.clone(), new_owner.clone()));
    }

    pub fn transfer_cancelled(env: &Env, owner: &Address, pending: &Address) {
        let topics = (symbol_short!("owner"), symbol_short!("cancelled"));
        env.events()
            .publish(topics, (owner.clone(), pending.clone()));
    }
}

/// Stores the first owner. Doubles as the contract's initialization marker.
pub fn initialize_owner(env: &Env, owner: &Address) -> Result<(), ConfidentialError> {
    if is_initialized(env) {
        return Err(ConfidentialError::AlreadyInitialized);
    }
    require_non_zero(env, owner)?;
    env.storage().instance().set(&OwnableKey::Owner, owner);
    Ok(())
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&OwnableKey::Owner)
}

pub fn owner(env: &Env) -> Result<Address, ConfidentialError> {
    env.storage()
        .instance()
        .get(&OwnableKey::Owner)
        .ok_or(ConfidentialError::NotInitialized)
}

pub fn pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OwnableKey::PendingOwner)
}

/// Authenticates `caller` and checks that it is the owner.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), ConfidentialError> {
    caller.require_auth();
    if *caller != owner(env)? {
        return Err(ConfidentialError::Unauthorized);
    }
    Ok(())
}

/// Nominates `new_owner`. Replaces any earlier nomination.
pub fn begin_transfer(
    env: &Env,
    caller: &Address,
    new_owner: &Address,
) -> Result<(), ConfidentialError> {
    require_owner(env, caller)?;
    require_non_zero(env, new_owner)?;

    env.storage()
        .instance()
        .set(&OwnableKey::PendingOwner, new_owner);
    OwnershipEvents::transfer_started(env, caller, new_owner);
    Ok(())
}

/// Completes a transfer. Only the nominated address may accept.
/// Returns the previous owner.
pub fn accept_transfer(env: &Env, caller: &Address) -> Result<Address, ConfidentialError> {
    caller.require_auth();
    let pending = pending_owner(env).ok_or(ConfidentialError::Unauthorized)?;
    if *caller != pending {
        return Err(ConfidentialError::Unauthorized);
    }

    let previous = owner(env)?;
    env.storage().instance().set(&OwnableKey::Owner, caller);
    env.storage().instance().remove(&OwnableKey::PendingOwner);

    log!(env, "ownership moved from {} to {}", previous, caller.clone());
    OwnershipEvents::transfer_accepted(env, &previous, caller);
    Ok(previous)
}

pub fn cancel_transfer(env: &Env, caller: &Address) -> Result<(), ConfidentialError> {
    require_owner(env, caller)?;
    let pending = pending_owner(env).ok_or(ConfidentialError::NoPendingOwner)?;

    env.storage().instance().remove(&OwnableKey::PendingOwner);
    OwnershipEvents::transfer_cancelled(env, caller, &pending);
    Ok(())
}
