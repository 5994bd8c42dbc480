//! # Confidential Common
//!
//! Building blocks shared by the confidential batcher and the confidential
//! wrapper contracts:
//!
//! - **Errors**: one error vocabulary for every confidential contract
//! - **Interfaces**: clients for the encrypted-value executor and the
//!   confidential token ledger
//! - **Administration**: two-step ownership and a call-scoped reentrancy lock
//! - **Test doubles**: mock executor and ledger contracts behind the
//!   `testutils` feature

#![no_std]

pub mod address;
pub mod error;
pub mod fhe;
pub mod guard;
pub mod ownable;
pub mod token;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use crate::address::{is_zero, require_non_zero, zero_address};
pub use crate::error::ConfidentialError;
pub use crate::fhe::FheExecutorClient;
pub use crate::guard::non_reentrant;
pub use crate::token::ConfidentialTokenClient;
