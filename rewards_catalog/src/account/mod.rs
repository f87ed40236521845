//! Account records and account management.
//!
//! Accounts are owned and mutated here; the authentication core only reads
//! them through the credential store. The stored password field is always a
//! one-way digest, never plaintext - [`Account`] deliberately does not
//! implement `Serialize`, responses go through [`AccountPublic`].

pub mod manager;
pub mod models;

pub use manager::{AccountError, AccountManager, AccountResult};
pub use models::{
    Account, AccountId, AccountPatch, AccountPublic, NewAccount, Role, STATUS_ACTIVE,
    STATUS_INACTIVE,
};
