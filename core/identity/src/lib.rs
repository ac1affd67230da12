//! Identity workflows for credvault.
//!
//! This module provides:
//! - Registration: creates an identity record whose personal fields are
//!   encrypted under a key derived from the vault password
//! - Login: verifies the account secret and issues a session
//! - Route guard: proves vault-password knowledge by decrypting the
//!   stored verifier
//!
//! # Architecture
//! Each workflow invocation is stateless and independent. Collaborators
//! (record store, session issuer, crypto components) are injected at
//! construction, and the memory-hard derivations run on the blocking pool
//! so they never stall an async scheduler thread.

pub mod config;
pub mod guard;
pub mod manager;
pub mod session;

pub use config::IdentityConfig;
pub use guard::{RouteGuard, VaultGate};
pub use manager::{IdentityManager, LoginRequest, NewAccount};
pub use session::{Session, SessionIssuer, SessionToken, StaticSessionIssuer, VaultAccess};
