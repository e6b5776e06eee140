//! Operator authentication.
//!
//! Handlers never look at credentials directly: they receive a
//! [`crate::session::Session`] built through a [`CredentialCheck`].

pub mod password;

use crate::config::Config;
use std::collections::BTreeMap;

pub trait CredentialCheck {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// The single built-in admin account, used while no accounts are configured.
pub struct BuiltinAdmin;

impl BuiltinAdmin {
    const USERNAME: &'static str = "admin";
    const PASSWORD: &'static str = "flb23";
}

impl CredentialCheck for BuiltinAdmin {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == Self::USERNAME && password == Self::PASSWORD
    }
}

/// Accounts with argon2 password hashes.
pub struct HashedAccounts {
    accounts: BTreeMap<String, String>,
}

impl HashedAccounts {
    pub fn new(accounts: BTreeMap<String, String>) -> Self {
        Self { accounts }
    }
}

impl CredentialCheck for HashedAccounts {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.accounts
            .get(username)
            .is_some_and(|hash| password::verify_password(password, hash))
    }
}

/// Pick the credential backend for a configuration.
pub fn backend_for(cfg: &Config) -> Box<dyn CredentialCheck> {
    if cfg.accounts.is_empty() {
        Box::new(BuiltinAdmin)
    } else {
        Box::new(HashedAccounts::new(cfg.accounts.clone()))
    }
}
