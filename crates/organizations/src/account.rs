//! Member accounts and account resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A member account of the organization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier, passed through unvalidated
    pub account_id: String,
    /// Alias it was resolved from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Account {
    /// Account referenced by its literal ID
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            alias: None,
        }
    }

    /// Account known under an alias
    pub fn with_alias(account_id: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            alias: Some(alias.into()),
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} ({})", alias, self.account_id),
            None => write!(f, "{}", self.account_id),
        }
    }
}

/// Supplies account IDs for account references
pub trait AccountResolver {
    /// Resolve a reference (alias or literal ID) to an account
    fn resolve(&self, reference: &str) -> Result<Account>;
}

/// Resolver backed by an alias table
///
/// Aliases win over literal IDs. References made only of ASCII digits
/// that are not aliases resolve to themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDirectory {
    aliases: BTreeMap<String, String>,
}

impl From<BTreeMap<String, String>> for AccountDirectory {
    fn from(aliases: BTreeMap<String, String>) -> Self {
        Self { aliases }
    }
}

impl AccountResolver for AccountDirectory {
    fn resolve(&self, reference: &str) -> Result<Account> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(Error::EmptyReference);
        }

        if let Some(account_id) = self.aliases.get(reference) {
            log::debug!("Resolved account alias {} to {}", reference, account_id);
            return Ok(Account::with_alias(account_id.clone(), reference));
        }

        if reference.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Account::new(reference));
        }

        Err(Error::UnknownAccount(reference.to_string()))
    }
}
