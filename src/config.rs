//! Registrations manifest
//!
//! ```toml
//! [stack]
//! name = "OrganizationDelegations"
//!
//! [accounts]
//! security = "123456789012"
//!
//! [[delegations]]
//! id = "GuardDutyAdmin"
//! account = "security"
//! service_principal = "guardduty.amazonaws.com"
//! ```

use anyhow::{Context, Result};
use declarative::Stack;
use organizations::{AccountDirectory, AccountResolver, DelegatedAdministratorRegistration};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::paths;

/// Manifest file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension (TOML unless `.json`)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub stack: StackConfig,

    /// Account aliases (alias -> account id)
    #[serde(default)]
    pub accounts: BTreeMap<String, String>,

    #[serde(default)]
    pub delegations: Vec<Delegation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    #[serde(default = "default_stack_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            name: default_stack_name(),
            description: None,
        }
    }
}

fn default_stack_name() -> String {
    "DelegatedAdministrators".to_string()
}

/// One delegated administrator registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    /// Construct ID, unique within the manifest
    pub id: String,
    /// Account alias or literal account ID
    pub account: String,
    pub service_principal: String,
}

impl Manifest {
    /// Load the manifest from an explicit path or the default location
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = paths::manifest_path(explicit)?;

        if !path.exists() {
            anyhow::bail!(
                "Manifest not found: {}\nCreate it or pass --manifest <PATH>",
                path.display()
            );
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read manifest: {}", path.display()))?;

        log::debug!("Loaded manifest from {}", path.display());
        Self::parse(&content, ConfigFormat::from_path(&path))
            .with_context(|| format!("Invalid manifest: {}", path.display()))
    }

    /// Parse manifest content
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => toml::from_str(content).context("Invalid TOML format"),
            ConfigFormat::Json => serde_json::from_str(content).context("Invalid JSON format"),
        }
    }

    /// Account resolver built from the `[accounts]` table
    pub fn directory(&self) -> AccountDirectory {
        AccountDirectory::from(self.accounts.clone())
    }

    /// Resolve every delegation into a registration, in manifest order
    pub fn registrations(&self) -> Result<Vec<(String, DelegatedAdministratorRegistration)>> {
        let directory = self.directory();
        self.delegations
            .iter()
            .map(|d| -> Result<(String, DelegatedAdministratorRegistration)> {
                let account = directory
                    .resolve(&d.account)
                    .with_context(|| format!("Delegation {}", d.id))?;
                Ok((
                    d.id.clone(),
                    DelegatedAdministratorRegistration::for_account(
                        &account,
                        d.service_principal.clone(),
                    ),
                ))
            })
            .collect()
    }

    /// Build the stack of registrations
    pub fn build_stack(&self) -> Result<Stack> {
        let mut stack = Stack::new(self.stack.name.clone());
        if let Some(description) = &self.stack.description {
            stack = stack.with_description(description.clone());
        }

        for (id, registration) in self.registrations()? {
            stack.add(id, Box::new(registration))?;
        }
        Ok(stack)
    }
}
