//! Manifest validation
//!
//! Conflicts are errors. Unusual account IDs or service principals are only
//! warnings: the API decides what it accepts.

use anyhow::Result;
use organizations::{AccountResolver, physical_id};
use regex::Regex;
use std::collections::HashMap;

use crate::Context;
use crate::config::Manifest;
use crate::ui;

/// Findings for one manifest
#[derive(Debug, Default)]
pub struct Report {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn run(ctx: &Context) -> Result<()> {
    let manifest = Manifest::load(ctx.manifest.as_deref())?;
    let report = check(&manifest)?;

    for warning in &report.warnings {
        ui::warn(warning);
    }
    for error in &report.errors {
        ui::error(error);
    }

    if !report.is_valid() {
        anyhow::bail!(
            "Manifest has {}",
            ui::plural(report.errors.len(), "error")
        );
    }

    if !ctx.quiet {
        ui::success(&format!(
            "{} valid ({})",
            ui::plural(manifest.delegations.len(), "delegation"),
            ui::plural(report.warnings.len(), "warning")
        ));
    }
    Ok(())
}

/// Check a manifest for conflicts and suspicious values
pub fn check(manifest: &Manifest) -> Result<Report> {
    let account_id = Regex::new(r"^\d{12}$")?;
    let principal = Regex::new(r"^[a-z0-9][a-z0-9.-]*\.amazonaws\.com$")?;

    let mut report = Report::default();
    let directory = manifest.directory();
    let mut seen_ids: HashMap<&str, usize> = HashMap::new();
    let mut seen_physical: HashMap<String, &str> = HashMap::new();

    for (alias, id) in &manifest.accounts {
        if !account_id.is_match(id) {
            report
                .warnings
                .push(format!("Account alias {alias} maps to '{id}', not a 12-digit account id"));
        }
    }

    for delegation in &manifest.delegations {
        let id = delegation.id.as_str();

        *seen_ids.entry(id).or_default() += 1;
        if seen_ids[id] == 2 {
            report.errors.push(format!("Duplicate delegation id: {id}"));
        }

        if delegation.service_principal.is_empty() {
            report.warnings.push(format!("{id}: empty service principal"));
        } else if !principal.is_match(&delegation.service_principal) {
            report.warnings.push(format!(
                "{id}: '{}' does not look like a service principal",
                delegation.service_principal
            ));
        }

        let account = match directory.resolve(&delegation.account) {
            Ok(account) => account,
            Err(e) => {
                report.errors.push(format!("{id}: {e}"));
                continue;
            }
        };

        if account.alias.is_none() && !account_id.is_match(&account.account_id) {
            report.warnings.push(format!(
                "{id}: '{}' is not a 12-digit account id",
                account.account_id
            ));
        }

        let physical = physical_id(&account.account_id, &delegation.service_principal);
        if let Some(other) = seen_physical.get(&physical) {
            report.errors.push(format!(
                "{id}: registers {physical}, already declared by {other}"
            ));
        } else {
            seen_physical.insert(physical, id);
        }
    }

    log::debug!(
        "Validation found {} errors, {} warnings",
        report.errors.len(),
        report.warnings.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    fn check_toml(toml: &str) -> Report {
        check(&Manifest::parse(toml, ConfigFormat::Toml).unwrap()).unwrap()
    }

    #[test]
    fn test_clean_manifest() {
        let report = check_toml(
            r#"
[accounts]
security = "123456789012"

[[delegations]]
id = "GuardDutyAdmin"
account = "security"
service_principal = "guardduty.amazonaws.com"
"#,
        );
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_conflicts_are_errors() {
        let report = check_toml(
            r#"
[accounts]
security = "123456789012"

[[delegations]]
id = "A"
account = "security"
service_principal = "guardduty.amazonaws.com"

[[delegations]]
id = "A"
account = "123456789012"
service_principal = "guardduty.amazonaws.com"

[[delegations]]
id = "C"
account = "billing"
service_principal = "macie.amazonaws.com"
"#,
        );

        assert_eq!(report.errors.len(), 3);
        assert!(report.errors.iter().any(|e| e.contains("Duplicate delegation id: A")));
        assert!(report.errors.iter().any(|e| e.contains("already declared by A")));
        assert!(report.errors.iter().any(|e| e.contains("unknown account: billing")));
    }

    #[test]
    fn test_suspicious_values_are_warnings() {
        let report = check_toml(
            r#"
[accounts]
short = "42"

[[delegations]]
id = "Empty"
account = "123456789012"
service_principal = ""

[[delegations]]
id = "Odd"
account = "1234"
service_principal = "GuardDuty"
"#,
        );

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 4);
    }
}
