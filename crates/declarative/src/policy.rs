//! Permission requirements inferred from SDK calls

use crate::types::SdkCall;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Grants the calls on every resource
pub const ANY_RESOURCE: &[&str] = &["*"];

/// IAM policy language version used in rendered documents
pub const POLICY_VERSION: &str = "2012-10-17";

/// Statement effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
}

/// A single policy statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: Effect,
    #[serde(rename = "Action")]
    pub actions: Vec<String>,
    #[serde(rename = "Resource")]
    pub resources: Vec<String>,
}

/// Permissions the execution engine needs to run a resource's calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomResourcePolicy {
    pub statements: Vec<PolicyStatement>,
}

impl CustomResourcePolicy {
    /// One allow statement per distinct call, scoped to `resources`
    pub fn from_sdk_calls<'a>(
        calls: impl IntoIterator<Item = &'a SdkCall>,
        resources: &[&str],
    ) -> Self {
        let mut actions: Vec<String> = Vec::new();
        for call in calls {
            let action = iam_action(&call.service, &call.action);
            if !actions.contains(&action) {
                actions.push(action);
            }
        }

        let resources: Vec<String> = resources.iter().map(|r| (*r).to_string()).collect();
        let statements = actions
            .into_iter()
            .map(|action| PolicyStatement {
                effect: Effect::Allow,
                actions: vec![action],
                resources: resources.clone(),
            })
            .collect();

        Self { statements }
    }

    /// All actions granted by this policy
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.statements
            .iter()
            .filter(|s| s.effect == Effect::Allow)
            .flat_map(|s| s.actions.iter().map(String::as_str))
    }

    /// Check whether an action is allowed
    pub fn allows(&self, action: &str) -> bool {
        self.actions().any(|a| a == action)
    }

    /// Render as an IAM policy document
    pub fn to_document(&self) -> Value {
        json!({
            "Version": POLICY_VERSION,
            "Statement": self.statements,
        })
    }
}

/// Map an SDK service/operation pair to its IAM action
///
/// `("Organizations", "registerDelegatedAdministrator")` becomes
/// `organizations:RegisterDelegatedAdministrator`.
pub fn iam_action(service: &str, action: &str) -> String {
    let prefix = match service {
        "CloudWatchLogs" => "logs".to_string(),
        "CognitoIdentityServiceProvider" => "cognito-idp".to_string(),
        "ELBv2" => "elasticloadbalancing".to_string(),
        "StepFunctions" => "states".to_string(),
        other => other.to_lowercase(),
    };

    let mut chars = action.chars();
    let operation = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };

    format!("{prefix}:{operation}")
}
