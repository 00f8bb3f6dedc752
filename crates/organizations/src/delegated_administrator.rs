//! Delegated administrator registration
//!
//! Enables a member account to administer the organization features of an
//! AWS service. The account gets read-only access to organization data; it
//! still needs IAM permissions to administer the service itself.
//!
//! Only services that support delegated administration accept the call.

use crate::account::Account;
use declarative::{CustomResource, PhysicalResourceId, SdkCall};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SDK service name of the organization-management API
pub const SERVICE: &str = "Organizations";

/// Operation run when the registration is created
pub const REGISTER_ACTION: &str = "registerDelegatedAdministrator";

/// Operation run when the registration is deleted
pub const DEREGISTER_ACTION: &str = "deregisterDelegatedAdministrator";

/// Region serving the organization-management API
pub const GLOBAL_REGION: &str = "us-east-1";

/// Physical ID of a registration: `<account id>:<service principal>`
pub fn physical_id(account_id: &str, service_principal: &str) -> String {
    format!("{account_id}:{service_principal}")
}

/// Build the create and delete calls for a registration
///
/// Both calls carry identical parameters and region; only the action
/// differs, and only the create call declares a physical ID. Inputs are
/// passed through verbatim.
pub fn build_registration_actions(account_id: &str, service_principal: &str) -> (SdkCall, SdkCall) {
    let call = |action: &str| {
        SdkCall::new(SERVICE, action)
            .with_region(GLOBAL_REGION)
            .with_parameter("AccountId", account_id)
            .with_parameter("ServicePrincipal", service_principal)
    };

    let create = call(REGISTER_ACTION)
        .with_physical_resource_id(PhysicalResourceId::of(physical_id(account_id, service_principal)));
    let delete = call(DEREGISTER_ACTION);

    (create, delete)
}

/// A member account registered as delegated administrator for a service
///
/// Immutable once built. There is no update call: a change of account or
/// principal changes the physical ID, so the engine replaces the resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedAdministratorRegistration {
    account_id: String,
    service_principal: String,
    create: SdkCall,
    delete: SdkCall,
}

impl DelegatedAdministratorRegistration {
    /// Build a registration. Performs no I/O and no validation.
    pub fn new(account_id: impl Into<String>, service_principal: impl Into<String>) -> Self {
        let account_id = account_id.into();
        let service_principal = service_principal.into();
        let (create, delete) = build_registration_actions(&account_id, &service_principal);

        Self {
            account_id,
            service_principal,
            create,
            delete,
        }
    }

    /// Build a registration for a resolved account
    pub fn for_account(account: &Account, service_principal: impl Into<String>) -> Self {
        Self::new(account.account_id.clone(), service_principal)
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn service_principal(&self) -> &str {
        &self.service_principal
    }

    /// `<account id>:<service principal>`
    pub fn physical_resource_id(&self) -> String {
        physical_id(&self.account_id, &self.service_principal)
    }

    pub fn create_action(&self) -> &SdkCall {
        &self.create
    }

    pub fn delete_action(&self) -> &SdkCall {
        &self.delete
    }
}

impl fmt::Display for DelegatedAdministratorRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} administers {}",
            self.account_id, self.service_principal
        )
    }
}

impl CustomResource for DelegatedAdministratorRegistration {
    fn id(&self) -> String {
        self.physical_resource_id()
    }

    fn description(&self) -> String {
        format!(
            "Register {} as delegated administrator for {}",
            self.account_id, self.service_principal
        )
    }

    fn resource_type(&self) -> &'static str {
        "delegation"
    }

    fn on_create(&self) -> Option<SdkCall> {
        Some(self.create.clone())
    }

    fn on_delete(&self) -> Option<SdkCall> {
        Some(self.delete.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{CustomResourceExt, LifecycleEvent};
    use serde_json::json;

    const ACCOUNT: &str = "123456789012";
    const PRINCIPAL: &str = "guardduty.amazonaws.com";

    #[test]
    fn test_guardduty_scenario() {
        let registration = DelegatedAdministratorRegistration::new(ACCOUNT, PRINCIPAL);
        let create = registration.create_action();

        assert_eq!(create.service, "Organizations");
        assert_eq!(create.action, "registerDelegatedAdministrator");
        assert_eq!(create.parameters["AccountId"], json!("123456789012"));
        assert_eq!(create.parameters["ServicePrincipal"], json!("guardduty.amazonaws.com"));
        assert_eq!(create.physical_id(), Some("123456789012:guardduty.amazonaws.com"));
        assert_eq!(
            registration.physical_resource_id(),
            "123456789012:guardduty.amazonaws.com"
        );
    }

    #[test]
    fn test_delete_action_deregisters() {
        let registration = DelegatedAdministratorRegistration::new(ACCOUNT, PRINCIPAL);
        let delete = registration.delete_action();

        assert_eq!(delete.service, SERVICE);
        assert_eq!(delete.action, DEREGISTER_ACTION);
        assert_eq!(delete.physical_resource_id, None);
    }

    #[test]
    fn test_actions_share_parameters_and_region() {
        for (account, principal) in [
            (ACCOUNT, PRINCIPAL),
            ("000000000001", "securityhub.amazonaws.com"),
            ("x", ""),
        ] {
            let (create, delete) = build_registration_actions(account, principal);

            assert_eq!(
                serde_json::to_string(&create.parameters).unwrap(),
                serde_json::to_string(&delete.parameters).unwrap()
            );
            assert_eq!(create.parameters.len(), 2);
            assert_eq!(create.region.as_deref(), Some(GLOBAL_REGION));
            assert_eq!(delete.region.as_deref(), Some(GLOBAL_REGION));

            let stripped = SdkCall {
                action: create.action.clone(),
                physical_resource_id: None,
                ..delete.clone()
            };
            assert_eq!(stripped, SdkCall { physical_resource_id: None, ..create.clone() });
        }
    }

    #[test]
    fn test_construction_is_repeatable() {
        let a = DelegatedAdministratorRegistration::new(ACCOUNT, PRINCIPAL);
        let b = DelegatedAdministratorRegistration::new(ACCOUNT, PRINCIPAL);
        assert_eq!(a, b);
        assert_eq!(a.calls(), b.calls());
    }

    #[test]
    fn test_empty_principal_still_constructs() {
        let registration = DelegatedAdministratorRegistration::new(ACCOUNT, "");
        assert_eq!(registration.physical_resource_id(), "123456789012:");
        assert_eq!(registration.create_action().parameters["ServicePrincipal"], json!(""));
    }

    #[test]
    fn test_custom_resource_contract() {
        let registration =
            DelegatedAdministratorRegistration::for_account(&Account::new(ACCOUNT), PRINCIPAL);

        assert!(registration.call_for(LifecycleEvent::Update).is_none());
        assert!(registration.replaces_on_change());
        assert_eq!(registration.resource_type(), "delegation");
        assert_eq!(
            registration.physical_id().as_deref(),
            Some("123456789012:guardduty.amazonaws.com")
        );

        let policy = registration.policy();
        assert!(policy.allows("organizations:RegisterDelegatedAdministrator"));
        assert!(policy.allows("organizations:DeregisterDelegatedAdministrator"));
        assert!(policy.statements.iter().all(|s| s.resources == ["*"]));
    }
}
