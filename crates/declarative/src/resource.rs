//! Resource trait for declarative custom resources
//!
//! A custom resource declares which SDK call the execution engine runs
//! for each lifecycle event. It never runs the calls itself.

use crate::policy::{ANY_RESOURCE, CustomResourcePolicy};
use crate::types::{LifecycleEvent, SdkCall};
use std::fmt;

/// Core trait for declarative custom resources
///
/// Implementors describe:
/// - Identity (id, description, type)
/// - The SDK call for each lifecycle event
/// - The permissions those calls need
///
/// # Example
///
/// ```ignore
/// use declarative::{CustomResource, SdkCall, PhysicalResourceId};
///
/// #[derive(Debug)]
/// struct ServiceAccess { principal: String }
///
/// impl CustomResource for ServiceAccess {
///     fn id(&self) -> String { self.principal.clone() }
///     fn description(&self) -> String { format!("Trusted access for {}", self.principal) }
///
///     fn on_create(&self) -> Option<SdkCall> {
///         Some(
///             SdkCall::new("Organizations", "enableAWSServiceAccess")
///                 .with_physical_resource_id(PhysicalResourceId::of(&self.principal))
///                 .with_parameter("ServicePrincipal", self.principal.as_str()),
///         )
///     }
///
///     fn on_delete(&self) -> Option<SdkCall> {
///         Some(
///             SdkCall::new("Organizations", "disableAWSServiceAccess")
///                 .with_parameter("ServicePrincipal", self.principal.as_str()),
///         )
///     }
/// }
/// ```
pub trait CustomResource: Send + Sync + fmt::Debug {
    /// Stable identifier for this resource within its type
    fn id(&self) -> String;

    /// Human-readable description of what this resource does
    fn description(&self) -> String;

    /// Resource type category
    ///
    /// Used for target filtering, e.g. "delegation".
    fn resource_type(&self) -> &'static str {
        "custom"
    }

    /// Call run when the resource is first realized
    fn on_create(&self) -> Option<SdkCall>;

    /// Call run when properties change in place
    ///
    /// Resources without an update call are replaced by the engine instead.
    fn on_update(&self) -> Option<SdkCall> {
        None
    }

    /// Call run when the resource is torn down
    fn on_delete(&self) -> Option<SdkCall>;

    /// Permissions needed to run the declared calls
    ///
    /// Defaults to the calls' own actions on any resource.
    fn policy(&self) -> CustomResourcePolicy {
        let calls = self.calls();
        CustomResourcePolicy::from_sdk_calls(calls.iter().map(|(_, call)| call), ANY_RESOURCE)
    }

    /// Call for a specific lifecycle event
    fn call_for(&self, event: LifecycleEvent) -> Option<SdkCall> {
        match event {
            LifecycleEvent::Create => self.on_create(),
            LifecycleEvent::Update => self.on_update(),
            LifecycleEvent::Delete => self.on_delete(),
        }
    }

    /// All declared calls in lifecycle order
    fn calls(&self) -> Vec<(LifecycleEvent, SdkCall)> {
        [
            LifecycleEvent::Create,
            LifecycleEvent::Update,
            LifecycleEvent::Delete,
        ]
        .into_iter()
        .filter_map(|event| self.call_for(event).map(|call| (event, call)))
        .collect()
    }

    /// Literal physical ID declared by the create call
    fn physical_id(&self) -> Option<String> {
        self.on_create()
            .and_then(|call| call.physical_id().map(str::to_string))
    }
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn CustomResource>;

/// Extension trait for lifecycle queries
pub trait CustomResourceExt {
    /// Whether a change of properties forces replacement
    fn replaces_on_change(&self) -> bool;
}

impl<R: CustomResource + ?Sized> CustomResourceExt for R {
    fn replaces_on_change(&self) -> bool {
        self.on_update().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PhysicalResourceId;

    #[derive(Debug)]
    struct ServiceAccess {
        principal: String,
    }

    impl CustomResource for ServiceAccess {
        fn id(&self) -> String {
            self.principal.clone()
        }

        fn description(&self) -> String {
            format!("Trusted access for {}", self.principal)
        }

        fn on_create(&self) -> Option<SdkCall> {
            Some(
                SdkCall::new("Organizations", "enableAWSServiceAccess")
                    .with_physical_resource_id(PhysicalResourceId::of(&self.principal))
                    .with_parameter("ServicePrincipal", self.principal.as_str()),
            )
        }

        fn on_delete(&self) -> Option<SdkCall> {
            Some(
                SdkCall::new("Organizations", "disableAWSServiceAccess")
                    .with_parameter("ServicePrincipal", self.principal.as_str()),
            )
        }
    }

    fn access() -> ServiceAccess {
        ServiceAccess {
            principal: "config.amazonaws.com".into(),
        }
    }

    #[test]
    fn test_calls_skip_missing_update() {
        let events: Vec<_> = access().calls().into_iter().map(|(e, _)| e).collect();
        assert_eq!(events, [LifecycleEvent::Create, LifecycleEvent::Delete]);
        assert!(access().replaces_on_change());
    }

    #[test]
    fn test_default_policy_covers_calls() {
        let policy = access().policy();
        assert!(policy.allows("organizations:EnableAWSServiceAccess"));
        assert!(policy.allows("organizations:DisableAWSServiceAccess"));
    }

    #[test]
    fn test_physical_id_from_create_call() {
        assert_eq!(access().physical_id().as_deref(), Some("config.amazonaws.com"));
    }
}
