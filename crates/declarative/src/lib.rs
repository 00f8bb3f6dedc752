//! # Declarative
//!
//! A framework-neutral model for declarative custom resources.
//!
//! A custom resource never calls a cloud API itself. It declares which SDK
//! call an external execution engine should run on each lifecycle event,
//! and which permissions that engine needs to run them.
//!
//! ## Core Concepts
//!
//! - **SdkCall**: One API call descriptor (service, action, region, parameters)
//! - **CustomResource**: Something that maps lifecycle events to SDK calls
//! - **Stack**: Named resources synthesized together
//! - **Template**: The synthesized document handed to the engine
//! - **ResourceDiff**: What the engine will run when a template is redeployed
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{CustomResource, PhysicalResourceId, SdkCall, Stack, synthesize};
//!
//! #[derive(Debug)]
//! struct ServiceAccess { principal: String }
//!
//! impl CustomResource for ServiceAccess {
//!     fn id(&self) -> String { self.principal.clone() }
//!     fn description(&self) -> String { format!("Trusted access for {}", self.principal) }
//!
//!     fn on_create(&self) -> Option<SdkCall> {
//!         Some(
//!             SdkCall::new("Organizations", "enableAWSServiceAccess")
//!                 .with_physical_resource_id(PhysicalResourceId::of(&self.principal))
//!                 .with_parameter("ServicePrincipal", self.principal.as_str()),
//!         )
//!     }
//!
//!     fn on_delete(&self) -> Option<SdkCall> {
//!         Some(
//!             SdkCall::new("Organizations", "disableAWSServiceAccess")
//!                 .with_parameter("ServicePrincipal", self.principal.as_str()),
//!         )
//!     }
//! }
//!
//! let mut stack = Stack::new("Organization");
//! stack.add("ConfigAccess", Box::new(ServiceAccess {
//!     principal: "config.amazonaws.com".into(),
//! }))?;
//!
//! println!("{}", synthesize(&stack)?.to_json(true)?);
//! ```

pub mod diff;
pub mod error;
pub mod policy;
pub mod resource;
pub mod stack;
pub mod template;
pub mod types;

// Re-export main types at crate root
pub use diff::{Change, DiffSummary, ResourceDiff, compute_diffs, group_by_change};
pub use error::{Error, Result};
pub use policy::{ANY_RESOURCE, CustomResourcePolicy, Effect, PolicyStatement, iam_action};
pub use resource::{BoxedResource, CustomResource, CustomResourceExt};
pub use stack::{Construct, Stack};
pub use template::{
    DeclaredResource, PROVIDER_ARN_PARAMETER, PROVIDER_ROLE_PARAMETER, RESOURCE_TYPE, Template,
    logical_id, synthesize,
};
pub use types::{LifecycleEvent, Parameters, PhysicalResourceId, SdkCall};
