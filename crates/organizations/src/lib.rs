//! # organizations
//!
//! Declarative delegated administrator registrations.
//!
//! A [`DelegatedAdministratorRegistration`] maps an account ID and a service
//! principal onto two SDK call descriptors for an external custom-resource
//! execution engine:
//!
//! - create: `Organizations:registerDelegatedAdministrator`
//! - delete: `Organizations:deregisterDelegatedAdministrator`
//!
//! Both run in the global-services region with parameters
//! `{ AccountId, ServicePrincipal }`. The create call records the physical
//! ID `<account id>:<service principal>`.
//!
//! ## Example
//!
//! ```
//! use organizations::DelegatedAdministratorRegistration;
//!
//! let registration =
//!     DelegatedAdministratorRegistration::new("123456789012", "guardduty.amazonaws.com");
//!
//! assert_eq!(
//!     registration.physical_resource_id(),
//!     "123456789012:guardduty.amazonaws.com"
//! );
//! ```
//!
//! Account IDs come from an [`AccountResolver`]; [`AccountDirectory`] resolves
//! aliases from a lookup table.

pub mod account;
pub mod delegated_administrator;
pub mod error;

pub use account::{Account, AccountDirectory, AccountResolver};
pub use delegated_administrator::{
    DEREGISTER_ACTION, DelegatedAdministratorRegistration, GLOBAL_REGION, REGISTER_ACTION,
    SERVICE, build_registration_actions, physical_id,
};
pub use error::{Error, Result};
